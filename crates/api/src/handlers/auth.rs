//! Handlers for the `/auth` resource (sign-up, sign-in, refresh, sign-out,
//! email confirmation and password reset).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::password::{check_password_strength, validate_password, PasswordStrength};
use campus_core::roles::ROLE_USER;
use campus_core::totp;
use campus_core::validation::{validate_display_name, validate_email};
use campus_db::models::session::CreateSession;
use campus_db::models::user::{CreateUser, User, UserResponse};
use campus_db::models::user_token::{PURPOSE_EMAIL_CONFIRMATION, PURPOSE_PASSWORD_RESET};
use campus_db::repositories::{MfaFactorRepo, RoleRepo, SessionRepo, UserRepo, UserTokenRepo};
use campus_events::delivery::templates;
use campus_events::RenderedEmail;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{
    generate_access_token, generate_link_token, generate_refresh_token, hash_token,
};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum consecutive failed sign-in attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

/// Lifetime of a password reset link.
const RESET_TOKEN_TTL_MINS: i64 = 60;

/// Lifetime of an email confirmation link.
const CONFIRMATION_TOKEN_TTL_HOURS: i64 = 48;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/sign-up`.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Request body for `POST /auth/sign-in`.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    /// Required once the account has a verified authenticator.
    pub mfa_code: Option<String>,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/confirm-email`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Request body for `POST /auth/reset-password/confirm`.
#[derive(Debug, Deserialize)]
pub struct ConfirmResetRequest {
    pub token: String,
    pub new_password: String,
}

/// Request body for `POST /auth/password-strength`.
#[derive(Debug, Deserialize)]
pub struct PasswordStrengthRequest {
    pub password: String,
}

/// Successful authentication response returned by sign-up, sign-in and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct Confirmed {
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct PasswordReset {
    pub reset: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/sign-up
///
/// Create a `user` account and sign it in. A confirmation email is sent when
/// SMTP is configured; failure to send does not fail the sign-up.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    let email = validate_email(&input.email)?;
    let display_name = validate_display_name(&input.display_name)?;
    validate_password(&input.password)?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let role = RoleRepo::find_by_name(&state.pool, ROLE_USER)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role '{ROLE_USER}' is not seeded")))?;

    let password_hash = hash_password(&input.password)?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            display_name,
            password_hash,
            role_id: role.id,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "Account created");

    let (token, token_hash) = generate_link_token();
    let expires_at = Utc::now() + chrono::Duration::hours(CONFIRMATION_TOKEN_TTL_HOURS);
    UserTokenRepo::create(
        &state.pool,
        user.id,
        PURPOSE_EMAIL_CONFIRMATION,
        &token_hash,
        expires_at,
    )
    .await?;

    let confirm_url = format!(
        "{}/confirm-email?token={token}",
        state.config.public_site_url
    );
    send_best_effort(
        &state,
        &user.email,
        &templates::email_confirmation(&user.display_name, &confirm_url),
    )
    .await;

    let response = create_auth_response(&state, &user, &role.name).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/confirm-email
pub async fn confirm_email(
    State(state): State<AppState>,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<DataResponse<Confirmed>>> {
    let token = UserTokenRepo::consume(
        &state.pool,
        &hash_token(input.token.trim()),
        PURPOSE_EMAIL_CONFIRMATION,
    )
    .await?
    .ok_or_else(|| AppError::BadRequest("Invalid or expired confirmation link".into()))?;

    UserRepo::confirm_email(&state.pool, token.user_id).await?;
    tracing::info!(user_id = token.user_id, "Email confirmed");

    Ok(Json(DataResponse {
        data: Confirmed { confirmed: true },
    }))
}

/// POST /api/v1/auth/sign-in
///
/// Authenticate with email + password (+ TOTP code when enrolled).
pub async fn sign_in(
    State(state): State<AppState>,
    Json(input): Json<SignInRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let email = validate_email(&input.email)?;

    // 1. Find user by email.
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    // 2. Check if the account is active.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // 3. Check if the account is temporarily locked.
    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    // 4. Verify password.
    if !verify_password(&input.password, &user.password_hash)? {
        record_failed_attempt(&state, &user).await?;
        return Err(invalid());
    }

    // 5. Second factor, when enrolled.
    let factors = MfaFactorRepo::list_verified(&state.pool, user.id).await?;
    if !factors.is_empty() {
        let code = input
            .mfa_code
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or(AppError::Core(CoreError::MfaRequired))?;

        let now = Utc::now().timestamp().max(0) as u64;
        let mut accepted = false;
        for factor in &factors {
            if totp::verify_code(&factor.secret, code, now)? {
                accepted = true;
                break;
            }
        }
        if !accepted {
            record_failed_attempt(&state, &user).await?;
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid verification code".into(),
            )));
        }
    }

    // 6. On success: reset failed count, set last_login_at.
    UserRepo::record_successful_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "User signed in");

    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let response = create_auth_response(&state, &user, &role_name).await?;

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let token_hash = hash_token(&input.refresh_token);
    // The presented token is spent here; a replay finds nothing to claim.
    let session = SessionRepo::claim(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let response = create_auth_response(&state, &user, &role_name).await?;

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/sign-out
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn sign_out(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/reset-password
///
/// Always answers 202 so the response does not reveal whether an account
/// exists. Email delivery failures are logged, never surfaced.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    let email = validate_email(&input.email)?;

    let Some(user) = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .filter(|u| u.is_active)
    else {
        tracing::debug!("Password reset requested for unknown account");
        return Ok(StatusCode::ACCEPTED);
    };

    UserTokenRepo::invalidate_for_user(&state.pool, user.id, PURPOSE_PASSWORD_RESET).await?;

    let (token, token_hash) = generate_link_token();
    let expires_at = Utc::now() + chrono::Duration::minutes(RESET_TOKEN_TTL_MINS);
    UserTokenRepo::create(
        &state.pool,
        user.id,
        PURPOSE_PASSWORD_RESET,
        &token_hash,
        expires_at,
    )
    .await?;

    let reset_url = format!(
        "{}/reset-password?token={token}",
        state.config.public_site_url
    );
    send_best_effort(
        &state,
        &user.email,
        &templates::password_reset(&reset_url, RESET_TOKEN_TTL_MINS),
    )
    .await;
    tracing::info!(user_id = user.id, "Password reset link issued");

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/reset-password/confirm
///
/// Consume a reset token, set the new password and revoke every session.
pub async fn confirm_reset(
    State(state): State<AppState>,
    Json(input): Json<ConfirmResetRequest>,
) -> AppResult<Json<DataResponse<PasswordReset>>> {
    validate_password(&input.new_password)?;

    let token = UserTokenRepo::consume(
        &state.pool,
        &hash_token(input.token.trim()),
        PURPOSE_PASSWORD_RESET,
    )
    .await?
    .ok_or_else(|| AppError::BadRequest("Invalid or expired reset link".into()))?;

    let password_hash = hash_password(&input.new_password)?;
    if !UserRepo::update_password(&state.pool, token.user_id, &password_hash).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: token.user_id,
        }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, token.user_id).await?;
    tracing::info!(user_id = token.user_id, "Password reset completed");

    Ok(Json(DataResponse {
        data: PasswordReset { reset: true },
    }))
}

/// POST /api/v1/auth/password-strength
///
/// Score a candidate password for the sign-up and reset forms.
pub async fn password_strength(
    Json(input): Json<PasswordStrengthRequest>,
) -> Json<DataResponse<PasswordStrength>> {
    Json(DataResponse {
        data: check_password_strength(&input.password),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Increment the failure counter and lock the account past the threshold.
async fn record_failed_attempt(state: &AppState, user: &User) -> AppResult<()> {
    UserRepo::increment_failed_login(&state.pool, user.id).await?;

    let new_count = user.failed_login_count + 1;
    if new_count >= MAX_FAILED_ATTEMPTS {
        let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
        UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
        tracing::warn!(user_id = user.id, "Account locked after repeated failures");
    }
    Ok(())
}

/// Send an email if SMTP is configured; log and swallow failures.
async fn send_best_effort(state: &AppState, to: &str, email: &RenderedEmail) {
    let Some(mailer) = state.mailer.as_ref() else {
        tracing::warn!(subject = %email.subject, "SMTP not configured, email not sent");
        return;
    };
    if let Err(e) = mailer.send(to, email).await {
        tracing::error!(error = %e, subject = %email.subject, "Failed to send email");
    }
}

/// Generate access + refresh tokens, persist a session row, and build the response.
pub(crate) async fn create_auth_response(
    state: &AppState,
    user: &User,
    role: &str,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    let mfa_enabled = MfaFactorRepo::has_verified(&state.pool, user.id).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user_response(user, role, mfa_enabled),
    })
}

/// Public projection of a user row.
pub(crate) fn user_response(user: &User, role: &str, mfa_enabled: bool) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        display_name: user.display_name.clone(),
        role: role.to_string(),
        email_confirmed: user.email_confirmed_at.is_some(),
        mfa_enabled,
        last_login_at: user.last_login_at,
        created_at: user.created_at,
    }
}
