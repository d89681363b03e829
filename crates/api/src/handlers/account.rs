//! Handlers for the signed-in user's own account (`/account`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::password::{validate_confirmation, validate_password};
use campus_core::totp;
use campus_core::types::DbId;
use campus_db::models::user::{User, UserResponse};
use campus_db::repositories::{MfaFactorRepo, RoleRepo, UserRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::user_response;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /account/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Enrollment payload; `otpauth_uri` is rendered as a QR code by the client.
#[derive(Debug, Serialize)]
pub struct MfaEnrollment {
    pub factor_id: DbId,
    pub secret: String,
    pub otpauth_uri: String,
}

/// Request body for `POST /account/mfa/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyFactorRequest {
    pub factor_id: DbId,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct FactorVerification {
    pub verified: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/account
pub async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_user(&state, auth.user_id).await?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let mfa_enabled = MfaFactorRepo::has_verified(&state.pool, user.id).await?;
    Ok(Json(DataResponse {
        data: user_response(&user, &role, mfa_enabled),
    }))
}

/// PUT /api/v1/account/password
///
/// Requires the current password. Existing sessions stay valid.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    validate_confirmation(&input.new_password, &input.confirm_password)?;
    validate_password(&input.new_password)?;

    let user = load_user(&state, auth.user_id).await?;
    if !verify_password(&input.current_password, &user.password_hash)? {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let password_hash = hash_password(&input.new_password)?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;
    tracing::info!(user_id = user.id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/account/mfa/enroll
///
/// Create an unverified TOTP factor. It only guards sign-in once verified.
pub async fn enroll_factor(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<(StatusCode, Json<DataResponse<MfaEnrollment>>)> {
    let user = load_user(&state, auth.user_id).await?;

    let secret = totp::generate_secret();
    let otpauth_uri = totp::provisioning_uri(&secret, &state.config.mfa_issuer, &user.email)?;
    let factor = MfaFactorRepo::create(&state.pool, user.id, &secret).await?;
    tracing::info!(user_id = user.id, factor_id = factor.id, "MFA factor enrolled");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MfaEnrollment {
                factor_id: factor.id,
                secret,
                otpauth_uri,
            },
        }),
    ))
}

/// POST /api/v1/account/mfa/verify
///
/// Check a code against a factor; a correct code marks the factor verified.
pub async fn verify_factor(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<VerifyFactorRequest>,
) -> AppResult<Json<DataResponse<FactorVerification>>> {
    let factor = MfaFactorRepo::find_for_user(&state.pool, input.factor_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MfaFactor",
            id: input.factor_id,
        }))?;

    let now = Utc::now().timestamp().max(0) as u64;
    let verified = totp::verify_code(&factor.secret, &input.code, now)?;
    if verified {
        MfaFactorRepo::mark_verified(&state.pool, factor.id).await?;
        tracing::info!(user_id = auth.user_id, factor_id = factor.id, "MFA factor verified");
    }

    Ok(Json(DataResponse {
        data: FactorVerification { verified },
    }))
}

/// DELETE /api/v1/account/mfa/{factor_id}
pub async fn remove_factor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(factor_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if MfaFactorRepo::delete_for_user(&state.pool, factor_id, auth.user_id).await? {
        tracing::info!(user_id = auth.user_id, factor_id, "MFA factor removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "MfaFactor",
            id: factor_id,
        }))
    }
}

async fn load_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))
}
