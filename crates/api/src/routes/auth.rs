//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /sign-up                 -> sign_up
/// POST /confirm-email           -> confirm_email
/// POST /sign-in                 -> sign_in
/// POST /refresh                 -> refresh
/// POST /sign-out                -> sign_out (requires auth)
/// POST /reset-password          -> reset_password
/// POST /reset-password/confirm  -> confirm_reset
/// POST /password-strength       -> password_strength
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/confirm-email", post(auth::confirm_email))
        .route("/sign-in", post(auth::sign_in))
        .route("/refresh", post(auth::refresh))
        .route("/sign-out", post(auth::sign_out))
        .route("/reset-password", post(auth::reset_password))
        .route("/reset-password/confirm", post(auth::confirm_reset))
        .route("/password-strength", post(auth::password_strength))
}
