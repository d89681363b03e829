//! Route definitions for the `/account` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/account`. Every route requires auth.
///
/// ```text
/// GET    /                    -> get_account
/// PUT    /password            -> change_password
/// POST   /mfa/enroll          -> enroll_factor
/// POST   /mfa/verify          -> verify_factor
/// DELETE /mfa/{factor_id}     -> remove_factor
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(account::get_account))
        .route("/password", put(account::change_password))
        .route("/mfa/enroll", post(account::enroll_factor))
        .route("/mfa/verify", post(account::verify_factor))
        .route("/mfa/{factor_id}", delete(account::remove_factor))
}
