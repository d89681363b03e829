//! Route definitions for the file library.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;

use super::UPLOAD_BODY_LIMIT;
use crate::handlers::library;
use crate::state::AppState;

/// Routes mounted at `/library`.
///
/// ```text
/// GET /                 -> list
/// GET /{id}/download    -> download (requires auth)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(library::list))
        .route("/{id}/download", get(library::download))
}

/// Routes mounted at `/admin/library`.
///
/// ```text
/// POST   /       -> upload (multipart)
/// DELETE /{id}   -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(library::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/{id}", delete(library::delete))
}
