//! Route definitions for testimonials and their moderation.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;

use super::UPLOAD_BODY_LIMIT;
use crate::handlers::testimonials;
use crate::state::AppState;

/// Routes mounted at `/testimonials`.
///
/// ```text
/// GET  /   -> list_published
/// POST /   -> submit (requires auth)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(testimonials::list_published).post(testimonials::submit),
    )
}

/// Routes mounted at `/admin/testimonials`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /                       -> list_approved
/// GET    /pending                -> list_pending
/// GET    /pending/count          -> count_pending
/// POST   /pending/{id}/approve   -> approve
/// POST   /pending/{id}/reject    -> reject
/// GET    /changes                -> changes (SSE)
/// DELETE /{id}?confirm=true      -> delete
/// PUT    /{id}/photo             -> upload_photo (multipart)
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(testimonials::list_approved))
        .route("/pending", get(testimonials::list_pending))
        .route("/pending/count", get(testimonials::count_pending))
        .route("/pending/{id}/approve", post(testimonials::approve))
        .route("/pending/{id}/reject", post(testimonials::reject))
        .route("/changes", get(testimonials::changes))
        .route("/{id}", delete(testimonials::delete))
        .route(
            "/{id}/photo",
            put(testimonials::upload_photo).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}
