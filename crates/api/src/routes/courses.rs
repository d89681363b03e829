//! Route definitions for the course catalog and financing plans.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{courses, financing};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET /                   -> list_published
/// GET /{slug}             -> get_published
/// GET /{slug}/financing   -> list_financing
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_published))
        .route("/{slug}", get(courses::get_published))
        .route("/{slug}/financing", get(courses::list_financing))
}

/// Routes mounted at `/admin/courses`.
///
/// ```text
/// GET    /                        -> list_all
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
/// GET    /{id}/financing          -> financing::list_for_course
/// POST   /{id}/financing          -> financing::create
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_all).post(courses::create))
        .route(
            "/{id}",
            get(courses::get_by_id)
                .put(courses::update)
                .delete(courses::delete),
        )
        .route(
            "/{id}/financing",
            get(financing::list_for_course).post(financing::create),
        )
}

/// Routes mounted at `/admin/financing`.
///
/// ```text
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn financing_router() -> Router<AppState> {
    Router::new().route("/{id}", put(financing::update).delete(financing::delete))
}
