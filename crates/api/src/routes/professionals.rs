//! Route definitions for the professional directory.

use axum::routing::get;
use axum::Router;

use crate::handlers::professionals;
use crate::state::AppState;

/// Routes mounted at `/professionals`.
///
/// ```text
/// GET /       -> list_active
/// GET /{id}   -> get_active
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(professionals::list_active))
        .route("/{id}", get(professionals::get_active))
}

/// Routes mounted at `/admin/professionals`.
///
/// ```text
/// GET    /       -> list_all
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(professionals::list_all).post(professionals::create))
        .route(
            "/{id}",
            get(professionals::get_by_id)
                .put(professionals::update)
                .delete(professionals::delete),
        )
}
