pub mod account;
pub mod auth;
pub mod courses;
pub mod health;
pub mod library;
pub mod professionals;
pub mod testimonials;

use axum::Router;

use crate::state::AppState;

/// Largest request body accepted on upload routes. Sits above every
/// per-kind file limit so oversized files reach upload validation and get
/// a descriptive error instead of a bare 413.
pub(crate) const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/sign-up                                    register (public)
/// /auth/confirm-email                              confirm address (public)
/// /auth/sign-in                                    sign in (public)
/// /auth/refresh                                    rotate tokens (public)
/// /auth/sign-out                                   revoke sessions (auth)
/// /auth/reset-password                             request reset link (public)
/// /auth/reset-password/confirm                     set new password (public)
/// /auth/password-strength                          strength meter (public)
///
/// /account                                         own profile (auth)
/// /account/password                                change password (auth)
/// /account/mfa/enroll                              enroll TOTP factor (auth)
/// /account/mfa/verify                              verify TOTP code (auth)
/// /account/mfa/{factor_id}                         remove factor (auth)
///
/// /testimonials                                    published list, submit
///
/// /admin/testimonials                              approved list (admin)
/// /admin/testimonials/pending                      pending list (admin)
/// /admin/testimonials/pending/count                pending badge (admin)
/// /admin/testimonials/pending/{id}/approve         approve (admin)
/// /admin/testimonials/pending/{id}/reject          reject (admin)
/// /admin/testimonials/changes                      SSE changefeed (admin)
/// /admin/testimonials/{id}                         delete (admin)
/// /admin/testimonials/{id}/photo                   replace photo (admin)
///
/// /courses                                         published catalog
/// /courses/{slug}                                  course detail
/// /courses/{slug}/financing                        financing quotes
///
/// /admin/courses                                   list, create (admin)
/// /admin/courses/{id}                              get, update, delete
/// /admin/courses/{id}/financing                    list, create plans
/// /admin/financing/{id}                            update, delete plan
///
/// /professionals                                   active directory
/// /professionals/{id}                              active profile
/// /admin/professionals                             list, create (admin)
/// /admin/professionals/{id}                        get, update, delete
///
/// /library                                         file list
/// /library/{id}/download                           download (auth)
/// /admin/library                                   upload (admin)
/// /admin/library/{id}                              delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/account", account::router())
        // Testimonials: public board plus the moderation panel.
        .nest("/testimonials", testimonials::public_router())
        .nest("/admin/testimonials", testimonials::admin_router())
        // Course catalog and financing.
        .nest("/courses", courses::public_router())
        .nest("/admin/courses", courses::admin_router())
        .nest("/admin/financing", courses::financing_router())
        // Professional directory.
        .nest("/professionals", professionals::public_router())
        .nest("/admin/professionals", professionals::admin_router())
        // Downloadable library.
        .nest("/library", library::public_router())
        .nest("/admin/library", library::admin_router())
}
