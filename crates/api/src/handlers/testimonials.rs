//! Handlers for testimonials: public submission and listing, admin moderation.

use std::convert::Infallible;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::sanitize::sanitize_line;
use campus_core::testimonial::{clean_submission, MAX_NAME_LEN, PENDING_POLL_INTERVAL_SECS};
use campus_core::types::DbId;
use campus_db::models::testimonial::{ApprovedTestimonial, PendingTestimonial};
use campus_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::moderation::ModerationOutcome;
use crate::response::DataResponse;
use crate::state::AppState;

/// Pending views are always stale; clients must not reuse a response.
const NO_STORE: &str = "no-store";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /testimonials`.
#[derive(Debug, Deserialize)]
pub struct SubmitTestimonialRequest {
    /// Display name; falls back to the account display name when blank.
    pub name: Option<String>,
    pub role: String,
    pub content: String,
}

/// Response body for the pending count.
#[derive(Debug, Serialize)]
pub struct PendingCount {
    pub count: i64,
    /// Suggested refresh interval for the moderation panel.
    pub poll_interval_secs: u64,
}

/// Query string for `DELETE /admin/testimonials/{id}`.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/testimonials
///
/// Published testimonials, newest first.
pub async fn list_published(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ApprovedTestimonial>>>> {
    let rows = state.moderation.list_published().await?;
    Ok(Json(DataResponse {
        data: rows.to_vec(),
    }))
}

/// POST /api/v1/testimonials
///
/// Queue a testimonial for moderation. Nothing becomes public until an admin
/// approves it.
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SubmitTestimonialRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PendingTestimonial>>)> {
    let has_name = input
        .name
        .as_deref()
        .is_some_and(|n| !sanitize_line(n, MAX_NAME_LEN).is_empty());

    let account_name = if has_name {
        String::new()
    } else {
        UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .map(|u| u.display_name)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?
    };

    let submission = clean_submission(
        input.name.as_deref(),
        &account_name,
        &input.role,
        &input.content,
    )?;
    let pending = state.moderation.submit(auth.user_id, submission).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: pending })))
}

// ---------------------------------------------------------------------------
// Admin: pending queue
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/testimonials/pending
pub async fn list_pending(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let rows = state.moderation.list_pending().await?;
    Ok(([(CACHE_CONTROL, NO_STORE)], Json(DataResponse { data: rows })))
}

/// GET /api/v1/admin/testimonials/pending/count
pub async fn count_pending(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let count = state.moderation.count_pending().await?;
    Ok((
        [(CACHE_CONTROL, NO_STORE)],
        Json(DataResponse {
            data: PendingCount {
                count,
                poll_interval_secs: PENDING_POLL_INTERVAL_SECS,
            },
        }),
    ))
}

/// POST /api/v1/admin/testimonials/pending/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ModerationOutcome>>> {
    let outcome = state.moderation.approve(id, admin.user_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/admin/testimonials/pending/{id}/reject
///
/// Idempotent: rejecting an already-removed record succeeds with
/// `removed: false`.
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ModerationOutcome>>> {
    let outcome = state.moderation.reject(id, admin.user_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// Admin: published records
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/testimonials
pub async fn list_approved(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<ApprovedTestimonial>>>> {
    let rows = state.moderation.list_approved_for_admin().await?;
    Ok(Json(DataResponse {
        data: rows.to_vec(),
    }))
}

/// PUT /api/v1/admin/testimonials/{id}/photo
///
/// Multipart upload with a single `photo` field.
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ApprovedTestimonial>>> {
    let mut photo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("photo") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            photo = Some((content_type, data.to_vec()));
        }
    }

    let (content_type, data) =
        photo.ok_or_else(|| AppError::BadRequest("Missing required 'photo' field".into()))?;

    let updated = state
        .moderation
        .attach_photo(id, &content_type, data, admin.user_id)
        .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/admin/testimonials/{id}?confirm=true
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Query(params): Query<DeleteParams>,
) -> AppResult<StatusCode> {
    if !params.confirm {
        return Err(AppError::BadRequest(
            "Deleting a published testimonial requires confirm=true".into(),
        ));
    }
    state.moderation.delete_approved(id, admin.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin: changefeed
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/testimonials/changes
///
/// Server-Sent Events stream of moderation events. Each event is named after
/// its type and carries the invalidated views, so a panel can refetch only
/// what changed. A subscriber that falls behind gets a `resync` event.
pub async fn changes(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(user_id = admin.user_id, "Changefeed subscriber connected");

    let stream = BroadcastStream::new(state.moderation.subscribe()).filter_map(|msg| match msg {
        Ok(event) => Event::default()
            .event(event.event_type.clone())
            .json_data(&event)
            .ok()
            .map(Ok),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "Changefeed subscriber lagged");
            Some(Ok(Event::default().event("resync").data(skipped.to_string())))
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
