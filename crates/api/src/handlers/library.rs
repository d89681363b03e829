//! Handlers for the downloadable file library.

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::sanitize::{sanitize_line, sanitize_text};
use campus_core::types::DbId;
use campus_core::uploads::{object_name, validate_upload, UploadKind, BUCKET_LIBRARY};
use campus_core::validation::require_line;
use campus_db::models::library_file::{CreateLibraryFile, LibraryFile};
use campus_db::repositories::LibraryFileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 2_000;
const OBJECT_PREFIX: &str = "files";

/// GET /api/v1/library
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<LibraryFile>>>> {
    let files = LibraryFileRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: files }))
}

/// GET /api/v1/library/{id}/download
///
/// Signed-in users only. Streams the stored bytes back as an attachment.
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let file = find(&state, id).await?;
    let bytes = state.objects.download(BUCKET_LIBRARY, &file.object_path).await?;
    tracing::info!(user_id = auth.user_id, file_id = id, "Library file downloaded");

    let disposition = format!("attachment; filename=\"{}\"", download_filename(&file));
    Ok((
        [(CONTENT_TYPE, file.content_type), (CONTENT_DISPOSITION, disposition)],
        bytes,
    ))
}

/// POST /api/v1/admin/library
///
/// Multipart form with `file`, `title` and an optional `description`.
pub async fn upload(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<LibraryFile>>)> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((content_type, data.to_vec()));
            }
            Some("title") => {
                title = Some(field.text().await.map_err(|e| AppError::BadRequest(e.to_string()))?);
            }
            Some("description") => {
                description =
                    Some(field.text().await.map_err(|e| AppError::BadRequest(e.to_string()))?);
            }
            _ => {}
        }
    }

    let (content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let title = require_line("Title", title.as_deref().unwrap_or(""), MAX_TITLE_LEN)?;
    let description = description
        .map(|d| sanitize_text(&d, MAX_DESCRIPTION_LEN))
        .filter(|d| !d.is_empty());

    let ext = validate_upload(UploadKind::LibraryFile, &content_type, data.len())?;
    let path = object_name(OBJECT_PREFIX, ext);
    let public_url = state.objects.public_url(BUCKET_LIBRARY, &path)?;
    let size_bytes = data.len() as i64;
    state
        .objects
        .upload(BUCKET_LIBRARY, &path, data, &content_type)
        .await?;

    let input = CreateLibraryFile {
        title,
        description,
        object_path: path.clone(),
        public_url,
        content_type,
        size_bytes,
        uploaded_by: Some(admin.user_id),
    };
    let record = match LibraryFileRepo::create(&state.pool, &input).await {
        Ok(record) => record,
        Err(e) => {
            remove_object(&state, &path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = admin.user_id,
        file_id = record.id,
        size_bytes,
        "Library file uploaded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// DELETE /api/v1/admin/library/{id}
///
/// The record goes first; a leftover object is only logged.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = LibraryFileRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LibraryFile",
            id,
        }))?;
    remove_object(&state, &removed.object_path).await;
    tracing::info!(user_id = admin.user_id, file_id = id, "Library file deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find(state: &AppState, id: DbId) -> AppResult<LibraryFile> {
    LibraryFileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LibraryFile",
            id,
        }))
}

async fn remove_object(state: &AppState, path: &str) {
    if let Err(e) = state.objects.remove(BUCKET_LIBRARY, path).await {
        tracing::warn!(error = %e, path, "Failed to remove library object");
    }
}

/// `<title>.<ext>` with the title reduced to a header-safe ASCII slug.
fn download_filename(file: &LibraryFile) -> String {
    let title = sanitize_line(&file.title, MAX_TITLE_LEN);
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c);
        } else if !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_matches('-');
    let stem = if stem.is_empty() { "download" } else { stem };

    match file.object_path.rsplit_once('.') {
        Some((_, ext)) if !ext.contains('/') => format!("{stem}.{ext}"),
        _ => stem.to_string(),
    }
}
