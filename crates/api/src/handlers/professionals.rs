//! Handlers for professional profiles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::sanitize::{sanitize_line, sanitize_text};
use campus_core::types::DbId;
use campus_core::validation::{require_line, validate_email};
use campus_core::whatsapp::{normalize_phone, whatsapp_link};
use campus_db::models::professional::{CreateProfessional, Professional, UpdateProfessional};
use campus_db::repositories::ProfessionalRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_NAME_LEN: usize = 120;
const MAX_TITLE_LEN: usize = 120;
const MAX_BIO_LEN: usize = 5_000;
const MAX_SPECIALTY_LEN: usize = 60;

/// A professional as shown on the public site.
#[derive(Debug, Serialize)]
pub struct ProfessionalView {
    #[serde(flatten)]
    pub professional: Professional,
    /// Click-to-chat link with a greeting, when a phone is on file.
    pub whatsapp_link: Option<String>,
}

impl From<Professional> for ProfessionalView {
    fn from(professional: Professional) -> Self {
        let whatsapp_link = professional.whatsapp_phone.as_deref().and_then(|phone| {
            let greeting = format!(
                "Hola {}, quisiera más información sobre sus servicios.",
                professional.name
            );
            whatsapp_link(phone, &greeting)
                .map_err(|e| {
                    tracing::warn!(error = %e, professional_id = professional.id, "Bad stored phone")
                })
                .ok()
        });
        Self {
            professional,
            whatsapp_link,
        }
    }
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/professionals
pub async fn list_active(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProfessionalView>>>> {
    let rows = ProfessionalRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse {
        data: rows.into_iter().map(ProfessionalView::from).collect(),
    }))
}

/// GET /api/v1/professionals/{id}
pub async fn get_active(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProfessionalView>>> {
    let professional = find(&state, id, true).await?;
    Ok(Json(DataResponse {
        data: professional.into(),
    }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/professionals
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Professional>>>> {
    let rows = ProfessionalRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/admin/professionals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Professional>>> {
    let professional = find(&state, id, false).await?;
    Ok(Json(DataResponse { data: professional }))
}

/// POST /api/v1/admin/professionals
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateProfessional>,
) -> AppResult<(StatusCode, Json<DataResponse<Professional>>)> {
    input.name = require_line("Name", &input.name, MAX_NAME_LEN)?;
    input.title = require_line("Title", &input.title, MAX_TITLE_LEN)?;
    input.bio = input.bio.map(|b| sanitize_text(&b, MAX_BIO_LEN));
    input.specialties = clean_specialties(input.specialties);
    input.whatsapp_phone = clean_phone(input.whatsapp_phone)?;
    input.email = clean_email(input.email)?;

    let professional = ProfessionalRepo::create(&state.pool, &input).await?;
    tracing::info!(
        user_id = admin.user_id,
        professional_id = professional.id,
        "Professional created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: professional })))
}

/// PUT /api/v1/admin/professionals/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateProfessional>,
) -> AppResult<Json<DataResponse<Professional>>> {
    input.name = input
        .name
        .map(|n| require_line("Name", &n, MAX_NAME_LEN))
        .transpose()?;
    input.title = input
        .title
        .map(|t| require_line("Title", &t, MAX_TITLE_LEN))
        .transpose()?;
    input.bio = input.bio.map(|b| sanitize_text(&b, MAX_BIO_LEN));
    input.specialties = input.specialties.map(clean_specialties);
    input.whatsapp_phone = clean_phone(input.whatsapp_phone)?;
    input.email = clean_email(input.email)?;

    let professional = ProfessionalRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Professional",
            id,
        }))?;
    tracing::info!(user_id = admin.user_id, professional_id = id, "Professional updated");
    Ok(Json(DataResponse { data: professional }))
}

/// DELETE /api/v1/admin/professionals/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProfessionalRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = admin.user_id, professional_id = id, "Professional deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Professional",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find(state: &AppState, id: DbId, active_only: bool) -> AppResult<Professional> {
    ProfessionalRepo::find_by_id(&state.pool, id, active_only)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Professional",
            id,
        }))
}

fn clean_specialties(specialties: Vec<String>) -> Vec<String> {
    specialties
        .iter()
        .map(|s| sanitize_line(s, MAX_SPECIALTY_LEN))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Blank means "no phone"; anything else is stored as digits only.
fn clean_phone(phone: Option<String>) -> Result<Option<String>, CoreError> {
    phone
        .filter(|p| !p.trim().is_empty())
        .map(|p| normalize_phone(&p))
        .transpose()
}

fn clean_email(email: Option<String>) -> Result<Option<String>, CoreError> {
    email
        .filter(|e| !e.trim().is_empty())
        .map(|e| validate_email(&e))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn professional(phone: Option<&str>) -> Professional {
        let now = chrono::Utc::now();
        Professional {
            id: 1,
            name: "Dra. Lucía Gómez".into(),
            title: "Nutricionista".into(),
            bio: String::new(),
            specialties: vec![],
            photo_url: None,
            whatsapp_phone: phone.map(str::to_string),
            email: None,
            sort_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn view_builds_link_from_stored_phone() {
        let view = ProfessionalView::from(professional(Some("573001234567")));
        let link = view.whatsapp_link.expect("link");
        assert!(link.starts_with("https://wa.me/573001234567?text=Hola"), "{link}");
    }

    #[test]
    fn view_without_phone_has_no_link() {
        assert!(ProfessionalView::from(professional(None)).whatsapp_link.is_none());
    }

    #[test]
    fn specialties_are_cleaned() {
        let cleaned = clean_specialties(vec![" Nutrición ".into(), "<b></b>".into()]);
        assert_eq!(cleaned, vec!["Nutrición".to_string()]);
    }

    #[test]
    fn blank_phone_clears_and_bad_phone_fails() {
        assert_eq!(clean_phone(Some("  ".into())).unwrap(), None);
        assert_eq!(
            clean_phone(Some("+57 300 123 4567".into())).unwrap().as_deref(),
            Some("573001234567")
        );
        assert!(clean_phone(Some("123".into())).is_err());
    }
}
