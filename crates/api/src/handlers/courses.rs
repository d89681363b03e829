//! Handlers for the course catalog: public browsing and admin CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use campus_core::currency::{format_currency, Currency};
use campus_core::error::CoreError;
use campus_core::sanitize::{sanitize_line, sanitize_text};
use campus_core::types::DbId;
use campus_core::validation::{require_line, validate_slug};
use campus_core::whatsapp::whatsapp_link;
use campus_db::models::course::{Course, CreateCourse, UpdateCourse};
use campus_db::repositories::{CourseRepo, FinancingRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::financing::{quote_options, FinancingQuote};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_TITLE_LEN: usize = 200;
const MAX_SUMMARY_LEN: usize = 500;
const MAX_DESCRIPTION_LEN: usize = 20_000;
const MAX_MODALITY_LEN: usize = 60;

/// A course as shown on the public site.
#[derive(Debug, Serialize)]
pub struct CourseView {
    #[serde(flatten)]
    pub course: Course,
    /// Price formatted for display (`$ 1.250.000`, `US$ 1,250.00`).
    pub price_formatted: String,
    /// WhatsApp inquiry link, when a contact phone is configured.
    pub inquiry_link: Option<String>,
    /// Active financing plans; only present on the detail view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financing: Option<Vec<FinancingQuote>>,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/courses
pub async fn list_published(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CourseView>>>> {
    let courses = CourseRepo::list(&state.pool, true).await?;
    let views = courses
        .into_iter()
        .map(|course| course_view(&state, course, None))
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/courses/{slug}
pub async fn get_published(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<CourseView>>> {
    let course = find_published(&state, &slug).await?;
    let options = FinancingRepo::list_for_course(&state.pool, course.id, true).await?;
    let quotes = quote_options(&course, options)?;
    Ok(Json(DataResponse {
        data: course_view(&state, course, Some(quotes))?,
    }))
}

/// GET /api/v1/courses/{slug}/financing
pub async fn list_financing(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<FinancingQuote>>>> {
    let course = find_published(&state, &slug).await?;
    let options = FinancingRepo::list_for_course(&state.pool, course.id, true).await?;
    Ok(Json(DataResponse {
        data: quote_options(&course, options)?,
    }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/courses
///
/// All courses, drafts included.
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = CourseRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: courses }))
}

/// POST /api/v1/admin/courses
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<DataResponse<Course>>)> {
    input.slug = input.slug.trim().to_string();
    validate_slug(&input.slug)?;
    input.title = require_line("Title", &input.title, MAX_TITLE_LEN)?;
    input.summary = input.summary.map(|s| sanitize_text(&s, MAX_SUMMARY_LEN));
    input.description = input
        .description
        .map(|s| sanitize_text(&s, MAX_DESCRIPTION_LEN));
    input.modality = input.modality.map(|s| sanitize_line(&s, MAX_MODALITY_LEN));
    validate_price(input.price)?;
    validate_duration(input.duration_hours)?;
    input.currency = input
        .currency
        .map(|c| Currency::parse(&c).map(|c| c.code().to_string()))
        .transpose()?;

    let course = CourseRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = admin.user_id, course_id = course.id, slug = %course.slug, "Course created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

/// GET /api/v1/admin/courses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Course>>> {
    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;
    Ok(Json(DataResponse { data: course }))
}

/// PUT /api/v1/admin/courses/{id}
///
/// Partial update: absent fields are left unchanged.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCourse>,
) -> AppResult<Json<DataResponse<Course>>> {
    if let Some(slug) = input.slug.as_mut() {
        *slug = slug.trim().to_string();
        validate_slug(slug)?;
    }
    input.title = input
        .title
        .map(|t| require_line("Title", &t, MAX_TITLE_LEN))
        .transpose()?;
    input.summary = input.summary.map(|s| sanitize_text(&s, MAX_SUMMARY_LEN));
    input.description = input
        .description
        .map(|s| sanitize_text(&s, MAX_DESCRIPTION_LEN));
    input.modality = input.modality.map(|s| sanitize_line(&s, MAX_MODALITY_LEN));
    if let Some(price) = input.price {
        validate_price(price)?;
    }
    validate_duration(input.duration_hours)?;
    input.currency = input
        .currency
        .map(|c| Currency::parse(&c).map(|c| c.code().to_string()))
        .transpose()?;

    let course = CourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;
    tracing::info!(user_id = admin.user_id, course_id = id, "Course updated");
    Ok(Json(DataResponse { data: course }))
}

/// DELETE /api/v1/admin/courses/{id}
///
/// Financing options are removed with the course.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CourseRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = admin.user_id, course_id = id, "Course deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_published(state: &AppState, slug: &str) -> AppResult<Course> {
    CourseRepo::find_published_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Course",
                key: slug.to_string(),
            })
        })
}

/// Stored currency codes are validated on write; an unknown one is a data
/// error, not a client error.
pub(crate) fn course_currency(course: &Course) -> AppResult<Currency> {
    Currency::parse(&course.currency).map_err(|e| {
        AppError::InternalError(format!("Course {} has bad currency: {e}", course.id))
    })
}

fn course_view(
    state: &AppState,
    course: Course,
    financing: Option<Vec<FinancingQuote>>,
) -> AppResult<CourseView> {
    let price_formatted = format_currency(course.price, course_currency(&course)?);

    let inquiry_link = state.config.contact_whatsapp_phone.as_deref().and_then(|phone| {
        let message = format!("Hola, quiero información sobre el curso {}", course.title);
        whatsapp_link(phone, &message)
            .map_err(|e| tracing::warn!(error = %e, "Invalid contact WhatsApp phone"))
            .ok()
    });

    Ok(CourseView {
        course,
        price_formatted,
        inquiry_link,
        financing,
    })
}

fn validate_price(price: i64) -> Result<(), CoreError> {
    if price < 0 {
        return Err(CoreError::Validation("Price must not be negative".into()));
    }
    Ok(())
}

fn validate_duration(hours: Option<i32>) -> Result<(), CoreError> {
    match hours {
        Some(h) if h <= 0 => Err(CoreError::Validation(
            "Duration must be a positive number of hours".into(),
        )),
        _ => Ok(()),
    }
}
