//! Handlers for course financing plans.
//!
//! Public quotes are served through the course handlers; everything here is
//! admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use campus_core::currency::format_currency;
use campus_core::error::CoreError;
use campus_core::financing::{quote, validate_terms, MAX_LABEL_LEN};
use campus_core::types::DbId;
use campus_core::validation::require_line;
use campus_db::models::course::Course;
use campus_db::models::financing::{
    CreateFinancingOption, FinancingOption, UpdateFinancingOption,
};
use campus_db::repositories::{CourseRepo, FinancingRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::courses::course_currency;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// A financing plan with its computed payment schedule.
#[derive(Debug, Serialize)]
pub struct FinancingQuote {
    #[serde(flatten)]
    pub option: FinancingOption,
    pub installment_amount: i64,
    pub installment_formatted: String,
    pub total_amount: i64,
    pub total_formatted: String,
}

/// Price every option against the course price.
pub(crate) fn quote_options(
    course: &Course,
    options: Vec<FinancingOption>,
) -> AppResult<Vec<FinancingQuote>> {
    let currency = course_currency(course)?;
    options
        .into_iter()
        .map(|option| -> AppResult<FinancingQuote> {
            let q = quote(course.price, option.installments, option.monthly_rate_bps)?;
            Ok(FinancingQuote {
                installment_formatted: format_currency(q.installment_amount, currency),
                total_formatted: format_currency(q.total_amount, currency),
                installment_amount: q.installment_amount,
                total_amount: q.total_amount,
                option,
            })
        })
        .collect()
}

/// GET /api/v1/admin/courses/{course_id}/financing
///
/// All plans of a course, inactive ones included.
pub async fn list_for_course(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FinancingQuote>>>> {
    let course = find_course(&state, course_id).await?;
    let options = FinancingRepo::list_for_course(&state.pool, course_id, false).await?;
    Ok(Json(DataResponse {
        data: quote_options(&course, options)?,
    }))
}

/// POST /api/v1/admin/courses/{course_id}/financing
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(course_id): Path<DbId>,
    Json(mut input): Json<CreateFinancingOption>,
) -> AppResult<(StatusCode, Json<DataResponse<FinancingOption>>)> {
    input.label = require_line("Label", &input.label, MAX_LABEL_LEN)?;
    validate_terms(input.installments, input.monthly_rate_bps.unwrap_or(0))?;
    find_course(&state, course_id).await?;

    let option = FinancingRepo::create(&state.pool, course_id, &input).await?;
    tracing::info!(
        user_id = admin.user_id,
        course_id,
        financing_id = option.id,
        "Financing option created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: option })))
}

/// PUT /api/v1/admin/financing/{id}
///
/// Partial update; the merged terms are validated before writing.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateFinancingOption>,
) -> AppResult<Json<DataResponse<FinancingOption>>> {
    let current = FinancingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FinancingOption",
            id,
        }))?;

    input.label = input
        .label
        .map(|l| require_line("Label", &l, MAX_LABEL_LEN))
        .transpose()?;
    validate_terms(
        input.installments.unwrap_or(current.installments),
        input.monthly_rate_bps.unwrap_or(current.monthly_rate_bps),
    )?;

    let option = FinancingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FinancingOption",
            id,
        }))?;
    tracing::info!(user_id = admin.user_id, financing_id = id, "Financing option updated");
    Ok(Json(DataResponse { data: option }))
}

/// DELETE /api/v1/admin/financing/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if FinancingRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = admin.user_id, financing_id = id, "Financing option deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "FinancingOption",
            id,
        }))
    }
}

async fn find_course(state: &AppState, course_id: DbId) -> AppResult<Course> {
    CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))
}
