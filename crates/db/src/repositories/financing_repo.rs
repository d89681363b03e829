//! Repository for the `financing_options` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::financing::{CreateFinancingOption, FinancingOption, UpdateFinancingOption};

const COLUMNS: &str = "id, course_id, label, installments, monthly_rate_bps, is_active, \
                       created_at, updated_at";

/// Provides CRUD operations for course financing options.
pub struct FinancingRepo;

impl FinancingRepo {
    /// Attach a financing option to a course.
    pub async fn create(
        pool: &PgPool,
        course_id: DbId,
        input: &CreateFinancingOption,
    ) -> Result<FinancingOption, sqlx::Error> {
        let query = format!(
            "INSERT INTO financing_options (course_id, label, installments, monthly_rate_bps, is_active)
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FinancingOption>(&query)
            .bind(course_id)
            .bind(&input.label)
            .bind(input.installments)
            .bind(input.monthly_rate_bps)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a financing option by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FinancingOption>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM financing_options WHERE id = $1");
        sqlx::query_as::<_, FinancingOption>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the options of a course, fewest installments first.
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: DbId,
        active_only: bool,
    ) -> Result<Vec<FinancingOption>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM financing_options
             WHERE course_id = $1 AND ($2 = false OR is_active = true)
             ORDER BY installments ASC, id ASC"
        );
        sqlx::query_as::<_, FinancingOption>(&query)
            .bind(course_id)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Update an option. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFinancingOption,
    ) -> Result<Option<FinancingOption>, sqlx::Error> {
        let query = format!(
            "UPDATE financing_options SET
                label = COALESCE($2, label),
                installments = COALESCE($3, installments),
                monthly_rate_bps = COALESCE($4, monthly_rate_bps),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FinancingOption>(&query)
            .bind(id)
            .bind(&input.label)
            .bind(input.installments)
            .bind(input.monthly_rate_bps)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete an option. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM financing_options WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
