//! Repository for the `pending_testimonials` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::testimonial::{CreatePendingTestimonial, PendingTestimonial};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, name, role, content, photo_url, submitted_by, created_at, updated_at";

/// Submission and moderation-queue queries.
pub struct PendingTestimonialRepo;

impl PendingTestimonialRepo {
    /// Insert a submission into the moderation queue.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePendingTestimonial,
    ) -> Result<PendingTestimonial, sqlx::Error> {
        let query = format!(
            "INSERT INTO pending_testimonials (name, role, content, photo_url, submitted_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PendingTestimonial>(&query)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.content)
            .bind(&input.photo_url)
            .bind(input.submitted_by)
            .fetch_one(pool)
            .await
    }

    /// All pending records, newest first. Ties on `created_at` (same
    /// transaction) fall back to the id so the order is stable.
    pub async fn list(pool: &PgPool) -> Result<Vec<PendingTestimonial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_testimonials ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PendingTestimonial>(&query)
            .fetch_all(pool)
            .await
    }

    /// Number of records awaiting moderation.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pending_testimonials")
            .fetch_one(pool)
            .await
    }

    /// Find a pending record by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PendingTestimonial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pending_testimonials WHERE id = $1");
        sqlx::query_as::<_, PendingTestimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a pending record. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pending_testimonials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
