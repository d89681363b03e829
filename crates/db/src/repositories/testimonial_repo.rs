//! Repository for the published `testimonials` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::testimonial::{
    ApprovedTestimonial, PendingTestimonial, PhotoRef, PhotoReplacement,
};
use crate::repositories::pending_testimonial_repo::COLUMNS as PENDING_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, role, content, photo_url, photo_path, source_pending_id, \
                       created_at, updated_at";

/// [`COLUMNS`] prefixed with a table alias, for statements joining another
/// relation with overlapping column names.
fn qualified_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Published testimonials and the promotion out of the pending queue.
pub struct TestimonialRepo;

impl TestimonialRepo {
    /// Move a pending record into the published table.
    ///
    /// Runs in one transaction that starts with a conditional delete of the
    /// pending row. Concurrent promotions of the same id serialize on the row
    /// lock; the loser deletes nothing and gets `None`. Returns `None` as well
    /// when the id never existed.
    pub async fn promote(
        pool: &PgPool,
        pending_id: DbId,
    ) -> Result<Option<ApprovedTestimonial>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let delete_query = format!(
            "DELETE FROM pending_testimonials WHERE id = $1 RETURNING {PENDING_COLUMNS}"
        );
        let pending = sqlx::query_as::<_, PendingTestimonial>(&delete_query)
            .bind(pending_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(pending) = pending else {
            tx.rollback().await?;
            return Ok(None);
        };

        let insert_query = format!(
            "INSERT INTO testimonials (name, role, content, photo_url, source_pending_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let approved = sqlx::query_as::<_, ApprovedTestimonial>(&insert_query)
            .bind(&pending.name)
            .bind(&pending.role)
            .bind(&pending.content)
            .bind(&pending.photo_url)
            .bind(pending.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(approved))
    }

    /// All published testimonials, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ApprovedTestimonial>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM testimonials ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, ApprovedTestimonial>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a published testimonial by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ApprovedTestimonial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM testimonials WHERE id = $1");
        sqlx::query_as::<_, ApprovedTestimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Point the record at a newly stored photo.
    ///
    /// The previous `photo_path` is read under a row lock in the same
    /// statement, so of two concurrent swaps the later one reports the
    /// earlier one's object as replaced. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn set_photo(
        pool: &PgPool,
        id: DbId,
        photo: &PhotoRef,
    ) -> Result<Option<PhotoReplacement>, sqlx::Error> {
        let query = format!(
            "WITH old AS (
                 SELECT id, photo_path FROM testimonials WHERE id = $1 FOR UPDATE
             )
             UPDATE testimonials t SET photo_url = $2, photo_path = $3
             FROM old
             WHERE t.id = old.id
             RETURNING {}, old.photo_path AS previous_photo_path",
            qualified_columns("t")
        );
        sqlx::query_as::<_, PhotoReplacement>(&query)
            .bind(id)
            .bind(&photo.url)
            .bind(&photo.path)
            .fetch_optional(pool)
            .await
    }

    /// Delete a published testimonial, returning the removed row so the
    /// caller can clean up its photo.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ApprovedTestimonial>, sqlx::Error> {
        let query = format!("DELETE FROM testimonials WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ApprovedTestimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
