//! Repository for the `courses` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CreateCourse, UpdateCourse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, title, summary, description, price, currency, duration_hours, \
                       modality, image_url, is_published, created_at, updated_at";

/// Provides CRUD operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses
                (slug, title, summary, description, price, currency, duration_hours,
                 modality, image_url, is_published)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), $5, COALESCE($6, 'COP'), $7,
                     $8, $9, COALESCE($10, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.currency)
            .bind(input.duration_hours)
            .bind(&input.modality)
            .bind(&input.image_url)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    /// Find a course by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published course by slug.
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM courses WHERE slug = $1 AND is_published = true");
        sqlx::query_as::<_, Course>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List courses, newest first. `published_only` hides drafts.
    pub async fn list(pool: &PgPool, published_only: bool) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM courses
             WHERE ($1 = false OR is_published = true)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(published_only)
            .fetch_all(pool)
            .await
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                summary = COALESCE($4, summary),
                description = COALESCE($5, description),
                price = COALESCE($6, price),
                currency = COALESCE($7, currency),
                duration_hours = COALESCE($8, duration_hours),
                modality = COALESCE($9, modality),
                image_url = COALESCE($10, image_url),
                is_published = COALESCE($11, is_published)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.currency)
            .bind(input.duration_hours)
            .bind(&input.modality)
            .bind(&input.image_url)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course and, by cascade, its financing options.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
