//! Repository for the `professionals` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::professional::{CreateProfessional, Professional, UpdateProfessional};

const COLUMNS: &str = "id, name, title, bio, specialties, photo_url, whatsapp_phone, email, \
                       sort_order, is_active, created_at, updated_at";

/// Provides CRUD operations for professional profiles.
pub struct ProfessionalRepo;

impl ProfessionalRepo {
    /// Insert a new profile, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProfessional,
    ) -> Result<Professional, sqlx::Error> {
        let query = format!(
            "INSERT INTO professionals
                (name, title, bio, specialties, photo_url, whatsapp_phone, email, sort_order, is_active)
             VALUES ($1, $2, COALESCE($3, ''), $4, $5, $6, $7, COALESCE($8, 0), COALESCE($9, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Professional>(&query)
            .bind(&input.name)
            .bind(&input.title)
            .bind(&input.bio)
            .bind(&input.specialties)
            .bind(&input.photo_url)
            .bind(&input.whatsapp_phone)
            .bind(&input.email)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by ID. `active_only` hides deactivated profiles.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        active_only: bool,
    ) -> Result<Option<Professional>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM professionals
             WHERE id = $1 AND ($2 = false OR is_active = true)"
        );
        sqlx::query_as::<_, Professional>(&query)
            .bind(id)
            .bind(active_only)
            .fetch_optional(pool)
            .await
    }

    /// List profiles by `sort_order`, then name.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Professional>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM professionals
             WHERE ($1 = false OR is_active = true)
             ORDER BY sort_order ASC, name ASC"
        );
        sqlx::query_as::<_, Professional>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Update a profile. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfessional,
    ) -> Result<Option<Professional>, sqlx::Error> {
        let query = format!(
            "UPDATE professionals SET
                name = COALESCE($2, name),
                title = COALESCE($3, title),
                bio = COALESCE($4, bio),
                specialties = COALESCE($5, specialties),
                photo_url = COALESCE($6, photo_url),
                whatsapp_phone = COALESCE($7, whatsapp_phone),
                email = COALESCE($8, email),
                sort_order = COALESCE($9, sort_order),
                is_active = COALESCE($10, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Professional>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.title)
            .bind(&input.bio)
            .bind(&input.specialties)
            .bind(&input.photo_url)
            .bind(&input.whatsapp_phone)
            .bind(&input.email)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a profile. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM professionals WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
