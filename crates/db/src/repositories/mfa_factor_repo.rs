//! Repository for the `mfa_factors` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::mfa_factor::MfaFactor;

const COLUMNS: &str = "id, user_id, secret, is_verified, verified_at, created_at, updated_at";

/// Provides CRUD operations for TOTP factors.
pub struct MfaFactorRepo;

impl MfaFactorRepo {
    /// Create an unverified factor holding `secret`.
    pub async fn create(pool: &PgPool, user_id: DbId, secret: &str) -> Result<MfaFactor, sqlx::Error> {
        let query = format!(
            "INSERT INTO mfa_factors (user_id, secret) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MfaFactor>(&query)
            .bind(user_id)
            .bind(secret)
            .fetch_one(pool)
            .await
    }

    /// Find a factor owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<MfaFactor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mfa_factors WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, MfaFactor>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List the verified factors of a user, oldest first.
    pub async fn list_verified(pool: &PgPool, user_id: DbId) -> Result<Vec<MfaFactor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mfa_factors
             WHERE user_id = $1 AND is_verified = true
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, MfaFactor>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the user has at least one verified factor.
    pub async fn has_verified(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM mfa_factors WHERE user_id = $1 AND is_verified = true)",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Mark a factor verified. Returns `true` if the row was updated.
    pub async fn mark_verified(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE mfa_factors SET is_verified = true, verified_at = COALESCE(verified_at, NOW())
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a factor owned by `user_id`. Returns `true` if a row was removed.
    pub async fn delete_for_user(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM mfa_factors WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
