//! Repository for the `user_tokens` table.

use campus_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user_token::UserToken;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, purpose, token_hash, expires_at, consumed_at, created_at, updated_at";

/// Issues and consumes single-use account tokens.
pub struct UserTokenRepo;

impl UserTokenRepo {
    /// Store the hash of a freshly issued token.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        purpose: &str,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<UserToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_tokens (user_id, purpose, token_hash, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserToken>(&query)
            .bind(user_id)
            .bind(purpose)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Atomically mark a token consumed and return it.
    ///
    /// Returns `None` when the hash is unknown, already consumed, expired or
    /// issued for another purpose. A token can only be consumed once even
    /// under concurrent requests.
    pub async fn consume(
        pool: &PgPool,
        token_hash: &str,
        purpose: &str,
    ) -> Result<Option<UserToken>, sqlx::Error> {
        let query = format!(
            "UPDATE user_tokens SET consumed_at = NOW()
             WHERE token_hash = $1
               AND purpose = $2
               AND consumed_at IS NULL
               AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserToken>(&query)
            .bind(token_hash)
            .bind(purpose)
            .fetch_optional(pool)
            .await
    }

    /// Invalidate every outstanding token of a purpose for a user, e.g. older
    /// reset links once a new one is issued.
    pub async fn invalidate_for_user(
        pool: &PgPool,
        user_id: DbId,
        purpose: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_tokens SET consumed_at = NOW()
             WHERE user_id = $1 AND purpose = $2 AND consumed_at IS NULL",
        )
        .bind(user_id)
        .bind(purpose)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
