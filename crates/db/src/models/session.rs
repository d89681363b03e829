//! Refresh-token sessions.
//!
//! One row per issued refresh token. Only the SHA-256 of the token is kept.
//! A row stops being usable once it is revoked (rotation, sign-out, password
//! reset) or its `expires_at` passes.

use campus_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A refresh token about to be handed to a client.
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
