//! Single-use account tokens (password reset, email confirmation).

use campus_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Token issued for a password reset request.
pub const PURPOSE_PASSWORD_RESET: &str = "password_reset";

/// Token issued at sign-up to confirm the email address.
pub const PURPOSE_EMAIL_CONFIRMATION: &str = "email_confirmation";

/// A row from the `user_tokens` table. Only the SHA-256 hash of the token
/// is stored.
#[derive(Debug, Clone, FromRow)]
pub struct UserToken {
    pub id: DbId,
    pub user_id: DbId,
    pub purpose: String,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
