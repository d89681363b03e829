//! TOTP second-factor model.

use campus_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `mfa_factors` table.
///
/// A factor is created unverified at enrollment and only counts toward
/// sign-in once a code has been verified against it.
#[derive(Debug, Clone, FromRow)]
pub struct MfaFactor {
    pub id: DbId,
    pub user_id: DbId,
    pub secret: String,
    pub is_verified: bool,
    pub verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
