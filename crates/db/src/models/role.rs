//! Account roles.
//!
//! Two rows are seeded: `admin` (moderation, catalog and library
//! management) and `user` (everyone who signs up). The id is resolved to
//! its name once at sign-in; access tokens and extractors use the name.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
