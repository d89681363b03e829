//! Library file model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `library_files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LibraryFile {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Object key inside the library bucket.
    pub object_path: String,
    pub public_url: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an uploaded library file.
#[derive(Debug, Clone)]
pub struct CreateLibraryFile {
    pub title: String,
    pub description: Option<String>,
    pub object_path: String,
    pub public_url: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<DbId>,
}
