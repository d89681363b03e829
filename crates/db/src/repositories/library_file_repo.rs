//! Repository for the `library_files` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::library_file::{CreateLibraryFile, LibraryFile};

const COLUMNS: &str = "id, title, description, object_path, public_url, content_type, \
                       size_bytes, uploaded_by, created_at, updated_at";

/// Provides CRUD operations for library files.
pub struct LibraryFileRepo;

impl LibraryFileRepo {
    /// Record an uploaded file.
    pub async fn create(pool: &PgPool, input: &CreateLibraryFile) -> Result<LibraryFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO library_files
                (title, description, object_path, public_url, content_type, size_bytes, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LibraryFile>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.object_path)
            .bind(&input.public_url)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// List all files, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<LibraryFile>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM library_files ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, LibraryFile>(&query).fetch_all(pool).await
    }

    /// Find a file by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LibraryFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM library_files WHERE id = $1");
        sqlx::query_as::<_, LibraryFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a file record, returning it so the caller can remove the object.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<LibraryFile>, sqlx::Error> {
        let query = format!("DELETE FROM library_files WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, LibraryFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
