//! Object storage for uploaded photos and library files.
//!
//! Objects live in named buckets (`testimonials`, `library`) under relative
//! paths. [`S3ObjectStore`] talks to any S3-compatible service;
//! [`MemoryObjectStore`] keeps everything in process for tests.

mod config;
mod memory;
mod s3;

use async_trait::async_trait;

pub use config::StorageConfig;
pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

/// Longest accepted object path.
const MAX_PATH_LEN: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{path}")]
    NotFound { bucket: String, path: String },

    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Bucket-oriented object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `bucket/path`, overwriting any existing object.
    /// Returns the stored path.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Public URL under which `bucket/path` is served.
    fn public_url(&self, bucket: &str, path: &str) -> Result<String, StorageError>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError>;

    /// Fetch the full contents of an object.
    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError>;
}

/// Reject absolute paths, traversal and empty segments before a key reaches
/// the backend.
pub fn validate_object_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() {
        return Err(StorageError::InvalidPath("path must be set".to_string()));
    }
    if path.len() > MAX_PATH_LEN {
        return Err(StorageError::InvalidPath(format!(
            "path exceeds {MAX_PATH_LEN} bytes"
        )));
    }
    if path.starts_with('/') || path.contains('\\') {
        return Err(StorageError::InvalidPath(format!(
            "'{path}' must be relative and use forward slashes"
        )));
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::InvalidPath(format!(
            "'{path}' contains an empty or traversal segment"
        )));
    }
    Ok(())
}

/// Join a public base URL, bucket and path into one URL.
pub(crate) fn join_public_url(base: &str, bucket: &str, path: &str) -> Result<String, StorageError> {
    validate_object_path(path)?;
    let mut url = url::Url::parse(base)
        .map_err(|e| StorageError::Config(format!("Invalid public base URL '{base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| StorageError::Config(format!("Public base URL '{base}' cannot be a base")))?
        .pop_if_empty()
        .push(bucket)
        .extend(path.split('/'));
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn relative_paths_are_accepted() {
        assert!(validate_object_path("testimonials/abc.png").is_ok());
        assert!(validate_object_path("abc.pdf").is_ok());
    }

    #[test]
    fn traversal_and_absolute_paths_are_rejected() {
        for bad in ["", "/etc/passwd", "a/../b", "a//b", "./a", "a\\b"] {
            assert_matches!(
                validate_object_path(bad),
                Err(StorageError::InvalidPath(_)),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn public_url_joins_segments() {
        assert_eq!(
            join_public_url("https://cdn.example.com/storage/", "testimonials", "testimonials/a.png")
                .unwrap(),
            "https://cdn.example.com/storage/testimonials/testimonials/a.png"
        );
        assert_eq!(
            join_public_url("http://localhost:9000", "library", "x.pdf").unwrap(),
            "http://localhost:9000/library/x.pdf"
        );
    }
}
