use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{join_public_url, validate_object_path, ObjectStore, StorageError};

const MEMORY_PUBLIC_URL: &str = "http://storage.test";

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// In-process [`ObjectStore`]. Records how many uploads reached it and can be
/// told to fail them.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    uploads: AtomicUsize,
    fail_uploads: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following upload fail with a backend error.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Number of upload calls received, failed ones included.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects()
            .map(|objects| objects.contains_key(&(bucket.to_string(), path.to_string())))
            .unwrap_or(false)
    }

    /// Number of objects currently stored in `bucket`.
    pub fn object_count(&self, bucket: &str) -> usize {
        self.objects()
            .map(|objects| objects.keys().filter(|(b, _)| b == bucket).count())
            .unwrap_or(0)
    }

    /// Content type recorded for an object.
    pub fn content_type(&self, bucket: &str, path: &str) -> Option<String> {
        self.objects().ok().and_then(|objects| {
            objects
                .get(&(bucket.to_string(), path.to_string()))
                .map(|o| o.content_type.clone())
        })
    }

    fn objects(&self) -> Result<MutexGuard<'_, BTreeMap<(String, String), StoredObject>>, StorageError> {
        self.objects
            .lock()
            .map_err(|_| StorageError::Backend("object store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        validate_object_path(path)?;
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!("put {bucket}/{path}: unavailable")));
        }
        self.objects()?.insert(
            (bucket.to_string(), path.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String, StorageError> {
        join_public_url(MEMORY_PUBLIC_URL, bucket, path)
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        validate_object_path(path)?;
        self.objects()?.remove(&(bucket.to_string(), path.to_string()));
        Ok(())
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        validate_object_path(path)?;
        self.objects()?
            .get(&(bucket.to_string(), path.to_string()))
            .map(|o| o.bytes.clone())
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                path: path.to_string(),
            })
    }
}
