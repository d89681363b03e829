//! In-process read cache for published testimonial lists.
//!
//! Only keys for which [`CacheKey::is_cacheable`] holds are stored; pending
//! views always read through. Entries expire after a fixed TTL and are
//! dropped eagerly by [`QueryCache::invalidate`] when a mutation lists them.
//!
//! Every invalidation bumps a generation counter. A reader captures it with
//! [`QueryCache::generation`] before going to the store and hands it back to
//! [`QueryCache::put`], which refuses rows read before a later invalidation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use campus_core::cache::CacheKey;
use campus_db::models::testimonial::ApprovedTestimonial;
use tokio::sync::RwLock;

struct CachedList {
    stored_at: Instant,
    rows: Arc<Vec<ApprovedTestimonial>>,
}

/// TTL cache keyed by [`CacheKey`].
///
/// Thread-safe via interior `RwLock`; shared behind an `Arc`.
pub struct QueryCache {
    ttl: Duration,
    /// Bumped under the entries write lock by every invalidation.
    generation: AtomicU64,
    entries: RwLock<HashMap<CacheKey, CachedList>>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            generation: AtomicU64::new(0),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fresh cached rows for `key`, if any.
    pub async fn get(&self, key: CacheKey) -> Option<Arc<Vec<ApprovedTestimonial>>> {
        let entries = self.entries.read().await;
        entries
            .get(&key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.rows))
    }

    /// Current invalidation generation. Capture before reading the rows to
    /// be stored.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store rows for `key`, read while the cache was at generation `seen`.
    ///
    /// Non-cacheable keys and a zero TTL are no-ops. Rows are also dropped
    /// when an invalidation ran after `seen` was captured, since they may
    /// predate the mutation that caused it.
    pub async fn put(&self, key: CacheKey, rows: Arc<Vec<ApprovedTestimonial>>, seen: u64) {
        if !key.is_cacheable() || self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.write().await;
        if self.generation.load(Ordering::Acquire) != seen {
            tracing::debug!(key = %key.as_str(), "Skipping cache fill read before invalidation");
            return;
        }
        entries.insert(
            key,
            CachedList {
                stored_at: Instant::now(),
                rows,
            },
        );
    }

    /// Drop every entry named in `keys`.
    pub async fn invalidate(&self, keys: &[CacheKey]) {
        let mut entries = self.entries.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        for key in keys {
            entries.remove(key);
        }
        tracing::debug!(keys = ?keys, "Cache invalidated");
    }

    /// Number of stored entries, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use campus_core::cache::APPROVED_CHANGE_INVALIDATES;

    use super::*;

    fn row(id: i64) -> ApprovedTestimonial {
        let now = chrono::Utc::now();
        ApprovedTestimonial {
            id,
            name: "Ana".into(),
            role: "Estudiante".into(),
            content: "Excelente".into(),
            photo_url: None,
            photo_path: None,
            source_pending_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn pending_keys_are_never_stored() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache
            .put(CacheKey::PendingList, Arc::new(vec![row(1)]), cache.generation())
            .await;
        assert!(cache.get(CacheKey::PendingList).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn approved_list_is_served_until_invalidated() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let seen = cache.generation();
        cache.put(CacheKey::ApprovedList, Arc::new(vec![row(1)]), seen).await;
        cache.put(CacheKey::AdminApprovedList, Arc::new(vec![row(1)]), seen).await;

        let hit = cache.get(CacheKey::ApprovedList).await.expect("cached");
        assert_eq!(hit.len(), 1);

        cache.invalidate(APPROVED_CHANGE_INVALIDATES).await;
        assert!(cache.get(CacheKey::ApprovedList).await.is_none());
        assert!(cache.get(CacheKey::AdminApprovedList).await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_disables_caching() {
        let cache = QueryCache::new(Duration::ZERO);
        cache
            .put(CacheKey::ApprovedList, Arc::new(vec![row(1)]), cache.generation())
            .await;
        assert!(cache.get(CacheKey::ApprovedList).await.is_none());
    }

    #[tokio::test]
    async fn rows_read_before_an_invalidation_are_not_stored() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let seen = cache.generation();

        cache.invalidate(APPROVED_CHANGE_INVALIDATES).await;
        assert_ne!(cache.generation(), seen);

        cache.put(CacheKey::ApprovedList, Arc::new(vec![]), seen).await;
        assert!(cache.get(CacheKey::ApprovedList).await.is_none());
        assert!(cache.is_empty().await);

        cache
            .put(CacheKey::ApprovedList, Arc::new(vec![row(1)]), cache.generation())
            .await;
        assert_eq!(cache.get(CacheKey::ApprovedList).await.unwrap().len(), 1);
    }
}
