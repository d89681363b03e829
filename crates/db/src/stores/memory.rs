use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use campus_core::types::{DbId, Timestamp};
use chrono::Utc;

use crate::models::testimonial::{
    ApprovedTestimonial, CreatePendingTestimonial, PendingTestimonial, PhotoRef, PhotoReplacement,
};
use crate::stores::TestimonialStore;

#[derive(Debug, Default)]
struct Tables {
    last_pending_id: DbId,
    last_approved_id: DbId,
    pending: BTreeMap<DbId, PendingTestimonial>,
    approved: BTreeMap<DbId, ApprovedTestimonial>,
}

/// In-process [`TestimonialStore`] with the same ordering and atomicity as
/// the PostgreSQL one. Promotion happens under a single lock.
#[derive(Debug, Default)]
pub struct MemoryTestimonialStore {
    tables: Mutex<Tables>,
}

impl MemoryTestimonialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, sqlx::Error> {
        self.tables
            .lock()
            .map_err(|_| sqlx::Error::Protocol("testimonial store lock poisoned".to_string()))
    }
}

fn newest_first<T>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> (Timestamp, DbId)) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[async_trait]
impl TestimonialStore for MemoryTestimonialStore {
    async fn submit(
        &self,
        input: CreatePendingTestimonial,
    ) -> Result<PendingTestimonial, sqlx::Error> {
        let mut tables = self.tables()?;
        tables.last_pending_id += 1;
        let now = Utc::now();
        let row = PendingTestimonial {
            id: tables.last_pending_id,
            name: input.name,
            role: input.role,
            content: input.content,
            photo_url: input.photo_url,
            submitted_by: input.submitted_by,
            created_at: now,
            updated_at: now,
        };
        tables.pending.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_pending(&self) -> Result<Vec<PendingTestimonial>, sqlx::Error> {
        let tables = self.tables()?;
        Ok(newest_first(tables.pending.values().cloned(), |r| {
            (r.created_at, r.id)
        }))
    }

    async fn count_pending(&self) -> Result<i64, sqlx::Error> {
        Ok(self.tables()?.pending.len() as i64)
    }

    async fn promote(
        &self,
        pending_id: DbId,
    ) -> Result<Option<ApprovedTestimonial>, sqlx::Error> {
        let mut tables = self.tables()?;
        let Some(pending) = tables.pending.remove(&pending_id) else {
            return Ok(None);
        };
        tables.last_approved_id += 1;
        let now = Utc::now();
        let row = ApprovedTestimonial {
            id: tables.last_approved_id,
            name: pending.name,
            role: pending.role,
            content: pending.content,
            photo_url: pending.photo_url,
            photo_path: None,
            source_pending_id: Some(pending.id),
            created_at: now,
            updated_at: now,
        };
        tables.approved.insert(row.id, row.clone());
        Ok(Some(row))
    }

    async fn reject(&self, pending_id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.tables()?.pending.remove(&pending_id).is_some())
    }

    async fn list_approved(&self) -> Result<Vec<ApprovedTestimonial>, sqlx::Error> {
        let tables = self.tables()?;
        Ok(newest_first(tables.approved.values().cloned(), |r| {
            (r.created_at, r.id)
        }))
    }

    async fn find_approved(&self, id: DbId) -> Result<Option<ApprovedTestimonial>, sqlx::Error> {
        Ok(self.tables()?.approved.get(&id).cloned())
    }

    async fn set_photo(
        &self,
        id: DbId,
        photo: &PhotoRef,
    ) -> Result<Option<PhotoReplacement>, sqlx::Error> {
        let mut tables = self.tables()?;
        Ok(tables.approved.get_mut(&id).map(|row| {
            row.photo_url = Some(photo.url.clone());
            let previous_photo_path = row.photo_path.replace(photo.path.clone());
            row.updated_at = Utc::now();
            PhotoReplacement {
                testimonial: row.clone(),
                previous_photo_path,
            }
        }))
    }

    async fn delete_approved(
        &self,
        id: DbId,
    ) -> Result<Option<ApprovedTestimonial>, sqlx::Error> {
        Ok(self.tables()?.approved.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str) -> CreatePendingTestimonial {
        CreatePendingTestimonial {
            name: name.to_string(),
            role: "Estudiante".to_string(),
            content: "Excelente".to_string(),
            photo_url: None,
            submitted_by: Some(1),
        }
    }

    #[tokio::test]
    async fn pending_list_is_newest_first() {
        let store = MemoryTestimonialStore::new();
        let first = store.submit(submission("Ana")).await.unwrap();
        let second = store.submit(submission("Luis")).await.unwrap();

        let ids: Vec<DbId> = store.list_pending().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(store.count_pending().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn promote_moves_record_once() {
        let store = MemoryTestimonialStore::new();
        let pending = store.submit(submission("Ana")).await.unwrap();

        let approved = store.promote(pending.id).await.unwrap().unwrap();
        assert_eq!(approved.name, "Ana");
        assert_eq!(approved.source_pending_id, Some(pending.id));
        assert!(store.promote(pending.id).await.unwrap().is_none());
        assert_eq!(store.list_approved().await.unwrap().len(), 1);
        assert_eq!(store.count_pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reject_reports_whether_a_row_was_removed() {
        let store = MemoryTestimonialStore::new();
        let pending = store.submit(submission("Ana")).await.unwrap();

        assert!(store.reject(pending.id).await.unwrap());
        assert!(!store.reject(pending.id).await.unwrap());
        assert!(store.list_approved().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_photo_reports_the_replaced_path() {
        let store = MemoryTestimonialStore::new();
        let pending = store.submit(submission("Ana")).await.unwrap();
        let approved = store.promote(pending.id).await.unwrap().unwrap();

        let photo = |path: &str| PhotoRef {
            url: format!("http://storage.test/{path}"),
            path: path.to_string(),
        };
        let first = store.set_photo(approved.id, &photo("t/a.png")).await.unwrap().unwrap();
        assert_eq!(first.previous_photo_path, None);
        assert_eq!(first.testimonial.photo_path.as_deref(), Some("t/a.png"));

        let second = store.set_photo(approved.id, &photo("t/b.png")).await.unwrap().unwrap();
        assert_eq!(second.previous_photo_path.as_deref(), Some("t/a.png"));
        assert_eq!(second.testimonial.photo_path.as_deref(), Some("t/b.png"));

        assert!(store.set_photo(999, &photo("t/c.png")).await.unwrap().is_none());
    }
}
