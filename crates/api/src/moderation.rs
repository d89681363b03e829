//! Testimonial moderation workflow.
//!
//! Submissions enter the pending queue; an admin approves (promotes to the
//! published table) or rejects (drops) each one. Published records may get a
//! photo or be deleted. Every mutation invalidates the read views listed in
//! [`campus_core::cache`] and publishes a [`PlatformEvent`] naming them, which
//! the admin changefeed relays to connected panels.

use std::sync::Arc;
use std::time::Duration;

use campus_core::cache::{
    CacheKey, APPROVED_CHANGE_INVALIDATES, APPROVE_INVALIDATES, REJECT_INVALIDATES,
    SUBMIT_INVALIDATES,
};
use campus_core::error::CoreError;
use campus_core::testimonial::{CleanSubmission, Decision};
use campus_core::types::DbId;
use campus_core::uploads::{object_name, validate_upload, UploadKind, BUCKET_TESTIMONIALS};
use campus_db::models::testimonial::{
    ApprovedTestimonial, CreatePendingTestimonial, PendingTestimonial, PhotoRef,
};
use campus_db::stores::TestimonialStore;
use campus_events::bus::{
    TESTIMONIAL_APPROVED, TESTIMONIAL_DELETED, TESTIMONIAL_PHOTO_UPDATED, TESTIMONIAL_REJECTED,
    TESTIMONIAL_SUBMITTED,
};
use campus_events::{EventBus, PlatformEvent};
use campus_storage::ObjectStore;
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;

use crate::cache::QueryCache;
use crate::error::AppResult;

/// Object key prefix for testimonial photos.
const PHOTO_PREFIX: &str = "testimonials";

const ENTITY_PENDING: &str = "pending_testimonial";
const ENTITY_APPROVED: &str = "testimonial";

/// Result of an approve or reject call.
#[derive(Debug, Clone, Serialize)]
pub struct ModerationOutcome {
    /// The pending record the decision applied to.
    pub id: DbId,
    pub decision: Decision,
    /// Whether this call removed the pending record. A repeated reject
    /// reports `false`.
    pub removed: bool,
}

pub struct ModerationService {
    store: Arc<dyn TestimonialStore>,
    objects: Arc<dyn ObjectStore>,
    cache: QueryCache,
    events: Arc<EventBus>,
}

impl ModerationService {
    pub fn new(
        store: Arc<dyn TestimonialStore>,
        objects: Arc<dyn ObjectStore>,
        events: Arc<EventBus>,
        approved_cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            objects,
            cache: QueryCache::new(approved_cache_ttl),
            events,
        }
    }

    // -----------------------------------------------------------------------
    // Pending queue
    // -----------------------------------------------------------------------

    /// Append a sanitized submission to the pending queue.
    pub async fn submit(
        &self,
        submitted_by: DbId,
        submission: CleanSubmission,
    ) -> AppResult<PendingTestimonial> {
        let pending = self
            .store
            .submit(CreatePendingTestimonial {
                name: submission.name,
                role: submission.role,
                content: submission.content,
                photo_url: None,
                submitted_by: Some(submitted_by),
            })
            .await?;

        tracing::info!(
            user_id = submitted_by,
            pending_id = pending.id,
            "Testimonial submitted for moderation"
        );
        self.notify(
            PlatformEvent::new(TESTIMONIAL_SUBMITTED)
                .with_source(ENTITY_PENDING, pending.id)
                .with_actor(submitted_by),
            SUBMIT_INVALIDATES,
        )
        .await;

        Ok(pending)
    }

    /// Pending records, newest first. Always read through.
    pub async fn list_pending(&self) -> AppResult<Vec<PendingTestimonial>> {
        Ok(self.store.list_pending().await?)
    }

    /// Size of the pending queue. Always read through.
    pub async fn count_pending(&self) -> AppResult<i64> {
        Ok(self.store.count_pending().await?)
    }

    /// Promote a pending record to the published table.
    ///
    /// Fails with `NotFound` when the record is gone, including when a
    /// concurrent approve or reject won the race.
    pub async fn approve(&self, pending_id: DbId, actor: DbId) -> AppResult<ModerationOutcome> {
        let approved = self
            .store
            .promote(pending_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "PendingTestimonial",
                id: pending_id,
            })?;

        tracing::info!(
            user_id = actor,
            pending_id,
            testimonial_id = approved.id,
            "Testimonial approved"
        );
        self.notify(
            PlatformEvent::new(TESTIMONIAL_APPROVED)
                .with_source(ENTITY_PENDING, pending_id)
                .with_actor(actor)
                .with_payload(json!({ "testimonial_id": approved.id })),
            APPROVE_INVALIDATES,
        )
        .await;

        Ok(ModerationOutcome {
            id: pending_id,
            decision: Decision::Approved,
            removed: true,
        })
    }

    /// Drop a pending record. Rejecting an absent record succeeds.
    pub async fn reject(&self, pending_id: DbId, actor: DbId) -> AppResult<ModerationOutcome> {
        let removed = self.store.reject(pending_id).await?;

        tracing::info!(user_id = actor, pending_id, removed, "Testimonial rejected");
        if removed {
            self.notify(
                PlatformEvent::new(TESTIMONIAL_REJECTED)
                    .with_source(ENTITY_PENDING, pending_id)
                    .with_actor(actor),
                REJECT_INVALIDATES,
            )
            .await;
        }

        Ok(ModerationOutcome {
            id: pending_id,
            decision: Decision::Rejected,
            removed,
        })
    }

    // -----------------------------------------------------------------------
    // Published records
    // -----------------------------------------------------------------------

    /// Published testimonials for the public site.
    pub async fn list_published(&self) -> AppResult<Arc<Vec<ApprovedTestimonial>>> {
        self.cached_approved(CacheKey::ApprovedList).await
    }

    /// Published testimonials for the admin panel.
    pub async fn list_approved_for_admin(&self) -> AppResult<Arc<Vec<ApprovedTestimonial>>> {
        self.cached_approved(CacheKey::AdminApprovedList).await
    }

    /// Validate, store and attach a photo to a published testimonial.
    ///
    /// The upload policy is checked before any storage call. On any failure
    /// the previous photo reference is left unchanged and the new object, if
    /// already stored, is removed. The object superseded by the swap is
    /// removed afterwards.
    pub async fn attach_photo(
        &self,
        id: DbId,
        content_type: &str,
        bytes: Vec<u8>,
        actor: DbId,
    ) -> AppResult<ApprovedTestimonial> {
        let ext = validate_upload(UploadKind::Photo, content_type, bytes.len())?;

        if self.store.find_approved(id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "Testimonial",
                id,
            }
            .into());
        }

        let path = object_name(PHOTO_PREFIX, ext);
        let url = self.objects.public_url(BUCKET_TESTIMONIALS, &path)?;
        self.objects
            .upload(BUCKET_TESTIMONIALS, &path, bytes, content_type)
            .await?;

        let photo = PhotoRef {
            url,
            path: path.clone(),
        };
        let replaced = match self.store.set_photo(id, &photo).await {
            Ok(Some(replaced)) => replaced,
            Ok(None) => {
                self.remove_photo(&path).await;
                return Err(CoreError::NotFound {
                    entity: "Testimonial",
                    id,
                }
                .into());
            }
            Err(e) => {
                self.remove_photo(&path).await;
                return Err(e.into());
            }
        };

        if let Some(previous) = replaced.previous_photo_path.as_deref().filter(|p| *p != path) {
            self.remove_photo(previous).await;
        }

        tracing::info!(user_id = actor, testimonial_id = id, path = %path, "Testimonial photo updated");
        self.notify(
            PlatformEvent::new(TESTIMONIAL_PHOTO_UPDATED)
                .with_source(ENTITY_APPROVED, id)
                .with_actor(actor),
            APPROVED_CHANGE_INVALIDATES,
        )
        .await;

        Ok(replaced.testimonial)
    }

    /// Delete a published testimonial and, best-effort, its stored photo.
    pub async fn delete_approved(&self, id: DbId, actor: DbId) -> AppResult<()> {
        let removed = self
            .store
            .delete_approved(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Testimonial",
                id,
            })?;

        if let Some(path) = removed.photo_path.as_deref() {
            self.remove_photo(path).await;
        }

        tracing::info!(user_id = actor, testimonial_id = id, "Testimonial deleted");
        self.notify(
            PlatformEvent::new(TESTIMONIAL_DELETED)
                .with_source(ENTITY_APPROVED, id)
                .with_actor(actor),
            APPROVED_CHANGE_INVALIDATES,
        )
        .await;

        Ok(())
    }

    /// Subscribe to moderation events (for the admin changefeed).
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.events.subscribe()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn cached_approved(&self, key: CacheKey) -> AppResult<Arc<Vec<ApprovedTestimonial>>> {
        if let Some(rows) = self.cache.get(key).await {
            return Ok(rows);
        }
        let seen = self.cache.generation();
        let rows = Arc::new(self.store.list_approved().await?);
        self.cache.put(key, Arc::clone(&rows), seen).await;
        Ok(rows)
    }

    async fn notify(&self, event: PlatformEvent, invalidates: &[CacheKey]) {
        self.cache.invalidate(invalidates).await;
        self.events.publish(event.with_invalidations(invalidates));
    }

    async fn remove_photo(&self, path: &str) {
        if let Err(e) = self.objects.remove(BUCKET_TESTIMONIALS, path).await {
            tracing::warn!(error = %e, path, "Failed to remove stored photo");
        }
    }
}
