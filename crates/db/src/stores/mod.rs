//! Storage seam for the testimonial moderation workflow.
//!
//! The moderation service talks to a [`TestimonialStore`] rather than to the
//! repositories directly, so it can run against PostgreSQL in production and
//! against [`MemoryTestimonialStore`] in tests.

mod memory;
mod postgres;

use async_trait::async_trait;
use campus_core::types::DbId;

use crate::models::testimonial::{
    ApprovedTestimonial, CreatePendingTestimonial, PendingTestimonial, PhotoRef, PhotoReplacement,
};

pub use memory::MemoryTestimonialStore;
pub use postgres::PgTestimonialStore;

/// Pending queue plus published table, as one unit of storage.
#[async_trait]
pub trait TestimonialStore: Send + Sync {
    /// Append a submission to the pending queue.
    async fn submit(
        &self,
        input: CreatePendingTestimonial,
    ) -> Result<PendingTestimonial, sqlx::Error>;

    /// Pending records, newest first.
    async fn list_pending(&self) -> Result<Vec<PendingTestimonial>, sqlx::Error>;

    /// Size of the pending queue.
    async fn count_pending(&self) -> Result<i64, sqlx::Error>;

    /// Atomically move a pending record to the published table.
    ///
    /// `None` when the pending record does not exist (never did, or another
    /// moderator got there first).
    async fn promote(&self, pending_id: DbId)
        -> Result<Option<ApprovedTestimonial>, sqlx::Error>;

    /// Drop a pending record. `false` when it was already gone.
    async fn reject(&self, pending_id: DbId) -> Result<bool, sqlx::Error>;

    /// Published records, newest first.
    async fn list_approved(&self) -> Result<Vec<ApprovedTestimonial>, sqlx::Error>;

    async fn find_approved(&self, id: DbId) -> Result<Option<ApprovedTestimonial>, sqlx::Error>;

    /// Replace the photo reference of a published record.
    ///
    /// Reports the object key that was replaced, read atomically with the
    /// write, so concurrent replacements each learn exactly which object
    /// they superseded.
    async fn set_photo(
        &self,
        id: DbId,
        photo: &PhotoRef,
    ) -> Result<Option<PhotoReplacement>, sqlx::Error>;

    /// Delete a published record, returning what was removed.
    async fn delete_approved(
        &self,
        id: DbId,
    ) -> Result<Option<ApprovedTestimonial>, sqlx::Error>;
}
