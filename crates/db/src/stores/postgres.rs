use async_trait::async_trait;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::testimonial::{
    ApprovedTestimonial, CreatePendingTestimonial, PendingTestimonial, PhotoRef, PhotoReplacement,
};
use crate::repositories::{PendingTestimonialRepo, TestimonialRepo};
use crate::stores::TestimonialStore;

/// [`TestimonialStore`] backed by the PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct PgTestimonialStore {
    pool: PgPool,
}

impl PgTestimonialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TestimonialStore for PgTestimonialStore {
    async fn submit(
        &self,
        input: CreatePendingTestimonial,
    ) -> Result<PendingTestimonial, sqlx::Error> {
        PendingTestimonialRepo::create(&self.pool, &input).await
    }

    async fn list_pending(&self) -> Result<Vec<PendingTestimonial>, sqlx::Error> {
        PendingTestimonialRepo::list(&self.pool).await
    }

    async fn count_pending(&self) -> Result<i64, sqlx::Error> {
        PendingTestimonialRepo::count(&self.pool).await
    }

    async fn promote(
        &self,
        pending_id: DbId,
    ) -> Result<Option<ApprovedTestimonial>, sqlx::Error> {
        TestimonialRepo::promote(&self.pool, pending_id).await
    }

    async fn reject(&self, pending_id: DbId) -> Result<bool, sqlx::Error> {
        PendingTestimonialRepo::delete(&self.pool, pending_id).await
    }

    async fn list_approved(&self) -> Result<Vec<ApprovedTestimonial>, sqlx::Error> {
        TestimonialRepo::list(&self.pool).await
    }

    async fn find_approved(&self, id: DbId) -> Result<Option<ApprovedTestimonial>, sqlx::Error> {
        TestimonialRepo::find_by_id(&self.pool, id).await
    }

    async fn set_photo(
        &self,
        id: DbId,
        photo: &PhotoRef,
    ) -> Result<Option<PhotoReplacement>, sqlx::Error> {
        TestimonialRepo::set_photo(&self.pool, id, photo).await
    }

    async fn delete_approved(
        &self,
        id: DbId,
    ) -> Result<Option<ApprovedTestimonial>, sqlx::Error> {
        TestimonialRepo::delete(&self.pool, id).await
    }
}
