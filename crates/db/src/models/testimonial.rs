//! Pending and published testimonial models.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `pending_testimonials` table, awaiting moderation.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PendingTestimonial {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub content: String,
    pub photo_url: Option<String>,
    pub submitted_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `testimonials` table, visible on public pages.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ApprovedTestimonial {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub content: String,
    pub photo_url: Option<String>,
    /// Object key of the stored photo, used for cleanup.
    #[serde(skip)]
    pub photo_path: Option<String>,
    pub source_pending_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a pending testimonial. Fields are already sanitized.
#[derive(Debug, Clone)]
pub struct CreatePendingTestimonial {
    pub name: String,
    pub role: String,
    pub content: String,
    pub photo_url: Option<String>,
    pub submitted_by: Option<DbId>,
}

/// New photo reference for a published testimonial.
#[derive(Debug, Clone)]
pub struct PhotoRef {
    pub url: String,
    pub path: String,
}

/// Outcome of swapping a photo reference: the updated row and the object key
/// it pointed at immediately before the swap.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PhotoReplacement {
    #[sqlx(flatten)]
    pub testimonial: ApprovedTestimonial,
    pub previous_photo_path: Option<String>,
}
