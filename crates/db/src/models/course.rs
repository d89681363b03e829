//! Course catalog model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub description: String,
    /// Price in minor units of `currency`.
    pub price: i64,
    pub currency: String,
    pub duration_hours: Option<i32>,
    pub modality: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a course.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourse {
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub price: i64,
    pub currency: Option<String>,
    pub duration_hours: Option<i32>,
    pub modality: Option<String>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}

/// DTO for updating a course. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourse {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub duration_hours: Option<i32>,
    pub modality: Option<String>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}
