//! Professional profile model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `professionals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Professional {
    pub id: DbId,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub specialties: Vec<String>,
    pub photo_url: Option<String>,
    /// Digits only, country code included.
    pub whatsapp_phone: Option<String>,
    pub email: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a professional profile.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfessional {
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub photo_url: Option<String>,
    pub whatsapp_phone: Option<String>,
    pub email: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for updating a professional profile. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfessional {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub photo_url: Option<String>,
    pub whatsapp_phone: Option<String>,
    pub email: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
