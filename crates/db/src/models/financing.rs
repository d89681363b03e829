//! Course financing plan model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `financing_options` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FinancingOption {
    pub id: DbId,
    pub course_id: DbId,
    pub label: String,
    pub installments: i32,
    /// Simple monthly interest in basis points.
    pub monthly_rate_bps: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a financing option (course id comes from the path).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFinancingOption {
    pub label: String,
    pub installments: i32,
    pub monthly_rate_bps: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for updating a financing option. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFinancingOption {
    pub label: Option<String>,
    pub installments: Option<i32>,
    pub monthly_rate_bps: Option<i32>,
    pub is_active: Option<bool>,
}
