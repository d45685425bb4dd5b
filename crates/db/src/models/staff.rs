//! Staff entity model and DTOs.

use gridops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `staff` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Staff {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a staff member through the admin endpoint.
#[derive(Debug, Deserialize)]
pub struct CreateStaff {
    pub name: String,
    #[serde(default)]
    pub email: String,
}
