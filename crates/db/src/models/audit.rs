//! Audit log entity model and DTO. Entries are immutable once written.

use gridops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub action: String,
    pub model_name: String,
    pub object_id: String,
    /// Username of the acting account; `None` for anonymous or CLI actions.
    pub username: Option<String>,
    pub changes: serde_json::Value,
    pub timestamp: Timestamp,
}

/// DTO for appending an audit entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub action: &'static str,
    pub model_name: &'static str,
    pub object_id: String,
    pub username: Option<String>,
    pub changes: serde_json::Value,
}
