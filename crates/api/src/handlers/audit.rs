//! Audit log listing and the helper other handlers use to append entries.

use axum::extract::{Query, State};
use axum::Json;
use gridops_db::models::audit::{AuditLog, CreateAuditLog};
use gridops_db::repositories::AuditLogRepo;
use gridops_db::DbPool;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<i64>,
}

/// GET /api/audit-logs/?limit=
///
/// Most recent entries first. Admin only.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AuditLogQuery>,
) -> AppResult<Json<Vec<AuditLog>>> {
    let entries = AuditLogRepo::list_recent(&state.pool, params.limit).await?;
    Ok(Json(entries))
}

/// Append an audit entry. A failed write is logged and does not fail the
/// request that triggered it.
pub async fn record(pool: &DbPool, entry: CreateAuditLog) {
    if let Err(e) = AuditLogRepo::insert(pool, &entry).await {
        tracing::warn!(
            action = entry.action,
            model = entry.model_name,
            object_id = %entry.object_id,
            error = %e,
            "Failed to write audit entry",
        );
    }
}
