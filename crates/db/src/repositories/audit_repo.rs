//! Repository for the append-only `audit_logs` table.

use sqlx::{PgExecutor, PgPool};

use crate::models::audit::{AuditLog, CreateAuditLog};

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "id, action, model_name, object_id, username, changes, timestamp";

/// Default and maximum page sizes for [`AuditLogRepo::list_recent`].
pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one entry. Accepts a pool or an open transaction.
    pub async fn insert<'e, E>(executor: E, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO audit_logs (action, model_name, object_id, username, changes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.action)
            .bind(entry.model_name)
            .bind(&entry.object_id)
            .bind(&entry.username)
            .bind(&entry.changes)
            .fetch_one(executor)
            .await
    }

    /// Most recent entries first. `limit` is clamped to `1..=MAX_LIMIT`.
    pub async fn list_recent(pool: &PgPool, limit: Option<i64>) -> Result<Vec<AuditLog>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let query = format!("SELECT {COLUMNS} FROM audit_logs ORDER BY timestamp DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
