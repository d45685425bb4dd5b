//! Refresh sessions (`user_sessions`).

use gridops_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A refresh session. The plaintext token never reaches the database.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

pub struct NewRefreshSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
