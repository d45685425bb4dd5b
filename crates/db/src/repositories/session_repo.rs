//! Refresh-session storage.
//!
//! A refresh token is single-use: [`SessionRepo::consume`] deletes the
//! session in the same statement that looks it up. Dead sessions of a user
//! are purged whenever that user opens a new one.

use gridops_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{NewRefreshSession, RefreshSession};

pub struct SessionRepo;

impl SessionRepo {
    pub async fn open(
        pool: &PgPool,
        session: &NewRefreshSession,
    ) -> Result<RefreshSession, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let purged = sqlx::query(
            "DELETE FROM user_sessions
              WHERE user_id = $1
                AND (is_revoked OR expires_at <= NOW())",
        )
        .bind(session.user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if purged > 0 {
            tracing::debug!(user_id = session.user_id, purged, "Purged dead refresh sessions");
        }

        let created = sqlx::query_as::<_, RefreshSession>(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, refresh_token_hash, expires_at, is_revoked, created_at",
        )
        .bind(session.user_id)
        .bind(&session.refresh_token_hash)
        .bind(session.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Remove the live session holding `token_hash` and return its user id.
    ///
    /// `None` covers unknown, expired and already-used tokens alike. Two
    /// concurrent callers presenting the same token cannot both succeed.
    pub async fn consume(pool: &PgPool, token_hash: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "DELETE FROM user_sessions
              WHERE refresh_token_hash = $1
                AND NOT is_revoked
                AND expires_at > NOW()
          RETURNING user_id",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }
}
