//! Repository for the `users` table.

use std::collections::HashSet;

use gridops_core::audit::{actions, models, Changes};
use gridops_core::types::DbId;
use gridops_core::username_sync::{PlannedRename, SyncCandidate, SyncField};
use sqlx::PgPool;

use crate::models::audit::CreateAuditLog;
use crate::models::user::{CreateUser, User};
use crate::repositories::AuditLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, staff_id, password_hash, is_staff, is_active, \
                        created_at, updated_at";

/// Result of applying a username sync plan.
#[derive(Debug, Default)]
pub struct SyncOutcome {
    pub applied: Vec<PlannedRename>,
    /// Renames dropped because the user vanished or the username was taken
    /// by the time of the write.
    pub skipped: Vec<PlannedRename>,
}

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, staff_id, password_hash, is_staff)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.staff_id)
            .bind(&input.password_hash)
            .bind(input.is_staff)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username ignoring case. An exact match wins over a
    /// case-folded one.
    pub async fn find_by_username_ci(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE LOWER(username) = LOWER($1)
             ORDER BY (username = $1) DESC, id LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email ignoring case and surrounding whitespace.
    /// The oldest account wins when several share an address.
    pub async fn find_by_email_ci(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE email <> '' AND LOWER(TRIM(email)) = LOWER(TRIM($1))
             ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Store a password hash and, when given, a new email.
    pub async fn set_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                password_hash = $2,
                email = COALESCE($3, email),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .bind(email)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Username sync
    // -----------------------------------------------------------------------

    /// Users with a non-empty value in `field`, in id order.
    pub async fn list_sync_candidates(
        pool: &PgPool,
        field: SyncField,
    ) -> Result<Vec<SyncCandidate>, sqlx::Error> {
        let column = match field {
            SyncField::StaffId => "staff_id",
            SyncField::Email => "email",
        };
        let query = format!(
            "SELECT id, username, TRIM({column}) FROM users
             WHERE TRIM(COALESCE({column}, '')) <> ''
             ORDER BY id"
        );
        let rows = sqlx::query_as::<_, (DbId, String, String)>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(user_id, username, source)| SyncCandidate {
                user_id,
                username,
                source,
            })
            .collect())
    }

    pub async fn all_usernames(pool: &PgPool) -> Result<HashSet<String>, sqlx::Error> {
        let names = sqlx::query_scalar::<_, String>("SELECT username FROM users")
            .fetch_all(pool)
            .await?;
        Ok(names.into_iter().collect())
    }

    /// Apply planned renames in one transaction.
    ///
    /// Each rename re-checks, inside the transaction, that the user still
    /// exists and that no other user holds the target username. Conflicting
    /// renames are skipped. Every applied rename gets an audit entry.
    pub async fn apply_username_sync(
        pool: &PgPool,
        renames: &[PlannedRename],
        field: SyncField,
    ) -> Result<SyncOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut outcome = SyncOutcome::default();

        for rename in renames {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
            )
            .bind(rename.user_id)
            .fetch_one(&mut *tx)
            .await?;

            let conflict = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id <> $2)",
            )
            .bind(&rename.to)
            .bind(rename.user_id)
            .fetch_one(&mut *tx)
            .await?;

            if !exists || conflict {
                tracing::warn!(
                    user_id = rename.user_id,
                    username = %rename.to,
                    "Skipping username sync: conflict or missing user",
                );
                outcome.skipped.push(rename.clone());
                continue;
            }

            sqlx::query("UPDATE users SET username = $2, updated_at = NOW() WHERE id = $1")
                .bind(rename.user_id)
                .bind(&rename.to)
                .execute(&mut *tx)
                .await?;

            let changes = Changes::new()
                .diff("username", rename.from.as_str(), rename.to.as_str())
                .set("source_field", field.as_str());
            AuditLogRepo::insert(
                &mut *tx,
                &CreateAuditLog {
                    action: actions::SYNC,
                    model_name: models::USER,
                    object_id: rename.user_id.to_string(),
                    username: None,
                    changes: changes.into_value(),
                },
            )
            .await?;

            outcome.applied.push(rename.clone());
        }

        tx.commit().await?;
        Ok(outcome)
    }
}
