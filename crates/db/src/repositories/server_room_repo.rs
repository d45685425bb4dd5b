//! Repositories for `server_room_entries` and `server_room_visitors`.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::server_room::{
    CreateServerRoomEntry, CreateServerRoomVisitor, ServerRoomEntry, ServerRoomVisitor,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Entry columns selected from alias `e`, joined to staff alias `s`.
const ENTRY_COLUMNS: &str = "\
    e.id, s.name AS staff, e.date, e.time_in, e.time_out, \
    e.reason, e.equipment_touched, e.supervisor";

const VISITOR_COLUMNS: &str = "id, staff_id, name, purpose, date, time_in, time_out";

// ---------------------------------------------------------------------------
// ServerRoomRepo
// ---------------------------------------------------------------------------

/// Server-room visit log.
pub struct ServerRoomRepo;

impl ServerRoomRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateServerRoomEntry,
    ) -> Result<ServerRoomEntry, sqlx::Error> {
        let query = format!(
            "WITH e AS (
                INSERT INTO server_room_entries
                    (staff_id, date, time_in, time_out, reason, equipment_touched, supervisor)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
             )
             SELECT {ENTRY_COLUMNS} FROM e JOIN staff s ON s.id = e.staff_id"
        );
        sqlx::query_as::<_, ServerRoomEntry>(&query)
            .bind(input.staff_id)
            .bind(input.date)
            .bind(input.time_in)
            .bind(input.time_out)
            .bind(&input.reason)
            .bind(&input.equipment_touched)
            .bind(&input.supervisor)
            .fetch_one(pool)
            .await
    }

    /// All entries in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ServerRoomEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM server_room_entries e \
             JOIN staff s ON s.id = e.staff_id ORDER BY e.id"
        );
        sqlx::query_as::<_, ServerRoomEntry>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_date(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<ServerRoomEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM server_room_entries e \
             JOIN staff s ON s.id = e.staff_id WHERE e.date = $1 ORDER BY e.id"
        );
        sqlx::query_as::<_, ServerRoomEntry>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// VisitorRepo
// ---------------------------------------------------------------------------

/// Server-room visitor log.
pub struct VisitorRepo;

impl VisitorRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateServerRoomVisitor,
    ) -> Result<ServerRoomVisitor, sqlx::Error> {
        let query = format!(
            "INSERT INTO server_room_visitors (staff_id, name, purpose, date, time_in, time_out)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {VISITOR_COLUMNS}"
        );
        sqlx::query_as::<_, ServerRoomVisitor>(&query)
            .bind(&input.staff_id)
            .bind(&input.name)
            .bind(&input.purpose)
            .bind(input.date)
            .bind(input.time_in)
            .bind(input.time_out)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ServerRoomVisitor>, sqlx::Error> {
        let query = format!("SELECT {VISITOR_COLUMNS} FROM server_room_visitors ORDER BY id");
        sqlx::query_as::<_, ServerRoomVisitor>(&query)
            .fetch_all(pool)
            .await
    }
}
