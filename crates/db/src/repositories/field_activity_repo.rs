//! Repository for the `field_activities` table.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::field_activity::{CreateFieldActivity, FieldActivity};

/// Columns selected from alias `f`, joined to staff alias `s`.
const COLUMNS: &str = "\
    f.id, s.name AS staff, f.substation, f.date, f.time_out, f.time_returned, \
    f.purpose, f.work_done, f.materials_used, f.supervisor_approval";

/// Shared FROM clause.
const FROM: &str = "FROM field_activities f JOIN staff s ON s.id = f.staff_id";

/// Default size of the recent-activities report.
pub const RECENT_LIMIT: i64 = 50;

pub struct FieldActivityRepo;

impl FieldActivityRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateFieldActivity,
    ) -> Result<FieldActivity, sqlx::Error> {
        let query = format!(
            "WITH f AS (
                INSERT INTO field_activities
                    (staff_id, substation, date, time_out, time_returned,
                     purpose, work_done, materials_used, supervisor_approval)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
             )
             SELECT {COLUMNS} FROM f JOIN staff s ON s.id = f.staff_id"
        );
        sqlx::query_as::<_, FieldActivity>(&query)
            .bind(input.staff_id)
            .bind(&input.substation)
            .bind(input.date)
            .bind(input.time_out)
            .bind(input.time_returned)
            .bind(&input.purpose)
            .bind(&input.work_done)
            .bind(&input.materials_used)
            .bind(&input.supervisor_approval)
            .fetch_one(pool)
            .await
    }

    /// All activities in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<FieldActivity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} ORDER BY f.id");
        sqlx::query_as::<_, FieldActivity>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_date(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<FieldActivity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE f.date = $1 ORDER BY f.id");
        sqlx::query_as::<_, FieldActivity>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Activities dated within `[start, end]`, oldest first.
    pub async fn list_in_range(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FieldActivity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM} WHERE f.date >= $1 AND f.date <= $2 ORDER BY f.date, f.id"
        );
        sqlx::query_as::<_, FieldActivity>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// The `limit` most recent activities by date, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<FieldActivity>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} ORDER BY f.date DESC, f.id DESC LIMIT $1");
        sqlx::query_as::<_, FieldActivity>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
