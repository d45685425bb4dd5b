//! Aggregate queries behind the dashboard. Each method answers one
//! sub-metric so callers can fall back per metric.

use chrono::NaiveDate;
use gridops_core::dashboard::SubstationVisits;
use gridops_core::fault::INACTIVE_STATUSES;
use sqlx::PgPool;

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn server_room_entries_on(pool: &PgPool, day: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM server_room_entries WHERE date = $1",
        )
        .bind(day)
        .fetch_one(pool)
        .await
    }

    pub async fn field_activities_on(pool: &PgPool, day: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM field_activities WHERE date = $1")
            .bind(day)
            .fetch_one(pool)
            .await
    }

    /// Distinct staff with a server-room entry on `day`.
    pub async fn staff_online_on(pool: &PgPool, day: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT staff_id)::BIGINT FROM server_room_entries WHERE date = $1",
        )
        .bind(day)
        .fetch_one(pool)
        .await
    }

    /// Reports whose status is not resolved or closed (exact match).
    pub async fn active_faults(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let inactive: Vec<String> = INACTIVE_STATUSES.iter().map(|s| s.to_string()).collect();
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM fault_reports WHERE NOT (status = ANY($1))",
        )
        .bind(inactive)
        .fetch_one(pool)
        .await
    }

    /// Faults reported per day within `[start, end]`. Days without reports
    /// are absent.
    pub async fn faults_per_day(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (NaiveDate, i64)>(
            "SELECT date_reported, COUNT(*)::BIGINT FROM fault_reports
             WHERE date_reported >= $1 AND date_reported <= $2
             GROUP BY date_reported",
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Distinct staff with server-room entries per day within `[start, end]`.
    pub async fn attendance_per_day(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (NaiveDate, i64)>(
            "SELECT date, COUNT(DISTINCT staff_id)::BIGINT FROM server_room_entries
             WHERE date >= $1 AND date <= $2
             GROUP BY date",
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Substations ranked by activity count. Ties go to the substation
    /// whose first activity has the lower id.
    pub async fn most_visited_substations(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<SubstationVisits>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT substation, COUNT(*)::BIGINT AS visits FROM field_activities
             WHERE substation <> ''
             GROUP BY substation
             ORDER BY visits DESC, MIN(id) ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(name, count)| SubstationVisits { name, count })
            .collect())
    }
}
