//! Repositories for `fault_reports` and `fault_feedbacks`.

use chrono::NaiveDate;
use gridops_core::types::DbId;
use sqlx::PgPool;

use crate::models::fault::{
    CreateFaultFeedback, CreateFaultReport, FaultFeedback, FaultReport, UpdateFaultReport,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Report columns from alias `f`, with reporter `r` and assignee `a` joined.
const COLUMNS: &str = "\
    f.id, f.title, f.description, f.date_reported, \
    r.name AS reported_by, a.name AS assigned_to, f.assigned_to_id, \
    f.location, f.severity, f.status, f.resolution_remarks, f.attachment";

const JOINS: &str = "\
    LEFT JOIN staff r ON r.id = f.reported_by_id \
    LEFT JOIN staff a ON a.id = f.assigned_to_id";

const FEEDBACK_COLUMNS: &str =
    "id, fault_id, staff_name, staff_email, feedback_text, date_submitted";

// ---------------------------------------------------------------------------
// FaultRepo
// ---------------------------------------------------------------------------

pub struct FaultRepo;

impl FaultRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateFaultReport,
    ) -> Result<FaultReport, sqlx::Error> {
        let query = format!(
            "WITH f AS (
                INSERT INTO fault_reports
                    (title, description, date_reported, reported_by_id, location,
                     severity, status, resolution_remarks, attachment)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
             )
             SELECT {COLUMNS} FROM f {JOINS}"
        );
        sqlx::query_as::<_, FaultReport>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.date_reported)
            .bind(input.reported_by_id)
            .bind(&input.location)
            .bind(&input.severity)
            .bind(&input.status)
            .bind(&input.resolution_remarks)
            .bind(&input.attachment)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FaultReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fault_reports f {JOINS} WHERE f.id = $1");
        sqlx::query_as::<_, FaultReport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM fault_reports WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// All reports in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<FaultReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fault_reports f {JOINS} ORDER BY f.id");
        sqlx::query_as::<_, FaultReport>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_date_reported(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<FaultReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM fault_reports f {JOINS} WHERE f.date_reported = $1 ORDER BY f.id"
        );
        sqlx::query_as::<_, FaultReport>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Columns outside [`UpdateFaultReport`] are
    /// never written. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFaultReport,
    ) -> Result<Option<FaultReport>, sqlx::Error> {
        let query = format!(
            "WITH f AS (
                UPDATE fault_reports SET
                    status = COALESCE($2, status),
                    resolution_remarks = COALESCE($3, resolution_remarks),
                    assigned_to_id = CASE WHEN $4 THEN $5 ELSE assigned_to_id END,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM f {JOINS}"
        );
        let (touch_assignee, assignee) = match input.assigned_to_id {
            Some(value) => (true, value),
            None => (false, None),
        };
        sqlx::query_as::<_, FaultReport>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.resolution_remarks)
            .bind(touch_assignee)
            .bind(assignee)
            .fetch_optional(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// FaultFeedbackRepo
// ---------------------------------------------------------------------------

pub struct FaultFeedbackRepo;

impl FaultFeedbackRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateFaultFeedback,
    ) -> Result<FaultFeedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO fault_feedbacks (fault_id, staff_name, staff_email, feedback_text)
             VALUES ($1, $2, $3, $4)
             RETURNING {FEEDBACK_COLUMNS}"
        );
        sqlx::query_as::<_, FaultFeedback>(&query)
            .bind(input.fault_id)
            .bind(&input.staff_name)
            .bind(&input.staff_email)
            .bind(&input.feedback_text)
            .fetch_one(pool)
            .await
    }

    /// Feedback for one fault, oldest first.
    pub async fn list_for_fault(
        pool: &PgPool,
        fault_id: DbId,
    ) -> Result<Vec<FaultFeedback>, sqlx::Error> {
        let query = format!(
            "SELECT {FEEDBACK_COLUMNS} FROM fault_feedbacks WHERE fault_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, FaultFeedback>(&query)
            .bind(fault_id)
            .fetch_all(pool)
            .await
    }
}
