//! CSV export endpoints.
//!
//! Exports read straight from the database; a failed read is a 500, never
//! a partial file.

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use chrono::Local;
use gridops_core::csv::{attachment_disposition, write_csv, CsvRecord, CSV_CONTENT_TYPE};
use gridops_core::dates::{monthly_range, parse_optional_date, weekly_range, DateRange};
use gridops_db::repositories::{FaultRepo, FieldActivityRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::state::AppState;

const FIELD_ACTIVITIES_FILENAME: &str = "field_activities.csv";
const FAULT_REPORTS_FILENAME: &str = "fault_reports.csv";

/// Build a downloadable CSV response.
pub fn csv_response<T: CsvRecord>(filename: &str, records: &[T]) -> Response {
    (
        [
            (CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, attachment_disposition(filename)),
        ],
        write_csv(records),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub month: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// GET /api/export/field-activities/csv/
pub async fn export_field_activities(State(state): State<AppState>) -> AppResult<Response> {
    let activities = FieldActivityRepo::list(&state.pool).await?;
    Ok(csv_response(FIELD_ACTIVITIES_FILENAME, &activities))
}

/// GET /api/export/fault-reports/csv/
pub async fn export_fault_reports(State(state): State<AppState>) -> AppResult<Response> {
    let faults = FaultRepo::list(&state.pool).await?;
    Ok(csv_response(FAULT_REPORTS_FILENAME, &faults))
}

async fn export_range(state: &AppState, range: DateRange) -> AppResult<Response> {
    let activities = FieldActivityRepo::list_in_range(&state.pool, range.start, range.end).await?;
    tracing::debug!(
        start = %range.start,
        end = %range.end,
        rows = activities.len(),
        "Activity report exported",
    );
    Ok(csv_response(&range.report_filename(), &activities))
}

/// GET /api/export/activity-reports/weekly/?start=&end=
pub async fn export_weekly(
    State(state): State<AppState>,
    Query(params): Query<RangeQuery>,
) -> AppResult<Response> {
    let start = parse_optional_date("start", params.start.as_deref())?;
    let end = parse_optional_date("end", params.end.as_deref())?;
    let range = weekly_range(start, end, Local::now().date_naive())?;
    export_range(&state, range).await
}

/// GET /api/export/activity-reports/monthly/?month=YYYY-MM | start=&end=
pub async fn export_monthly(
    State(state): State<AppState>,
    Query(params): Query<MonthlyQuery>,
) -> AppResult<Response> {
    let start = parse_optional_date("start", params.start.as_deref())?;
    let end = parse_optional_date("end", params.end.as_deref())?;
    let range = monthly_range(params.month.as_deref(), start, end, Local::now().date_naive())?;
    export_range(&state, range).await
}
