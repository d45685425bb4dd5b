use axum::routing::get;
use axum::Router;

use crate::handlers::{daily_records, exports};
use crate::state::AppState;

/// ```text
/// GET   /export/daily-records/csv/?date=                     (auth)
/// GET   /export/field-activities/csv/
/// GET   /export/fault-reports/csv/
/// GET   /export/activity-reports/weekly/?start=&end=
/// GET   /export/activity-reports/monthly/?month=|start=&end=
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/export/daily-records/csv/",
            get(daily_records::export_daily_records),
        )
        .route(
            "/export/field-activities/csv/",
            get(exports::export_field_activities),
        )
        .route(
            "/export/fault-reports/csv/",
            get(exports::export_fault_reports),
        )
        .route(
            "/export/activity-reports/weekly/",
            get(exports::export_weekly),
        )
        .route(
            "/export/activity-reports/monthly/",
            get(exports::export_monthly),
        )
}
