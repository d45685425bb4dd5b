pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod exports;
pub mod faults;
pub mod field_activities;
pub mod health;
pub mod server_room;
pub mod staff;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /server-room/                        list, create
/// /server-room-visitors/               list, create
///
/// /field-activities/                   list, create
/// /activity-reports/                   50 most recent activities
///
/// /fault-reports/                      list, create (multipart)
/// /faults/{id}/                        get, patch (auth)
/// /fault-feedbacks/                    create
/// /fault-feedbacks/{fault_id}/         list for one fault
///
/// /dashboard/                          aggregates
/// /daily-records/                      one day's records (auth)
///
/// /export/daily-records/csv/           one day as CSV (auth)
/// /export/field-activities/csv/        all field activities
/// /export/fault-reports/csv/           all fault reports
/// /export/activity-reports/weekly/     activities in a week
/// /export/activity-reports/monthly/    activities in a month
///
/// /auth/token/                         obtain token pair
/// /auth/token/refresh/                 rotate refresh token
/// /auth/user/                          current user (auth)
/// /auth/lookup/                        email to username
/// /auth/set-password/                  initial password
///
/// /staff/                              list, create (admin)
/// /staff/{id}/suspend/                 suspend (admin)
/// /admin/users/                        create login account (admin)
/// /audit-logs/                         recent audit entries (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(server_room::router())
        .merge(field_activities::router())
        .merge(faults::router())
        .merge(dashboard::router())
        .merge(exports::router())
        .merge(auth::router())
        .merge(staff::router())
        .merge(admin::router())
}
