use axum::routing::get;
use axum::Router;

use crate::handlers::field_activities;
use crate::state::AppState;

/// ```text
/// GET, POST   /field-activities/
/// GET         /activity-reports/
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/field-activities/",
            get(field_activities::list_activities).post(field_activities::create_activity),
        )
        .route(
            "/activity-reports/",
            get(field_activities::list_activity_reports),
        )
}
