use axum::routing::get;
use axum::Router;

use crate::handlers::{daily_records, dashboard};
use crate::state::AppState;

/// ```text
/// GET   /dashboard/
/// GET   /daily-records/?date=     (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/", get(dashboard::get_dashboard))
        .route("/daily-records/", get(daily_records::get_daily_records))
}
