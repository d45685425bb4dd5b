use axum::routing::{get, post};
use axum::Router;

use crate::handlers::staff;
use crate::state::AppState;

/// ```text
/// GET          /staff/
/// POST         /staff/                  (admin)
/// POST         /staff/{id}/suspend/     (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/staff/", get(staff::list_staff).post(staff::create_staff))
        .route("/staff/{id}/suspend/", post(staff::suspend_staff))
}
