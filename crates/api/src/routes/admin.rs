use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, audit};
use crate::state::AppState;

/// ```text
/// POST   /admin/users/      (admin)
/// GET    /audit-logs/       (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/users/", post(admin::create_user))
        .route("/audit-logs/", get(audit::list_audit_logs))
}
