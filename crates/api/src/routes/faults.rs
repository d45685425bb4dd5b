use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use gridops_core::fault::MAX_ATTACHMENT_BYTES;

use crate::handlers::faults;
use crate::state::AppState;

/// Upload limit for the multipart form: the attachment plus room for the
/// text fields. Oversize attachments below this get a JSON validation error.
const FAULT_FORM_LIMIT: usize = MAX_ATTACHMENT_BYTES + 2 * 1024 * 1024;

/// ```text
/// GET, POST   /fault-reports/
/// GET, PATCH  /faults/{id}/                  (auth)
/// POST        /fault-feedbacks/
/// GET         /fault-feedbacks/{fault_id}/
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/fault-reports/",
            get(faults::list_faults)
                .post(faults::create_fault)
                .layer(DefaultBodyLimit::max(FAULT_FORM_LIMIT)),
        )
        .route(
            "/faults/{id}/",
            get(faults::get_fault).patch(faults::update_fault),
        )
        .route("/fault-feedbacks/", post(faults::create_feedback))
        .route("/fault-feedbacks/{fault_id}/", get(faults::list_feedback))
}
