use axum::routing::get;
use axum::Router;

use crate::handlers::server_room;
use crate::state::AppState;

/// ```text
/// GET, POST   /server-room/
/// GET, POST   /server-room-visitors/
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/server-room/",
            get(server_room::list_entries).post(server_room::create_entry),
        )
        .route(
            "/server-room-visitors/",
            get(server_room::list_visitors).post(server_room::create_visitor),
        )
}
