use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST   /auth/token/
/// POST   /auth/token/refresh/
/// GET    /auth/user/            (auth)
/// POST   /auth/lookup/
/// POST   /auth/set-password/
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/token/", post(auth::obtain_token))
        .route("/auth/token/refresh/", post(auth::refresh_token))
        .route("/auth/user/", get(auth::current_user))
        .route("/auth/lookup/", post(auth::lookup_username))
        .route("/auth/set-password/", post(auth::set_password))
}
