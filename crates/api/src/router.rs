//! Top-level router: `/health`, `/api`, uploaded media, and the HTTP
//! middleware around them. The server binary and the integration tests
//! both go through [`build_app_router`].

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub fn build_app_router(state: AppState) -> Router {
    let config = state.config.clone();

    let app = mount_media(
        Router::new()
            .merge(routes::health::router())
            .nest("/api", routes::api_routes()),
        &config,
    );

    // Applied bottom-up: CORS ends up outermost and answers preflights
    // before anything else runs.
    app.layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
        .layer(build_cors_layer(&config))
        .with_state(state)
}

/// Serve `media_root` under `media_url`. A media URL of `/` makes the file
/// tree the fallback for every unmatched path.
fn mount_media(router: Router<AppState>, config: &ServerConfig) -> Router<AppState> {
    let files = ServeDir::new(&config.media_root);
    match config.media_url.trim_end_matches('/') {
        "" => router.fallback_service(files),
        prefix => router.nest_service(prefix, files),
    }
}

/// `*` (or no configured origins) allows any origin without credentials.
/// An explicit list allows credentials; unparseable entries are skipped
/// with a warning.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    if config.cors_allows_any() {
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}
