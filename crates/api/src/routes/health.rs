//! `GET /health`, mounted outside `/api`.
//!
//! Always answers 200 so a load balancer keeps routing while the database
//! is down; the fallback store covers writes in that window.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    /// `ok` or `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl Health {
    fn from_db(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let db = gridops_db::health_check(&state.pool).await;
    if let Err(e) = &db {
        tracing::warn!(error = %e, "Health check could not reach the database");
    }
    Json(Health::from_db(db.is_ok()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
