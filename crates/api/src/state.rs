use std::sync::Arc;

use crate::config::ServerConfig;
use crate::fallback::FallbackStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gridops_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-process records kept when the database rejects a write.
    pub fallback: Arc<FallbackStore>,
}

impl AppState {
    pub fn new(pool: gridops_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            fallback: Arc::new(FallbackStore::default()),
        }
    }
}
