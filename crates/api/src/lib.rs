//! GridOps API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes) so
//! integration tests, the server binary and the admin CLI can share them.

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
