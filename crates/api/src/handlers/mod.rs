//! Request handlers.
//!
//! Each submodule serves one resource. Handlers delegate to the
//! repositories in `gridops_db`, fall back to the in-process store where the
//! endpoint allows it, and map errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod audit;
pub mod auth;
pub mod daily_records;
pub mod dashboard;
pub mod exports;
pub mod faults;
pub mod field_activities;
pub mod server_room;
pub mod staff;
