//! Domain logic for the GridOps facility-operations backend.
//!
//! Everything in this crate is free of I/O so it can be shared by the
//! repository layer, the HTTP API and the admin CLI.

pub mod account;
pub mod audit;
pub mod csv;
pub mod daily_records;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod fault;
pub mod payload;
pub mod types;
pub mod username_sync;
