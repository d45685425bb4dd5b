//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the query output
//! - A create DTO for inserts where the API writes the table

pub mod audit;
pub mod fault;
pub mod field_activity;
pub mod server_room;
pub mod session;
pub mod staff;
pub mod user;
