//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or any executor, where a transaction may be used) as
//! the first argument.

pub mod audit_repo;
pub mod dashboard_repo;
pub mod fault_repo;
pub mod field_activity_repo;
pub mod server_room_repo;
pub mod session_repo;
pub mod staff_repo;
pub mod user_repo;

pub use audit_repo::AuditLogRepo;
pub use dashboard_repo::DashboardRepo;
pub use fault_repo::{FaultFeedbackRepo, FaultRepo};
pub use field_activity_repo::FieldActivityRepo;
pub use server_room_repo::{ServerRoomRepo, VisitorRepo};
pub use session_repo::SessionRepo;
pub use staff_repo::StaffRepo;
pub use user_repo::{SyncOutcome, UserRepo};
