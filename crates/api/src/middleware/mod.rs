//! Request guards: [`auth::AuthUser`] for any signed-in account and
//! [`rbac::RequireAdmin`] for staff accounts.

pub mod auth;
pub mod rbac;
