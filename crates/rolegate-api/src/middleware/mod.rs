//! Route guards.

pub mod rbac;

pub use rbac::require_admin;
