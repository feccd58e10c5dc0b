//! # rolegate-service
//!
//! Business logic service layer for Rolegate. Each service orchestrates
//! the entity store, the identity bridge, and the token issuer to
//! implement application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod access_control;
pub mod bootstrap;
pub mod permission;
pub mod role;
pub mod system_admin;
pub mod user;

#[cfg(test)]
pub(crate) mod testutil;

pub use access_control::{AccessControlService, AuthSession, LoginOutcome};
pub use bootstrap::Bootstrap;
pub use permission::PermissionService;
pub use role::RoleService;
pub use system_admin::is_system_admin;
pub use user::{CleanupOutcome, UserDto, UserService};
