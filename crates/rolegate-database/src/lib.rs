//! # rolegate-database
//!
//! PostgreSQL connection management, Entity Store trait contracts, and
//! the concrete repository implementations for all Rolegate business
//! entities.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use connection::DatabasePool;
pub use stores::{AuditStore, PermissionStore, RoleStore, UserStore};
