//! # rolegate-entity
//!
//! Domain entity models for Rolegate. Every struct in this crate
//! represents a database table row or a value object crossing the
//! store boundary. All entities derive `Debug`, `Clone`, `Serialize`,
//! `Deserialize`, and database rows additionally derive `sqlx::FromRow`.

pub mod audit;
pub mod identity;
pub mod permission;
pub mod refresh_token;
pub mod role;
pub mod user;

pub use audit::AuditRecord;
pub use identity::IdentityInfo;
pub use permission::Permission;
pub use refresh_token::RefreshToken;
pub use role::Role;
pub use user::User;
