//! # rolegate-identity
//!
//! The credential store side of Rolegate: login identities with their
//! password hashes, identity role membership, and refresh token
//! persistence.
//!
//! The rest of the application only sees the [`IdentityBridge`] trait —
//! an opaque capability boundary, so the storage technology behind
//! authentication stays substitutable.

pub mod bridge;
pub mod password;
pub mod pg;

pub use bridge::IdentityBridge;
pub use password::{PasswordHasher, PasswordPolicy};
pub use pg::PgIdentityBridge;
