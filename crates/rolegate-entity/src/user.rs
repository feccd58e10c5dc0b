//! Business user entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A business user account.
///
/// Shares its id with exactly one credential-store identity carrying
/// the same email. Accounts created through self-registration start
/// inactive and stay that way until an admin approves them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier (same as the identity id).
    pub id: Uuid,
    /// Email address, unique case-insensitively.
    pub email: String,
    /// Human-readable display name.
    pub full_name: String,
    /// Whether the account has been approved for login.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new business user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// User id, taken from the identity created for this account.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Initial activation state: `false` for self-registration,
    /// `true` for admin-created accounts.
    pub is_active: bool,
}
