//! Role entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named role in the business store.
///
/// Role names in use must also exist as identity roles in the
/// credential store; the two stores are kept in agreement by the
/// services that mutate roles.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}
