//! Permission entity.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named permission that can be attached to roles.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Unique permission name, e.g. `"Users.Manage"`.
    pub name: String,
    /// Free-form description.
    pub description: String,
}
