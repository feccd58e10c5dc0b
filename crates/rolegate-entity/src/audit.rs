//! Audit log entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single audit log entry.
///
/// Written on security-relevant mutations; never read in the core flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditRecord {
    /// Unique entry id.
    pub id: Uuid,
    /// Acting user, when known.
    pub user_id: Option<Uuid>,
    /// Short action label, e.g. `"auth.login"`.
    pub action: String,
    /// Client IP address as reported by the HTTP layer.
    pub ip_address: String,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}
