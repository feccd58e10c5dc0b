//! Refresh token entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored refresh token.
///
/// Tokens are opaque random strings keyed by their own value. They are
/// never deleted, only flagged revoked, so a presented token can always
/// be told apart from one that never existed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// The opaque token value (primary key).
    pub token: String,
    /// The identity this token was issued to.
    pub identity_id: Uuid,
    /// Absolute expiry.
    pub expiry_date: DateTime<Utc>,
    /// Whether the token has been revoked (logout or rotation).
    pub is_revoked: bool,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Check whether the token can still be exchanged: not revoked and
    /// not past its expiry.
    pub fn is_usable(&self) -> bool {
        !self.is_revoked && self.expiry_date > Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(expires_in: Duration, revoked: bool) -> RefreshToken {
        RefreshToken {
            token: "t".to_string(),
            identity_id: Uuid::new_v4(),
            expiry_date: Utc::now() + expires_in,
            is_revoked: revoked,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_usable_when_live() {
        assert!(token(Duration::hours(1), false).is_usable());
    }

    #[test]
    fn test_unusable_when_revoked_or_expired() {
        assert!(!token(Duration::hours(1), true).is_usable());
        assert!(!token(Duration::hours(-1), false).is_usable());
    }
}
