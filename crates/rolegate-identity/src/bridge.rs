//! The identity bridge contract.
//!
//! Everything the rest of the application may ask of the credential
//! store goes through this trait. Password hashes and refresh-token
//! persistence never cross the boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_entity::identity::{IdentityInfo, NewIdentity};

/// Capability boundary over the credential store.
#[async_trait]
pub trait IdentityBridge: Send + Sync {
    /// Verify an email/password pair. Returns the identity when both
    /// match, `None` for an unknown email or a wrong password —
    /// callers cannot tell the two apart.
    async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<Option<IdentityInfo>>;

    /// Create a login identity with the default role attached.
    /// Returns `None` when the email is already taken.
    async fn create_identity(&self, data: &NewIdentity) -> AppResult<Option<IdentityInfo>>;

    /// Check whether an email is already registered.
    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Look up an identity by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<IdentityInfo>>;

    /// Resolve a refresh token to its identity. Only unrevoked,
    /// unexpired tokens resolve.
    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<IdentityInfo>>;

    /// Persist a freshly issued refresh token.
    async fn store_refresh_token(
        &self,
        identity_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Mark a refresh token revoked. Returns `true` if the token
    /// exists, regardless of its previous state (logout semantics).
    async fn revoke_refresh_token(&self, token: &str) -> AppResult<bool>;

    /// Atomically claim a refresh token for rotation: flips the revoked
    /// flag only if the token is currently live. Of two concurrent
    /// callers presenting the same token, exactly one sees `true`.
    async fn consume_refresh_token(&self, token: &str) -> AppResult<bool>;

    /// Create an identity role if it does not exist yet.
    async fn ensure_role(&self, role_name: &str) -> AppResult<()>;

    /// Add an identity to a role (creating the role if needed).
    /// Idempotent. Returns `false` when the identity does not exist.
    async fn assign_role(&self, identity_id: Uuid, role_name: &str) -> AppResult<bool>;

    /// Remove an identity from a role. Idempotent. Returns `false`
    /// when the identity does not exist.
    async fn remove_role(&self, identity_id: Uuid, role_name: &str) -> AppResult<bool>;

    /// Delete an identity by id. Returns `true` if one was deleted.
    async fn delete_identity(&self, identity_id: Uuid) -> AppResult<bool>;

    /// Delete an identity by email. Returns `true` if one was deleted.
    async fn delete_identity_by_email(&self, email: &str) -> AppResult<bool>;
}
