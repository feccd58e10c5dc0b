//! Access control orchestration — registration, login, token refresh,
//! and logout.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use rolegate_auth::jwt::encoder::JwtEncoder;
use rolegate_auth::token::generate_refresh_token;
use rolegate_core::config::{AuthConfig, SeedConfig};
use rolegate_core::result::AppResult;
use rolegate_database::stores::UserStore;
use rolegate_entity::identity::{IdentityInfo, NewIdentity};
use rolegate_entity::user::{NewUser, User};
use rolegate_identity::bridge::IdentityBridge;
use rolegate_identity::password::PasswordPolicy;

use crate::system_admin::is_system_admin;
use crate::user::UserDto;

/// Result of a successful authentication: the token pair plus the
/// user projection the client renders from.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Signed access token.
    pub access_token: String,
    /// Opaque refresh token.
    pub refresh_token: String,
    /// Access token expiry.
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// The authenticated user.
    pub user: UserDto,
}

/// Outcome of a login attempt.
///
/// Unknown email, wrong password, and a missing business account all
/// collapse into `InvalidCredentials` so callers cannot probe which
/// emails are registered.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Credentials valid, account active: tokens issued.
    Success(AuthSession),
    /// Credentials valid but the account awaits admin approval.
    PendingApproval,
    /// Authentication failed.
    InvalidCredentials,
}

/// Orchestrates registration, login, token refresh, and logout across
/// the credential store, entity store, and token issuer.
#[derive(Clone)]
pub struct AccessControlService {
    /// Credential store boundary.
    bridge: Arc<dyn IdentityBridge>,
    /// Business user persistence.
    users: Arc<dyn UserStore>,
    /// Access token issuer.
    encoder: Arc<JwtEncoder>,
    /// Password policy applied at registration.
    policy: PasswordPolicy,
    /// Configured system admin email.
    admin_email: String,
    /// Days a refresh token outlives its access token.
    refresh_extra_days: i64,
}

impl AccessControlService {
    /// Creates a new access control service.
    pub fn new(
        bridge: Arc<dyn IdentityBridge>,
        users: Arc<dyn UserStore>,
        encoder: Arc<JwtEncoder>,
        auth_config: &AuthConfig,
        seed_config: &SeedConfig,
    ) -> Self {
        Self {
            bridge,
            users,
            encoder,
            policy: PasswordPolicy::new(auth_config),
            admin_email: seed_config.admin_email.clone(),
            refresh_extra_days: auth_config.refresh_extra_days,
        }
    }

    /// Registers a new account.
    ///
    /// Creates the login identity first; on success, creates the
    /// business user in pending state unless one already exists for
    /// that email. Returns `false` when the identity could not be
    /// created (email taken).
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<bool> {
        self.policy.validate(password)?;

        let identity = self
            .bridge
            .create_identity(&NewIdentity {
                email: email.to_string(),
                full_name: full_name.to_string(),
                password: password.to_string(),
            })
            .await?;

        let Some(identity) = identity else {
            return Ok(false);
        };

        if self.users.find_by_email(&identity.email).await?.is_none() {
            self.users
                .create(&NewUser {
                    id: identity.id,
                    email: identity.email.clone(),
                    full_name: identity.full_name.clone(),
                    is_active: false,
                })
                .await?;
        }

        info!(user_id = %identity.id, "Account registered, awaiting approval");
        Ok(true)
    }

    /// Performs the login flow:
    ///
    /// 1. Validate credentials against the credential store
    /// 2. Resolve the business user (missing user counts as invalid)
    /// 3. Gate on the approval flag
    /// 4. Issue tokens
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let Some(identity) = self.bridge.validate_credentials(email, password).await? else {
            return Ok(LoginOutcome::InvalidCredentials);
        };

        let Some(user) = self.users.find_by_id(identity.id).await? else {
            warn!(identity_id = %identity.id, "Identity has no business user");
            return Ok(LoginOutcome::InvalidCredentials);
        };

        if !user.is_active {
            return Ok(LoginOutcome::PendingApproval);
        }

        let session = self.issue_tokens(&identity, &user).await?;
        info!(user_id = %user.id, "Login successful");
        Ok(LoginOutcome::Success(session))
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// The presented token must resolve to a live identity whose
    /// business user is still active — a user deactivated after login
    /// cannot refresh. Rotation is at-most-once: the old token is
    /// consumed with a conditional update before anything new is
    /// issued, and the loser of a concurrent race gets `None`.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<Option<AuthSession>> {
        let Some(identity) = self.bridge.find_by_refresh_token(refresh_token).await? else {
            return Ok(None);
        };

        let user = self.users.find_by_id(identity.id).await?;
        let Some(user) = user.filter(|u| u.is_active) else {
            return Ok(None);
        };

        if !self.bridge.consume_refresh_token(refresh_token).await? {
            warn!(user_id = %user.id, "Refresh token lost rotation race");
            return Ok(None);
        }

        let session = self.issue_tokens(&identity, &user).await?;
        info!(user_id = %user.id, "Tokens rotated");
        Ok(Some(session))
    }

    /// Revokes a refresh token. Returns `false` when the token is
    /// unknown; revoking an already-revoked token is not an error.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<bool> {
        self.bridge.revoke_refresh_token(refresh_token).await
    }

    /// Issues an access token and a fresh refresh token.
    ///
    /// The refresh token expiry is anchored to the access token expiry,
    /// not to the current clock.
    async fn issue_tokens(&self, identity: &IdentityInfo, user: &User) -> AppResult<AuthSession> {
        let access =
            self.encoder
                .generate_access_token(identity.id, &identity.email, &identity.roles)?;

        let refresh_token = generate_refresh_token();
        let refresh_expiry = access.expires_at + Duration::days(self.refresh_extra_days);

        self.bridge
            .store_refresh_token(identity.id, &refresh_token, refresh_expiry)
            .await?;

        Ok(AuthSession {
            access_token: access.token,
            refresh_token,
            expires_at: access.expires_at,
            user: UserDto {
                id: identity.id,
                email: identity.email.clone(),
                full_name: identity.full_name.clone(),
                is_active: user.is_active,
                created_at: user.created_at,
                roles: identity.roles.clone(),
                is_system_admin: is_system_admin(&identity.email, &self.admin_email),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{TestHarness, harness};

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_look_alike() {
        let h = harness().await;
        h.register_and_approve("Jane Doe", "jane@x.com", "Passw0rd1")
            .await;

        let unknown = h.access.login("nobody@x.com", "Passw0rd1").await.unwrap();
        let wrong = h.access.login("jane@x.com", "Wrong0rd1").await.unwrap();

        assert!(matches!(unknown, LoginOutcome::InvalidCredentials));
        assert!(matches!(wrong, LoginOutcome::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_without_business_user_is_invalid() {
        let h = harness().await;
        // Identity exists but no business user row (orphaned registration).
        h.create_orphan_identity("ghost@x.com", "Passw0rd1").await;

        let outcome = h.access.login("ghost@x.com", "Passw0rd1").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_pending_account_gets_pending_not_tokens() {
        let h = harness().await;
        assert!(
            h.access
                .register("Jane", "jane@x.com", "Passw0rd1")
                .await
                .unwrap()
        );

        let outcome = h.access.login("jane@x.com", "Passw0rd1").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::PendingApproval));
    }

    #[tokio::test]
    async fn test_register_approve_login_scenario() {
        let h = harness().await;
        assert!(
            h.access
                .register("Jane", "jane@x.com", "Passw0rd1")
                .await
                .unwrap()
        );

        let jane = h.users.find_by_email("jane@x.com").await.unwrap().unwrap();
        assert!(!jane.is_active);

        assert!(h.user_service.approve(jane.id).await.unwrap());

        let outcome = h.access.login("jane@x.com", "Passw0rd1").await.unwrap();
        let LoginOutcome::Success(session) = outcome else {
            panic!("expected successful login after approval");
        };
        assert!(!session.access_token.is_empty());
        assert!(!session.refresh_token.is_empty());
        assert_eq!(session.user.roles, vec!["User".to_string()]);
        assert!(!session.user.is_system_admin);
    }

    #[tokio::test]
    async fn test_register_is_idempotent_on_existing_user_row() {
        let h = harness().await;
        assert!(
            h.access
                .register("Jane", "jane@x.com", "Passw0rd1")
                .await
                .unwrap()
        );
        // Second registration with the same email fails at the identity.
        assert!(
            !h.access
                .register("Jane", "jane@x.com", "Passw0rd1")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_refresh_token_single_use() {
        let h = harness().await;
        let session = h
            .register_and_approve("Jane", "jane@x.com", "Passw0rd1")
            .await;

        let rotated = h.access.refresh(&session.refresh_token).await.unwrap();
        assert!(rotated.is_some());

        // The presented token was consumed; replay fails closed.
        let replay = h.access.refresh(&session.refresh_token).await.unwrap();
        assert!(replay.is_none());
    }

    #[tokio::test]
    async fn test_refresh_rejected_after_deactivation() {
        let h = harness().await;
        let session = h
            .register_and_approve("Jane", "jane@x.com", "Passw0rd1")
            .await;

        let jane = h.users.find_by_email("jane@x.com").await.unwrap().unwrap();
        h.users.set_active(jane.id, false).await.unwrap();

        assert!(
            h.access
                .refresh(&session.refresh_token)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_refresh_expiry_anchored_to_access_expiry() {
        let h = harness().await;
        let session = h
            .register_and_approve("Jane", "jane@x.com", "Passw0rd1")
            .await;

        let stored = h.bridge.stored_token(&session.refresh_token).await;
        assert_eq!(
            stored.expiry_date,
            session.expires_at + Duration::days(7),
        );
    }

    #[tokio::test]
    async fn test_logout_revokes_and_reports_unknown() {
        let h = harness().await;
        let session = h
            .register_and_approve("Jane", "jane@x.com", "Passw0rd1")
            .await;

        assert!(h.access.logout(&session.refresh_token).await.unwrap());
        assert!(
            h.access
                .refresh(&session.refresh_token)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!h.access.logout("no-such-token").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_rejects_policy_violations() {
        let h = harness().await;
        assert!(h.access.register("Jane", "jane@x.com", "short").await.is_err());
        assert!(
            h.access
                .register("Jane", "jane@x.com", "nodigitshere")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_admin_login_carries_system_admin_flag() {
        let h: TestHarness = harness().await;
        h.bootstrap.run().await.unwrap();

        let outcome = h
            .access
            .login("admin@rolegate.local", "ChangeMe123!")
            .await
            .unwrap();
        let LoginOutcome::Success(session) = outcome else {
            panic!("expected admin login to succeed");
        };
        assert!(session.user.is_system_admin);
        assert!(session.user.roles.contains(&"Admin".to_string()));
    }
}
