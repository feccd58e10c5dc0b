//! User administration — listing, creation, approval, deletion, role
//! assignment, and orphaned-identity cleanup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_database::stores::{RoleStore, UserStore};
use rolegate_entity::identity::NewIdentity;
use rolegate_entity::user::{NewUser, User};
use rolegate_identity::bridge::IdentityBridge;

use crate::system_admin::is_system_admin;

/// User projection returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// User id.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Whether the account has been approved.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Assigned role names.
    pub roles: Vec<String>,
    /// Derived system-admin flag; computed per read, never stored.
    pub is_system_admin: bool,
}

/// Outcome of the orphaned-identity cleanup state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The email designates the system admin; refused.
    Forbidden,
    /// A business user exists for this email; use the normal delete.
    InUse,
    /// The orphaned identity was deleted.
    Deleted,
    /// No identity found for this email.
    NotFound,
}

/// Handles user administration across both stores.
#[derive(Clone)]
pub struct UserService {
    /// Business user persistence.
    users: Arc<dyn UserStore>,
    /// Role persistence (for assignment by name).
    roles: Arc<dyn RoleStore>,
    /// Credential store boundary.
    bridge: Arc<dyn IdentityBridge>,
    /// Configured system admin email.
    admin_email: String,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        bridge: Arc<dyn IdentityBridge>,
        admin_email: String,
    ) -> Self {
        Self {
            users,
            roles,
            bridge,
            admin_email,
        }
    }

    /// Lists all users.
    pub async fn list(&self) -> AppResult<Vec<UserDto>> {
        let users = self.users.find_all().await?;
        let mut dtos = Vec::with_capacity(users.len());
        for user in &users {
            dtos.push(self.map_user(user).await?);
        }
        Ok(dtos)
    }

    /// Fetches a single user.
    pub async fn get(&self, id: Uuid) -> AppResult<Option<UserDto>> {
        match self.users.find_by_id(id).await? {
            Some(user) => Ok(Some(self.map_user(&user).await?)),
            None => Ok(None),
        }
    }

    /// Creates an account on behalf of an admin. The account is active
    /// immediately — no approval step. Returns `None` when the email is
    /// already taken in the credential store.
    pub async fn create(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<Option<UserDto>> {
        let identity = self
            .bridge
            .create_identity(&NewIdentity {
                email: email.to_string(),
                full_name: full_name.to_string(),
                password: password.to_string(),
            })
            .await?;

        let Some(identity) = identity else {
            return Ok(None);
        };

        let user = match self.users.find_by_email(&identity.email).await? {
            Some(existing) => existing,
            None => {
                self.users
                    .create(&NewUser {
                        id: identity.id,
                        email: identity.email.clone(),
                        full_name: identity.full_name.clone(),
                        is_active: true,
                    })
                    .await?
            }
        };

        info!(user_id = %user.id, "User created by admin");
        Ok(Some(self.map_user(&user).await?))
    }

    /// Updates a user's profile fields. Returns `false` when the user
    /// does not exist.
    pub async fn update(&self, id: Uuid, full_name: &str, email: &str) -> AppResult<bool> {
        let Some(mut user) = self.users.find_by_id(id).await? else {
            return Ok(false);
        };

        user.full_name = full_name.to_string();
        user.email = email.to_string();

        self.users.update(&user).await
    }

    /// Deletes a user from both stores.
    ///
    /// Refused for the system admin. The identity is deleted first; the
    /// business row is only removed after the identity deletion is
    /// confirmed, so a user row never outlives its backing identity by
    /// way of this operation.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let Some(user) = self.users.find_by_id(id).await? else {
            return Ok(false);
        };

        if is_system_admin(&user.email, &self.admin_email) {
            return Ok(false);
        }

        if !self.bridge.delete_identity(user.id).await? {
            warn!(user_id = %user.id, "Identity deletion failed, keeping user row");
            return Ok(false);
        }

        self.users.delete(user.id).await?;
        info!(user_id = %user.id, "User deleted");
        Ok(true)
    }

    /// Approves a pending account. Succeeds (without a write) when the
    /// account is already active; `false` only when the user is missing.
    pub async fn approve(&self, id: Uuid) -> AppResult<bool> {
        let Some(user) = self.users.find_by_id(id).await? else {
            return Ok(false);
        };

        if !user.is_active {
            self.users.set_active(user.id, true).await?;
            info!(user_id = %user.id, "User approved");
        }

        Ok(true)
    }

    /// Removes a credential-store identity that has no business user —
    /// the residue of a failed registration.
    pub async fn cleanup_identity(&self, email: &str) -> AppResult<CleanupOutcome> {
        if is_system_admin(email, &self.admin_email) {
            return Ok(CleanupOutcome::Forbidden);
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Ok(CleanupOutcome::InUse);
        }

        if self.bridge.delete_identity_by_email(email).await? {
            info!(email = %email, "Orphaned identity cleaned up");
            Ok(CleanupOutcome::Deleted)
        } else {
            Ok(CleanupOutcome::NotFound)
        }
    }

    /// Links a role (by name) to a user, mirroring the membership into
    /// the credential store. Idempotent on the link. Returns `false`
    /// when the user or the role does not exist.
    pub async fn assign_role(&self, user_id: Uuid, role_name: &str) -> AppResult<bool> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(false);
        };

        let Some(role) = self.roles.find_by_name(role_name).await? else {
            return Ok(false);
        };

        self.users.add_role(user.id, role.id).await?;

        // Mirror into the credential store. A failure here leaves the
        // two stores out of agreement; surfaced in the logs, not rolled
        // back.
        if let Err(e) = self.bridge.assign_role(user.id, &role.name).await {
            warn!(
                user_id = %user.id,
                role = %role.name,
                error = %e,
                "Role assigned in entity store but identity mirror failed"
            );
        }

        Ok(true)
    }

    /// Unlinks a role (by name) from a user, mirroring the removal into
    /// the credential store. Returns `false` when the user or the role
    /// does not exist.
    pub async fn remove_role(&self, user_id: Uuid, role_name: &str) -> AppResult<bool> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(false);
        };

        let Some(role) = self.roles.find_by_name(role_name).await? else {
            return Ok(false);
        };

        self.users.remove_role(user.id, role.id).await?;

        if let Err(e) = self.bridge.remove_role(user.id, &role.name).await {
            warn!(
                user_id = %user.id,
                role = %role.name,
                error = %e,
                "Role removed in entity store but identity mirror failed"
            );
        }

        Ok(true)
    }

    /// Maps a user row to its client projection, resolving role links
    /// and the derived admin flag.
    async fn map_user(&self, user: &User) -> AppResult<UserDto> {
        let roles = self
            .users
            .roles_of(user.id)
            .await?
            .into_iter()
            .map(|r| r.name)
            .collect();

        Ok(UserDto {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
            roles,
            is_system_admin: is_system_admin(&user.email, &self.admin_email),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::harness;

    #[tokio::test]
    async fn test_admin_created_user_is_active() {
        let h = harness().await;
        let dto = h
            .user_service
            .create("Max Power", "max@x.com", "Passw0rd1")
            .await
            .unwrap()
            .unwrap();

        assert!(dto.is_active);
        assert!(!dto.is_system_admin);
    }

    #[tokio::test]
    async fn test_create_with_taken_email_returns_none() {
        let h = harness().await;
        h.user_service
            .create("Max", "max@x.com", "Passw0rd1")
            .await
            .unwrap();
        let dup = h
            .user_service
            .create("Other", "max@x.com", "Passw0rd1")
            .await
            .unwrap();
        assert!(dup.is_none());
    }

    #[tokio::test]
    async fn test_delete_system_admin_always_refused() {
        let h = harness().await;
        h.bootstrap.run().await.unwrap();

        let admin = h
            .users
            .find_by_email("admin@rolegate.local")
            .await
            .unwrap()
            .unwrap();

        assert!(!h.user_service.delete(admin.id).await.unwrap());
        // Still present in both stores.
        assert!(h.users.find_by_id(admin.id).await.unwrap().is_some());
        assert!(h.bridge.email_exists("admin@rolegate.local").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_identity_then_user() {
        let h = harness().await;
        let dto = h
            .user_service
            .create("Max", "max@x.com", "Passw0rd1")
            .await
            .unwrap()
            .unwrap();

        assert!(h.user_service.delete(dto.id).await.unwrap());
        assert!(h.users.find_by_id(dto.id).await.unwrap().is_none());
        assert!(!h.bridge.email_exists("max@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_keeps_user_row_when_identity_deletion_fails() {
        let h = harness().await;
        let dto = h
            .user_service
            .create("Max", "max@x.com", "Passw0rd1")
            .await
            .unwrap()
            .unwrap();

        // Simulate the identity disappearing underneath us.
        h.bridge.delete_identity(dto.id).await.unwrap();

        assert!(!h.user_service.delete(dto.id).await.unwrap());
        assert!(h.users.find_by_id(dto.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_approve_is_idempotent() {
        let h = harness().await;
        h.access
            .register("Jane", "jane@x.com", "Passw0rd1")
            .await
            .unwrap();
        let jane = h.users.find_by_email("jane@x.com").await.unwrap().unwrap();

        assert!(h.user_service.approve(jane.id).await.unwrap());
        assert!(h.user_service.approve(jane.id).await.unwrap());
        assert!(
            h.users
                .find_by_id(jane.id)
                .await
                .unwrap()
                .unwrap()
                .is_active
        );
    }

    #[tokio::test]
    async fn test_cleanup_state_machine() {
        let h = harness().await;
        h.bootstrap.run().await.unwrap();

        // Forbidden: the system admin, even though a user row exists.
        assert_eq!(
            h.user_service
                .cleanup_identity("admin@rolegate.local")
                .await
                .unwrap(),
            CleanupOutcome::Forbidden
        );

        // InUse: business user exists.
        h.user_service
            .create("Max", "max@x.com", "Passw0rd1")
            .await
            .unwrap();
        assert_eq!(
            h.user_service.cleanup_identity("max@x.com").await.unwrap(),
            CleanupOutcome::InUse
        );

        // Deleted: orphaned identity without a user row.
        h.create_orphan_identity("ghost@x.com", "Passw0rd1").await;
        assert_eq!(
            h.user_service
                .cleanup_identity("ghost@x.com")
                .await
                .unwrap(),
            CleanupOutcome::Deleted
        );

        // NotFound afterwards.
        assert_eq!(
            h.user_service
                .cleanup_identity("ghost@x.com")
                .await
                .unwrap(),
            CleanupOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_assign_role_idempotent_and_mirrored() {
        let h = harness().await;
        h.bootstrap.run().await.unwrap();
        let dto = h
            .user_service
            .create("Max", "max@x.com", "Passw0rd1")
            .await
            .unwrap()
            .unwrap();

        assert!(h.user_service.assign_role(dto.id, "Manager").await.unwrap());
        assert!(h.user_service.assign_role(dto.id, "Manager").await.unwrap());

        let roles = h.users.roles_of(dto.id).await.unwrap();
        assert_eq!(
            roles.iter().filter(|r| r.name == "Manager").count(),
            1,
            "assignment must be set-union, not multiset"
        );

        let identity = h.bridge.find_by_email("max@x.com").await.unwrap().unwrap();
        assert_eq!(
            identity.roles.iter().filter(|r| *r == "Manager").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_assign_unknown_role_fails() {
        let h = harness().await;
        let dto = h
            .user_service
            .create("Max", "max@x.com", "Passw0rd1")
            .await
            .unwrap()
            .unwrap();
        assert!(!h.user_service.assign_role(dto.id, "Nonexistent").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_role_mirrors_both_stores() {
        let h = harness().await;
        h.bootstrap.run().await.unwrap();
        let dto = h
            .user_service
            .create("Max", "max@x.com", "Passw0rd1")
            .await
            .unwrap()
            .unwrap();

        h.user_service.assign_role(dto.id, "Manager").await.unwrap();
        assert!(h.user_service.remove_role(dto.id, "Manager").await.unwrap());

        assert!(h.users.roles_of(dto.id).await.unwrap().is_empty());
        let identity = h.bridge.find_by_email("max@x.com").await.unwrap().unwrap();
        assert!(!identity.roles.contains(&"Manager".to_string()));
    }
}
