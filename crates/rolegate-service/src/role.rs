//! Role administration.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_database::stores::{PermissionStore, RoleStore};
use rolegate_entity::role::Role;
use rolegate_identity::bridge::IdentityBridge;

/// Handles role CRUD and permission attachment.
///
/// Role names are mirrored into the credential store on create and
/// update so both stores agree on the set of role names in use.
#[derive(Clone)]
pub struct RoleService {
    /// Role persistence.
    roles: Arc<dyn RoleStore>,
    /// Permission persistence.
    permissions: Arc<dyn PermissionStore>,
    /// Credential store boundary.
    bridge: Arc<dyn IdentityBridge>,
}

impl RoleService {
    /// Creates a new role service.
    pub fn new(
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        bridge: Arc<dyn IdentityBridge>,
    ) -> Self {
        Self {
            roles,
            permissions,
            bridge,
        }
    }

    /// Lists all roles.
    pub async fn list(&self) -> AppResult<Vec<Role>> {
        self.roles.find_all().await
    }

    /// Creates a role, ensuring the name exists in the credential store
    /// first.
    pub async fn create(&self, name: &str, description: &str) -> AppResult<Role> {
        self.bridge.ensure_role(name).await?;

        let role = self
            .roles
            .create(&Role {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: description.to_string(),
            })
            .await?;

        info!(role = %role.name, "Role created");
        Ok(role)
    }

    /// Renames or redescribes a role. The new name is ensured in the
    /// credential store. Returns `false` when the role does not exist.
    pub async fn update(&self, id: Uuid, name: &str, description: &str) -> AppResult<bool> {
        let Some(mut role) = self.roles.find_by_id(id).await? else {
            return Ok(false);
        };

        role.name = name.to_string();
        role.description = description.to_string();

        self.bridge.ensure_role(&role.name).await?;
        self.roles.update(&role).await
    }

    /// Deletes a role. Returns `false` when the role does not exist.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let Some(role) = self.roles.find_by_id(id).await? else {
            return Ok(false);
        };

        let deleted = self.roles.delete(role.id).await?;
        if deleted {
            info!(role = %role.name, "Role deleted");
        }
        Ok(deleted)
    }

    /// Attaches a permission to a role. Both must exist; the link is a
    /// set-union, so repeating the call changes nothing.
    pub async fn assign_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<bool> {
        let Some(role) = self.roles.find_by_id(role_id).await? else {
            return Ok(false);
        };

        let Some(permission) = self.permissions.find_by_id(permission_id).await? else {
            return Ok(false);
        };

        let inserted = self
            .roles
            .assign_permission(role.id, permission.id)
            .await?;

        if !inserted {
            warn!(
                role = %role.name,
                permission = %permission.name,
                "Permission already attached"
            );
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::harness;
    use rolegate_entity::permission::Permission;

    #[tokio::test]
    async fn test_create_mirrors_name_into_credential_store() {
        let h = harness().await;
        let role = h
            .role_service
            .create("Auditor", "Read-only oversight")
            .await
            .unwrap();

        assert_eq!(role.name, "Auditor");
        assert!(h.bridge.has_identity_role("Auditor").await);
    }

    #[tokio::test]
    async fn test_assign_permission_twice_leaves_one_link() {
        let h = harness().await;
        let role = h.role_service.create("Auditor", "").await.unwrap();
        let permission = h
            .permissions
            .create(&Permission {
                id: Uuid::new_v4(),
                name: "Reports.Read".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        assert!(
            h.role_service
                .assign_permission(role.id, permission.id)
                .await
                .unwrap()
        );
        assert!(
            h.role_service
                .assign_permission(role.id, permission.id)
                .await
                .unwrap()
        );

        let linked = h.roles.permissions_of(role.id).await.unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].name, "Reports.Read");
    }

    #[tokio::test]
    async fn test_assign_permission_missing_side_fails() {
        let h = harness().await;
        let role = h.role_service.create("Auditor", "").await.unwrap();

        assert!(
            !h.role_service
                .assign_permission(role.id, Uuid::new_v4())
                .await
                .unwrap()
        );
        assert!(
            !h.role_service
                .assign_permission(Uuid::new_v4(), Uuid::new_v4())
                .await
                .unwrap()
        );
    }
}
