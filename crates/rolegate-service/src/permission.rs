//! Permission administration.

use std::sync::Arc;

use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_database::stores::PermissionStore;
use rolegate_entity::permission::Permission;

/// Handles permission CRUD.
#[derive(Clone)]
pub struct PermissionService {
    /// Permission persistence.
    permissions: Arc<dyn PermissionStore>,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(permissions: Arc<dyn PermissionStore>) -> Self {
        Self { permissions }
    }

    /// Lists all permissions.
    pub async fn list(&self) -> AppResult<Vec<Permission>> {
        self.permissions.find_all().await
    }

    /// Creates a permission.
    pub async fn create(&self, name: &str, description: &str) -> AppResult<Permission> {
        self.permissions
            .create(&Permission {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: description.to_string(),
            })
            .await
    }

    /// Updates a permission. Returns `false` when it does not exist.
    pub async fn update(&self, id: Uuid, name: &str, description: &str) -> AppResult<bool> {
        let Some(mut permission) = self.permissions.find_by_id(id).await? else {
            return Ok(false);
        };

        permission.name = name.to_string();
        permission.description = description.to_string();

        self.permissions.update(&permission).await
    }

    /// Deletes a permission. Returns `false` when it does not exist.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.permissions.delete(id).await
    }
}
