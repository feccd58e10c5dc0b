//! Startup seeding.
//!
//! Ensures the configured roles exist in both stores, seeds the default
//! permission set, grants everything to the Admin role, and provisions
//! the system admin account. Every step is idempotent, so running the
//! bootstrap on every startup is safe.

use std::sync::Arc;

use tracing::info;

use rolegate_core::config::SeedConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::stores::{PermissionStore, RoleStore, UserStore};
use rolegate_entity::identity::NewIdentity;
use rolegate_entity::permission::Permission;
use rolegate_entity::role::Role;
use rolegate_entity::user::NewUser;
use rolegate_identity::bridge::IdentityBridge;
use uuid::Uuid;

/// Default permissions seeded at startup.
const DEFAULT_PERMISSIONS: &[(&str, &str)] = &[
    ("Users.Read", "View users"),
    ("Users.Manage", "Create or update users"),
    ("Roles.Read", "View roles"),
    ("Roles.Manage", "Create or update roles"),
    ("Permissions.Manage", "Manage permissions"),
    ("Audit.Read", "View audit logs"),
];

/// Seeds roles, permissions, and the admin account.
#[derive(Clone)]
pub struct Bootstrap {
    bridge: Arc<dyn IdentityBridge>,
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
    config: SeedConfig,
}

impl Bootstrap {
    /// Creates a new bootstrap runner.
    pub fn new(
        bridge: Arc<dyn IdentityBridge>,
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        config: SeedConfig,
    ) -> Self {
        Self {
            bridge,
            users,
            roles,
            permissions,
            config,
        }
    }

    /// Runs all seeding steps.
    pub async fn run(&self) -> AppResult<()> {
        self.seed_roles().await?;
        self.seed_permissions().await?;
        self.grant_admin_permissions().await?;
        self.seed_admin_account().await?;
        info!("Seed data ensured");
        Ok(())
    }

    /// Ensures every configured role exists in both stores.
    async fn seed_roles(&self) -> AppResult<()> {
        for name in &self.config.roles {
            self.bridge.ensure_role(name).await?;

            if self.roles.find_by_name(name).await?.is_none() {
                self.roles
                    .create(&Role {
                        id: Uuid::new_v4(),
                        name: name.clone(),
                        description: format!("Default {name} role"),
                    })
                    .await?;
            }
        }
        Ok(())
    }

    /// Ensures the default permission set exists.
    async fn seed_permissions(&self) -> AppResult<()> {
        for (name, description) in DEFAULT_PERMISSIONS {
            if self.permissions.find_by_name(name).await?.is_none() {
                self.permissions
                    .create(&Permission {
                        id: Uuid::new_v4(),
                        name: (*name).to_string(),
                        description: (*description).to_string(),
                    })
                    .await?;
            }
        }
        Ok(())
    }

    /// Grants every permission to the Admin role.
    async fn grant_admin_permissions(&self) -> AppResult<()> {
        let Some(admin_role) = self.roles.find_by_name("Admin").await? else {
            return Ok(());
        };

        for permission in self.permissions.find_all().await? {
            self.roles
                .assign_permission(admin_role.id, permission.id)
                .await?;
        }
        Ok(())
    }

    /// Provisions the system admin identity, business user, and role
    /// membership on both sides.
    async fn seed_admin_account(&self) -> AppResult<()> {
        let identity = match self.bridge.find_by_email(&self.config.admin_email).await? {
            Some(identity) => identity,
            None => {
                let created = self
                    .bridge
                    .create_identity(&NewIdentity {
                        email: self.config.admin_email.clone(),
                        full_name: self.config.admin_full_name.clone(),
                        password: self.config.admin_password.clone(),
                    })
                    .await?;

                created.ok_or_else(|| {
                    AppError::internal("Failed to create the system admin identity")
                })?
            }
        };

        self.bridge.assign_role(identity.id, "Admin").await?;

        let user = match self.users.find_by_email(&self.config.admin_email).await? {
            Some(user) => user,
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

        if let Some(admin_role) = self.roles.find_by_name("Admin").await? {
            self.users.add_role(user.id, admin_role.id).await?;
        }

        Ok(())
    }
}
