//! Entity Store contracts.
//!
//! The services depend on these traits rather than on concrete
//! repositories, so the persistence technology stays substitutable and
//! the orchestration logic can be exercised against in-memory stores.

use async_trait::async_trait;
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_entity::permission::Permission;
use rolegate_entity::role::Role;
use rolegate_entity::user::{NewUser, User};

/// Persistence operations for business users and their role links.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users, newest first.
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Create a new user.
    async fn create(&self, data: &NewUser) -> AppResult<User>;

    /// Update a user's profile fields.
    async fn update(&self, user: &User) -> AppResult<bool>;

    /// Delete a user by id. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Set a user's activation flag. Returns `true` if the user exists.
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<bool>;

    /// List the roles linked to a user.
    async fn roles_of(&self, user_id: Uuid) -> AppResult<Vec<Role>>;

    /// Link a role to a user. Idempotent: returns `false` when the link
    /// already existed.
    async fn add_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool>;

    /// Unlink a role from a user. Returns `false` when no link existed.
    async fn remove_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool>;
}

/// Persistence operations for roles and their permission links.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Find a role by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    /// Find a role by its unique name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// List all roles.
    async fn find_all(&self) -> AppResult<Vec<Role>>;

    /// Create a new role.
    async fn create(&self, role: &Role) -> AppResult<Role>;

    /// Update a role's name and description.
    async fn update(&self, role: &Role) -> AppResult<bool>;

    /// Delete a role by id. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Link a permission to a role. Idempotent: returns `false` when
    /// the link already existed.
    async fn assign_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<bool>;

    /// List the permissions linked to a role.
    async fn permissions_of(&self, role_id: Uuid) -> AppResult<Vec<Permission>>;
}

/// Persistence operations for permissions.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Find a permission by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>>;

    /// Find a permission by its unique name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>>;

    /// List all permissions.
    async fn find_all(&self) -> AppResult<Vec<Permission>>;

    /// Create a new permission.
    async fn create(&self, permission: &Permission) -> AppResult<Permission>;

    /// Update a permission's name and description.
    async fn update(&self, permission: &Permission) -> AppResult<bool>;

    /// Delete a permission by id. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Write-only audit log sink.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Record an action. Never read back in the core flow.
    async fn record(&self, user_id: Option<Uuid>, action: &str, ip_address: &str)
    -> AppResult<()>;
}
