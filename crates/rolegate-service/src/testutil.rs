//! In-memory store and bridge doubles for exercising the services
//! without a database.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use rolegate_auth::jwt::encoder::JwtEncoder;
use rolegate_core::config::{AuthConfig, SeedConfig};
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::stores::{PermissionStore, RoleStore, UserStore};
use rolegate_entity::identity::{IdentityInfo, NewIdentity};
use rolegate_entity::permission::Permission;
use rolegate_entity::role::Role;
use rolegate_entity::user::{NewUser, User};
use rolegate_identity::bridge::IdentityBridge;

use crate::access_control::{AccessControlService, AuthSession, LoginOutcome};
use crate::bootstrap::Bootstrap;
use crate::role::RoleService;
use crate::user::UserService;

#[derive(Debug, Clone)]
struct MemIdentity {
    email: String,
    full_name: String,
    password: String,
    roles: Vec<String>,
}

/// Stored refresh token state, exposed for assertions.
#[derive(Debug, Clone)]
pub struct MemToken {
    pub identity_id: Uuid,
    pub expiry_date: DateTime<Utc>,
    pub is_revoked: bool,
}

#[derive(Default)]
struct BridgeState {
    identities: HashMap<Uuid, MemIdentity>,
    role_names: HashSet<String>,
    tokens: HashMap<String, MemToken>,
}

/// Credential store double. Passwords are kept in the clear — this is
/// a test double, not a hasher.
#[derive(Default)]
pub struct MemoryBridge {
    state: Mutex<BridgeState>,
}

impl MemoryBridge {
    pub async fn stored_token(&self, token: &str) -> MemToken {
        self.state
            .lock()
            .unwrap()
            .tokens
            .get(token)
            .expect("token not stored")
            .clone()
    }

    pub async fn has_identity_role(&self, name: &str) -> bool {
        self.state.lock().unwrap().role_names.contains(name)
    }

    fn info(id: Uuid, identity: &MemIdentity) -> IdentityInfo {
        IdentityInfo {
            id,
            email: identity.email.clone(),
            full_name: identity.full_name.clone(),
            roles: identity.roles.clone(),
        }
    }

    fn id_by_email(state: &BridgeState, email: &str) -> Option<Uuid> {
        state
            .identities
            .iter()
            .find(|(_, i)| i.email.eq_ignore_ascii_case(email))
            .map(|(id, _)| *id)
    }
}

#[async_trait]
impl IdentityBridge for MemoryBridge {
    async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<Option<IdentityInfo>> {
        let state = self.state.lock().unwrap();
        let Some(id) = Self::id_by_email(&state, email) else {
            return Ok(None);
        };
        let identity = &state.identities[&id];
        if identity.password != password {
            return Ok(None);
        }
        Ok(Some(Self::info(id, identity)))
    }

    async fn create_identity(&self, data: &NewIdentity) -> AppResult<Option<IdentityInfo>> {
        let mut state = self.state.lock().unwrap();
        if Self::id_by_email(&state, &data.email).is_some() {
            return Ok(None);
        }

        let id = Uuid::new_v4();
        state.role_names.insert("User".to_string());
        state.identities.insert(
            id,
            MemIdentity {
                email: data.email.clone(),
                full_name: data.full_name.clone(),
                password: data.password.clone(),
                roles: vec!["User".to_string()],
            },
        );

        Ok(Some(Self::info(id, &state.identities[&id])))
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(Self::id_by_email(&state, email).is_some())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<IdentityInfo>> {
        let state = self.state.lock().unwrap();
        Ok(Self::id_by_email(&state, email).map(|id| Self::info(id, &state.identities[&id])))
    }

    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<IdentityInfo>> {
        let state = self.state.lock().unwrap();
        let Some(stored) = state.tokens.get(token) else {
            return Ok(None);
        };
        if stored.is_revoked || stored.expiry_date <= Utc::now() {
            return Ok(None);
        }
        let id = stored.identity_id;
        Ok(state
            .identities
            .get(&id)
            .map(|identity| Self::info(id, identity)))
    }

    async fn store_refresh_token(
        &self,
        identity_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.state.lock().unwrap().tokens.insert(
            token.to_string(),
            MemToken {
                identity_id,
                expiry_date: expires_at,
                is_revoked: false,
            },
        );
        Ok(())
    }

    async fn revoke_refresh_token(&self, token: &str) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        match state.tokens.get_mut(token) {
            Some(stored) => {
                stored.is_revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn consume_refresh_token(&self, token: &str) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        match state.tokens.get_mut(token) {
            Some(stored) if !stored.is_revoked && stored.expiry_date > Utc::now() => {
                stored.is_revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ensure_role(&self, role_name: &str) -> AppResult<()> {
        self.state
            .lock()
            .unwrap()
            .role_names
            .insert(role_name.to_string());
        Ok(())
    }

    async fn assign_role(&self, identity_id: Uuid, role_name: &str) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        state.role_names.insert(role_name.to_string());
        match state.identities.get_mut(&identity_id) {
            Some(identity) => {
                if !identity.roles.iter().any(|r| r == role_name) {
                    identity.roles.push(role_name.to_string());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_role(&self, identity_id: Uuid, role_name: &str) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        match state.identities.get_mut(&identity_id) {
            Some(identity) => {
                identity.roles.retain(|r| r != role_name);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_identity(&self, identity_id: Uuid) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .identities
            .remove(&identity_id)
            .is_some())
    }

    async fn delete_identity_by_email(&self, email: &str) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        match Self::id_by_email(&state, email) {
            Some(id) => {
                state.identities.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Entity-store user double.
#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
    links: Mutex<HashSet<(Uuid, Uuid)>>,
    roles: Arc<MemoryRoles>,
}

impl MemoryUsers {
    fn with_roles(roles: Arc<MemoryRoles>) -> Self {
        Self {
            users: Mutex::default(),
            links: Mutex::default(),
            roles,
        }
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn create(&self, data: &NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AppError::conflict("Email already in use"));
        }
        let user = User {
            id: data.id,
            email: data.email.clone(),
            full_name: data.full_name.clone(),
            is_active: data.is_active,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> AppResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&user.id) {
            Some(existing) => {
                existing.email = user.email.clone();
                existing.full_name = user.full_name.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.users.lock().unwrap().remove(&id).is_some())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) => {
                user.is_active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn roles_of(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        let links = self.links.lock().unwrap();
        let roles = self.roles.roles.lock().unwrap();
        let mut assigned: Vec<Role> = links
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, rid)| roles.get(rid).cloned())
            .collect();
        assigned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(assigned)
    }

    async fn add_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        Ok(self.links.lock().unwrap().insert((user_id, role_id)))
    }

    async fn remove_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        Ok(self.links.lock().unwrap().remove(&(user_id, role_id)))
    }
}

/// Entity-store role double.
#[derive(Default)]
pub struct MemoryRoles {
    roles: Mutex<HashMap<Uuid, Role>>,
    perm_links: Mutex<HashSet<(Uuid, Uuid)>>,
    permissions: Arc<MemoryPermissions>,
}

impl MemoryRoles {
    fn with_permissions(permissions: Arc<MemoryPermissions>) -> Self {
        Self {
            roles: Mutex::default(),
            perm_links: Mutex::default(),
            permissions,
        }
    }
}

#[async_trait]
impl RoleStore for MemoryRoles {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        Ok(self.roles.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .values()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.lock().unwrap().values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create(&self, role: &Role) -> AppResult<Role> {
        let mut roles = self.roles.lock().unwrap();
        if roles.values().any(|r| r.name == role.name) {
            return Err(AppError::conflict(format!(
                "Role '{}' already exists",
                role.name
            )));
        }
        roles.insert(role.id, role.clone());
        Ok(role.clone())
    }

    async fn update(&self, role: &Role) -> AppResult<bool> {
        let mut roles = self.roles.lock().unwrap();
        match roles.get_mut(&role.id) {
            Some(existing) => {
                existing.name = role.name.clone();
                existing.description = role.description.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.roles.lock().unwrap().remove(&id).is_some())
    }

    async fn assign_permission(&self, role_id: Uuid, permission_id: Uuid) -> AppResult<bool> {
        Ok(self
            .perm_links
            .lock()
            .unwrap()
            .insert((role_id, permission_id)))
    }

    async fn permissions_of(&self, role_id: Uuid) -> AppResult<Vec<Permission>> {
        let links = self.perm_links.lock().unwrap();
        let perms = self.permissions.permissions.lock().unwrap();
        let mut assigned: Vec<Permission> = links
            .iter()
            .filter(|(rid, _)| *rid == role_id)
            .filter_map(|(_, pid)| perms.get(pid).cloned())
            .collect();
        assigned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(assigned)
    }
}

/// Entity-store permission double.
#[derive(Default)]
pub struct MemoryPermissions {
    permissions: Mutex<HashMap<Uuid, Permission>>,
}

#[async_trait]
impl PermissionStore for MemoryPermissions {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Permission>> {
        Ok(self.permissions.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Permission>> {
        let mut perms: Vec<Permission> =
            self.permissions.lock().unwrap().values().cloned().collect();
        perms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(perms)
    }

    async fn create(&self, permission: &Permission) -> AppResult<Permission> {
        let mut perms = self.permissions.lock().unwrap();
        if perms.values().any(|p| p.name == permission.name) {
            return Err(AppError::conflict(format!(
                "Permission '{}' already exists",
                permission.name
            )));
        }
        perms.insert(permission.id, permission.clone());
        Ok(permission.clone())
    }

    async fn update(&self, permission: &Permission) -> AppResult<bool> {
        let mut perms = self.permissions.lock().unwrap();
        match perms.get_mut(&permission.id) {
            Some(existing) => {
                existing.name = permission.name.clone();
                existing.description = permission.description.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.permissions.lock().unwrap().remove(&id).is_some())
    }
}

/// Fully wired service set over the in-memory doubles.
pub struct TestHarness {
    pub bridge: Arc<MemoryBridge>,
    pub users: Arc<MemoryUsers>,
    pub roles: Arc<MemoryRoles>,
    pub permissions: Arc<MemoryPermissions>,
    pub access: AccessControlService,
    pub user_service: UserService,
    pub role_service: RoleService,
    pub bootstrap: Bootstrap,
}

impl TestHarness {
    /// Registers, approves, and logs in, returning the session.
    pub async fn register_and_approve(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> AuthSession {
        assert!(self.access.register(full_name, email, password).await.unwrap());

        let user = self
            .users
            .find_by_email(email)
            .await
            .unwrap()
            .expect("registered user missing");
        self.user_service.approve(user.id).await.unwrap();

        match self.access.login(email, password).await.unwrap() {
            LoginOutcome::Success(session) => session,
            other => panic!("expected login to succeed, got {other:?}"),
        }
    }

    /// Creates an identity with no business user row.
    pub async fn create_orphan_identity(&self, email: &str, password: &str) {
        self.bridge
            .create_identity(&NewIdentity {
                email: email.to_string(),
                full_name: "Orphan".to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
            .expect("orphan identity creation failed");
    }
}

/// Builds a harness with default configuration.
pub async fn harness() -> TestHarness {
    let auth_config = AuthConfig::default();
    let seed_config = SeedConfig::default();

    let bridge = Arc::new(MemoryBridge::default());
    let permissions = Arc::new(MemoryPermissions::default());
    let roles = Arc::new(MemoryRoles::with_permissions(Arc::clone(&permissions)));
    let users = Arc::new(MemoryUsers::with_roles(Arc::clone(&roles)));

    let encoder = Arc::new(JwtEncoder::new(&auth_config));

    let access = AccessControlService::new(
        Arc::clone(&bridge) as Arc<dyn IdentityBridge>,
        Arc::clone(&users) as Arc<dyn UserStore>,
        Arc::clone(&encoder),
        &auth_config,
        &seed_config,
    );

    let user_service = UserService::new(
        Arc::clone(&users) as Arc<dyn UserStore>,
        Arc::clone(&roles) as Arc<dyn RoleStore>,
        Arc::clone(&bridge) as Arc<dyn IdentityBridge>,
        seed_config.admin_email.clone(),
    );

    let role_service = RoleService::new(
        Arc::clone(&roles) as Arc<dyn RoleStore>,
        Arc::clone(&permissions) as Arc<dyn PermissionStore>,
        Arc::clone(&bridge) as Arc<dyn IdentityBridge>,
    );

    let bootstrap = Bootstrap::new(
        Arc::clone(&bridge) as Arc<dyn IdentityBridge>,
        Arc::clone(&users) as Arc<dyn UserStore>,
        Arc::clone(&roles) as Arc<dyn RoleStore>,
        Arc::clone(&permissions) as Arc<dyn PermissionStore>,
        seed_config,
    );

    TestHarness {
        bridge,
        users,
        roles,
        permissions,
        access,
        user_service,
        role_service,
        bootstrap,
    }
}
