//! Application state shared across all handlers.

use std::sync::Arc;

use rolegate_auth::jwt::decoder::JwtDecoder;
use rolegate_core::config::AppConfig;
use rolegate_database::stores::AuditStore;
use rolegate_identity::bridge::IdentityBridge;
use rolegate_service::access_control::AccessControlService;
use rolegate_service::permission::PermissionService;
use rolegate_service::role::RoleService;
use rolegate_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Credential store boundary (for email availability checks).
    pub bridge: Arc<dyn IdentityBridge>,
    /// Access control orchestration.
    pub access_control: Arc<AccessControlService>,
    /// User administration.
    pub user_service: Arc<UserService>,
    /// Role administration.
    pub role_service: Arc<RoleService>,
    /// Permission administration.
    pub permission_service: Arc<PermissionService>,
    /// Audit log sink.
    pub audit: Arc<dyn AuditStore>,
}
