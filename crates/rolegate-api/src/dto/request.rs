//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Self-registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh / logout request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// The opaque refresh token.
    pub refresh_token: String,
}

/// Email availability query string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailAvailableQuery {
    /// Email to probe.
    pub email: Option<String>,
}

/// Admin user-creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Display name.
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User profile update request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Display name.
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    /// Email address.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}

/// Role assignment / removal request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    /// Target user.
    pub user_id: Uuid,
    /// Role name to link or unlink.
    pub role_name: String,
}

/// Orphaned-identity cleanup request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupIdentityRequest {
    /// Email of the identity to remove.
    pub email: String,
}

/// Role create / update request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRoleRequest {
    /// Role name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Permission create / update request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPermissionRequest {
    /// Permission name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Permission attachment request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermissionRequest {
    /// Target role.
    pub role_id: Uuid,
    /// Permission to attach.
    pub permission_id: Uuid,
}
