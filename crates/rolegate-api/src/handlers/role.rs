//! Role administration handlers. All routes require the Admin role.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use uuid::Uuid;
use validator::Validate;

use rolegate_entity::role::Role;

use crate::dto::request::{AssignPermissionRequest, UpsertRoleRequest};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::handlers::auth::audit;
use crate::middleware::require_admin;
use crate::state::AppState;

/// GET /api/roles
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Role>>, ApiError> {
    require_admin(&auth)?;
    Ok(Json(state.role_service.list().await?))
}

/// POST /api/roles
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(req): Json<UpsertRoleRequest>,
) -> Result<Json<Role>, ApiError> {
    require_admin(&auth)?;
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let role = state.role_service.create(&req.name, &req.description).await?;
    audit(&state, &headers, Some(auth.user_id), "roles.create").await;
    Ok(Json(role))
}

/// PUT /api/roles/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpsertRoleRequest>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if state
        .role_service
        .update(id, &req.name, &req.description)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Role not found."))
    }
}

/// DELETE /api/roles/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;

    if state.role_service.delete(id).await? {
        audit(&state, &headers, Some(auth.user_id), "roles.delete").await;
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Role not found."))
    }
}

/// POST /api/roles/assign-permission
pub async fn assign_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(req): Json<AssignPermissionRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&auth)?;

    if state
        .role_service
        .assign_permission(req.role_id, req.permission_id)
        .await?
    {
        audit(&state, &headers, Some(auth.user_id), "roles.assign_permission").await;
        Ok(Json(MessageResponse::new("Permission assigned.")))
    } else {
        Err(ApiError::not_found("Role or permission not found."))
    }
}
