//! Permission administration handlers. All routes require the Admin role.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use uuid::Uuid;
use validator::Validate;

use rolegate_entity::permission::Permission;

use crate::dto::request::UpsertPermissionRequest;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::handlers::auth::audit;
use crate::middleware::require_admin;
use crate::state::AppState;

/// GET /api/permissions
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Permission>>, ApiError> {
    require_admin(&auth)?;
    Ok(Json(state.permission_service.list().await?))
}

/// POST /api/permissions
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(req): Json<UpsertPermissionRequest>,
) -> Result<Json<Permission>, ApiError> {
    require_admin(&auth)?;
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let permission = state
        .permission_service
        .create(&req.name, &req.description)
        .await?;

    audit(&state, &headers, Some(auth.user_id), "permissions.create").await;
    Ok(Json(permission))
}

/// PUT /api/permissions/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpsertPermissionRequest>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if state
        .permission_service
        .update(id, &req.name, &req.description)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Permission not found."))
    }
}

/// DELETE /api/permissions/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;

    if state.permission_service.delete(id).await? {
        audit(&state, &headers, Some(auth.user_id), "permissions.delete").await;
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Permission not found."))
    }
}
