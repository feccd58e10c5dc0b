//! User administration handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use uuid::Uuid;
use validator::Validate;

use rolegate_core::error::AppError;
use rolegate_service::user::{CleanupOutcome, UserDto};

use crate::dto::request::{
    AssignRoleRequest, CleanupIdentityRequest, CreateUserRequest, UpdateUserRequest,
};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::handlers::auth::audit;
use crate::middleware::require_admin;
use crate::state::AppState;

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    require_admin(&auth)?;
    Ok(Json(state.user_service.list().await?))
}

/// GET /api/users/{id}
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, ApiError> {
    state
        .user_service
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found."))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    require_admin(&auth)?;
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let user = state
        .user_service
        .create(&req.full_name, &req.email, &req.password)
        .await?
        .ok_or_else(|| ApiError::validation("User creation failed."))?;

    audit(&state, &headers, Some(auth.user_id), "users.create").await;
    Ok(Json(user))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if state
        .user_service
        .update(id, &req.full_name, &req.email)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("User not found."))
    }
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;

    if auth.user_id == id {
        return Err(ApiError(AppError::policy(
            "You cannot delete your own account.",
        )));
    }

    let user = state
        .user_service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    if user.is_system_admin {
        return Err(ApiError(AppError::policy("System admin cannot be deleted.")));
    }

    if state.user_service.delete(id).await? {
        audit(&state, &headers, Some(auth.user_id), "users.delete").await;
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("User not found."))
    }
}

/// POST /api/users/assign-role
pub async fn assign_role(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&auth)?;

    if state
        .user_service
        .assign_role(req.user_id, &req.role_name)
        .await?
    {
        audit(&state, &headers, Some(auth.user_id), "users.assign_role").await;
        Ok(Json(MessageResponse::new("Role assigned.")))
    } else {
        Err(ApiError::not_found("User or role not found."))
    }
}

/// POST /api/users/remove-role
pub async fn remove_role(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&auth)?;

    if state
        .user_service
        .remove_role(req.user_id, &req.role_name)
        .await?
    {
        audit(&state, &headers, Some(auth.user_id), "users.remove_role").await;
        Ok(Json(MessageResponse::new("Role removed.")))
    } else {
        Err(ApiError::not_found("User or role not found."))
    }
}

/// POST /api/users/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&auth)?;

    if state.user_service.approve(id).await? {
        audit(&state, &headers, Some(auth.user_id), "users.approve").await;
        Ok(Json(MessageResponse::new("User approved.")))
    } else {
        Err(ApiError::not_found("User not found."))
    }
}

/// POST /api/users/cleanup-identity
pub async fn cleanup_identity(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(req): Json<CleanupIdentityRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&auth)?;

    if req.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required."));
    }

    match state.user_service.cleanup_identity(&req.email).await? {
        CleanupOutcome::Deleted => {
            audit(&state, &headers, Some(auth.user_id), "users.cleanup_identity").await;
            Ok(Json(MessageResponse::new("Identity deleted.")))
        }
        CleanupOutcome::InUse => Err(ApiError::validation(
            "User exists in the app; delete from the users list instead.",
        )),
        CleanupOutcome::Forbidden => {
            Err(ApiError(AppError::policy("System admin cannot be deleted.")))
        }
        CleanupOutcome::NotFound => Err(ApiError::not_found("Identity not found.")),
    }
}
