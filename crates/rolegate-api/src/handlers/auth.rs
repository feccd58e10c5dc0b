//! Auth handlers — register, email availability, login, refresh, logout.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use validator::Validate;

use rolegate_database::stores::AuditStore as _;
use rolegate_identity::bridge::IdentityBridge as _;
use rolegate_service::access_control::{AuthSession, LoginOutcome};

use crate::dto::request::{
    EmailAvailableQuery, LoginRequest, RefreshTokenRequest, RegisterRequest,
};
use crate::dto::response::{AvailabilityResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::auth::client_ip;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if state.bridge.email_exists(&req.email).await? {
        return Err(ApiError(rolegate_core::error::AppError::conflict(
            "Email already used.",
        )));
    }

    let created = state
        .access_control
        .register(&req.full_name, &req.email, &req.password)
        .await?;

    if !created {
        return Err(ApiError::validation("Registration failed."));
    }

    audit(&state, &headers, None, "auth.register").await;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Account created. Await admin approval.")),
    ))
}

/// GET /api/auth/email-available?email=
pub async fn email_available(
    State(state): State<AppState>,
    Query(query): Query<EmailAvailableQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation("Email is required."))?;

    let exists = state.bridge.email_exists(email).await?;
    Ok(Json(AvailabilityResponse { available: !exists }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    match state.access_control.login(&req.email, &req.password).await? {
        LoginOutcome::Success(session) => {
            audit(&state, &headers, Some(session.user.id), "auth.login").await;
            Ok(Json(session))
        }
        LoginOutcome::PendingApproval => Err(ApiError(
            rolegate_core::error::AppError::authorization("Account pending admin approval."),
        )),
        LoginOutcome::InvalidCredentials => {
            Err(ApiError::unauthorized("Invalid email or password."))
        }
    }
}

/// POST /api/auth/refresh-token
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    match state.access_control.refresh(&req.refresh_token).await? {
        Some(session) => {
            audit(&state, &headers, Some(session.user.id), "auth.refresh").await;
            Ok(Json(session))
        }
        None => Err(ApiError::unauthorized("Invalid or expired refresh token.")),
    }
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let revoked = state.access_control.logout(&req.refresh_token).await?;
    if !revoked {
        return Err(ApiError::not_found("Refresh token not found."));
    }

    audit(&state, &headers, None, "auth.logout").await;
    Ok(Json(MessageResponse::new("Logged out.")))
}

/// Best-effort audit write; failures are logged, never surfaced.
pub(crate) async fn audit(
    state: &AppState,
    headers: &HeaderMap,
    user_id: Option<uuid::Uuid>,
    action: &str,
) {
    let ip = client_ip(headers);
    if let Err(e) = state.audit.record(user_id, action, &ip).await {
        tracing::debug!(action = %action, error = %e, "Audit write failed");
    }
}
