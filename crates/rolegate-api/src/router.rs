//! Route definitions for the Rolegate HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(role_routes())
        .merge(permission_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: register, email availability, login, refresh, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/email-available", get(handlers::auth::email_available))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh-token", post(handlers::auth::refresh_token))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// User administration endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list))
        .route("/users", post(handlers::user::create))
        .route("/users/{id}", get(handlers::user::get))
        .route("/users/{id}", put(handlers::user::update))
        .route("/users/{id}", delete(handlers::user::delete))
        .route("/users/{id}/approve", post(handlers::user::approve))
        .route("/users/assign-role", post(handlers::user::assign_role))
        .route("/users/remove-role", post(handlers::user::remove_role))
        .route(
            "/users/cleanup-identity",
            post(handlers::user::cleanup_identity),
        )
}

/// Role administration endpoints
fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(handlers::role::list))
        .route("/roles", post(handlers::role::create))
        .route("/roles/{id}", put(handlers::role::update))
        .route("/roles/{id}", delete(handlers::role::delete))
        .route(
            "/roles/assign-permission",
            post(handlers::role::assign_permission),
        )
}

/// Permission administration endpoints
fn permission_routes() -> Router<AppState> {
    Router::new()
        .route("/permissions", get(handlers::permission::list))
        .route("/permissions", post(handlers::permission::create))
        .route("/permissions/{id}", put(handlers::permission::update))
        .route("/permissions/{id}", delete(handlers::permission::delete))
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// CORS layer allowing the configured browser client origin.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    match state.config.server.client_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(
                origin = %state.config.server.client_origin,
                "Invalid client origin, falling back to permissive CORS"
            );
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}
