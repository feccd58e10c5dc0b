//! Rolegate Server — role-based access control backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use rolegate_core::config::AppConfig;
use rolegate_core::error::AppError;
use rolegate_database::stores::{AuditStore, PermissionStore, RoleStore, UserStore};
use rolegate_identity::bridge::IdentityBridge;

#[tokio::main]
async fn main() {
    let env = std::env::var("ROLEGATE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Rolegate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = rolegate_database::connection::DatabasePool::connect(&config.database).await?;
    rolegate_database::migration::run_migrations(db.pool()).await?;
    let pool = db.into_pool();

    // ── Step 2: Entity store repositories ────────────────────────
    let users: Arc<dyn UserStore> = Arc::new(
        rolegate_database::repositories::user::UserRepository::new(pool.clone()),
    );
    let roles: Arc<dyn RoleStore> = Arc::new(
        rolegate_database::repositories::role::RoleRepository::new(pool.clone()),
    );
    let permissions: Arc<dyn PermissionStore> = Arc::new(
        rolegate_database::repositories::permission::PermissionRepository::new(pool.clone()),
    );
    let audit: Arc<dyn AuditStore> = Arc::new(
        rolegate_database::repositories::audit::AuditRepository::new(pool.clone()),
    );

    // ── Step 3: Credential store + token issuer ──────────────────
    let hasher = rolegate_identity::password::PasswordHasher::new();
    let bridge: Arc<dyn IdentityBridge> = Arc::new(
        rolegate_identity::pg::PgIdentityBridge::new(pool.clone(), hasher),
    );

    let jwt_encoder = Arc::new(rolegate_auth::jwt::encoder::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(rolegate_auth::jwt::decoder::JwtDecoder::new(&config.auth));

    // ── Step 4: Services ─────────────────────────────────────────
    let access_control = Arc::new(rolegate_service::access_control::AccessControlService::new(
        Arc::clone(&bridge),
        Arc::clone(&users),
        Arc::clone(&jwt_encoder),
        &config.auth,
        &config.seed,
    ));

    let user_service = Arc::new(rolegate_service::user::UserService::new(
        Arc::clone(&users),
        Arc::clone(&roles),
        Arc::clone(&bridge),
        config.seed.admin_email.clone(),
    ));

    let role_service = Arc::new(rolegate_service::role::RoleService::new(
        Arc::clone(&roles),
        Arc::clone(&permissions),
        Arc::clone(&bridge),
    ));

    let permission_service = Arc::new(rolegate_service::permission::PermissionService::new(
        Arc::clone(&permissions),
    ));

    // ── Step 5: Seed data ────────────────────────────────────────
    let bootstrap = rolegate_service::bootstrap::Bootstrap::new(
        Arc::clone(&bridge),
        Arc::clone(&users),
        Arc::clone(&roles),
        Arc::clone(&permissions),
        config.seed.clone(),
    );
    bootstrap.run().await?;

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = rolegate_api::state::AppState {
        config: Arc::new(config.clone()),
        jwt_decoder,
        bridge,
        access_control,
        user_service,
        role_service,
        permission_service,
        audit,
    };

    let app = rolegate_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Rolegate server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Rolegate server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
