use std::{net::SocketAddr, sync::Arc};

use service_core::observability::logging::init_tracing;
use tokio::signal;
use users_auth_service::{
    build_router,
    config::{AuthConfig, Environment},
    db,
    services::{AuthService, Database, RedisSessionStore, TokenCodec},
    utils::PasswordHasher,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = AuthConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.environment == Environment::Prod,
    );

    tracing::info!(
        service = %config.service_name,
        environment = ?config.environment,
        "Starting users auth service"
    );

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;
    let database = Database::new(pool, config.database.timeout());
    tracing::info!("Database initialized successfully");

    let sessions = RedisSessionStore::new(&config.redis).await?;
    tracing::info!("Redis session store initialized");

    let tokens = TokenCodec::new(&config.token);
    let hasher = PasswordHasher::new(&config.password)?;

    let auth_service = AuthService::new(Arc::new(database), Arc::new(sessions), tokens, hasher);

    let state = AppState {
        config: config.clone(),
        auth_service,
    };
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    service_core::axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
