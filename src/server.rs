//! HTTP server initialization and runtime setup.
//!
//! Connects the configured storage backend, builds the registry, and runs the
//! Axum server until Ctrl-C.

use crate::application::services::RegistryService;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::RecordRepository;
use crate::infrastructure::persistence::{
    InMemoryRecordRepository, PgRecordRepository, RedisRecordRepository,
};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Connects to PostgreSQL with the configured pool settings and applies migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_postgres(config: &Config) -> Result<sqlx::PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(pool)
}

/// Builds the record repository selected by `STORAGE_BACKEND`.
///
/// # Errors
///
/// Returns an error if a remote backend cannot be reached.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn RecordRepository>> {
    let repository: Arc<dyn RecordRepository> = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            Arc::new(InMemoryRecordRepository::new())
        }
        StorageBackend::Postgres => {
            let pool = connect_postgres(config).await?;
            Arc::new(PgRecordRepository::new(
                Arc::new(pool),
                config.store_timeout(),
            ))
        }
        StorageBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is not configured")?;
            let redis = RedisRecordRepository::connect(redis_url, config.store_timeout())
                .await
                .context("Failed to connect to Redis")?;
            Arc::new(redis)
        }
    };

    Ok(repository)
}

/// Builds the registry service on top of the configured backend.
///
/// # Errors
///
/// Returns an error if the backend is unreachable or the code length is invalid.
pub async fn build_registry(config: &Config) -> Result<RegistryService> {
    let repository = build_repository(config).await?;
    let generator = CodeGenerator::with_length(config.code_length)?;

    Ok(RegistryService::new(repository)
        .with_generator(generator)
        .with_max_attempts(config.code_max_attempts))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Storage backend connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let registry = build_registry(&config).await?;
    tracing::info!(backend = registry.backend(), "Registry ready");

    let state = AppState::new(Arc::new(registry));
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves when Ctrl-C is received.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
    }
}
