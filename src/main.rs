//! Dotación Server - medical equipment inventory and compliance API

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use dotacion_server::{
    api,
    config::{AppConfig, LoggingConfig, StorageBackend, StorageConfig},
    repository::{FileSnapshotStore, MemorySnapshotStore, RedisSnapshotStore, Repository, SnapshotStore},
    services::{advisory::HttpAdvisoryModel, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config.logging);

    tracing::info!("Starting Dotación Server v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config).await?;
    let repository = Repository::new(store);
    tracing::info!(backend = repository.backend_name(), "Snapshot storage ready");

    let advisor = HttpAdvisoryModel::new(&config.advisor).context("Failed to create advisor client")?;
    if config.advisor.api_key.is_none() {
        tracing::warn!("No advisor API key configured, advisory calls will likely be rejected");
    }

    let services = Services::new(repository, Arc::new(advisor)).await;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("dotacion_server={},tower_http=debug", logging.level).into());

    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "dotacion-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    guard
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn SnapshotStore>> {
    let StorageConfig {
        backend,
        directory,
        key_prefix,
    } = &config.storage;

    let store: Arc<dyn SnapshotStore> = match backend {
        StorageBackend::Redis => Arc::new(
            RedisSnapshotStore::new(&config.redis.url, key_prefix)
                .await
                .context("Failed to connect to Redis")?,
        ),
        StorageBackend::File => Arc::new(
            FileSnapshotStore::new(directory)
                .await
                .context("Failed to open snapshot directory")?,
        ),
        StorageBackend::Memory => {
            tracing::warn!("In-memory storage selected, changes are lost on restart");
            Arc::new(MemorySnapshotStore::new())
        }
    };
    Ok(store)
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api::router(state))
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
