//! Delivery tracking server binary

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dts_common::logging::{init_logging, LogConfig};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

use dts_server::{
    config::{Config, StoreBackend},
    features, filter, ingest, middleware,
    store::{memory::MemoryStore, postgres::PgStore, Store},
};

const DEFAULT_LOG_FILTER: &str = "dts_server=debug,tower_http=debug,axum=trace,sqlx=info";

#[tokio::main]
async fn main() -> Result<()> {
    // A malformed LOG_* environment falls back to the packaged profile.
    let packaged = LogConfig::builder()
        .file_prefix("dts-server")
        .filter_directives(DEFAULT_LOG_FILTER)
        .build();
    init_logging(&LogConfig::from_env().unwrap_or(packaged))?;

    info!("Starting DTS server");

    let config = Config::load()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let store = build_store(&config).await?;

    let workers = match config.ingest.workers {
        0 => ingest::default_workers(),
        n => n,
    };
    let coordinator = ingest::IngestionCoordinator::new(
        store.clone(),
        workers,
        Duration::from_secs(config.ingest.shutdown_grace_secs),
    );
    info!(workers, "Ingestion coordinator ready");

    let state = features::FeatureState {
        store,
        coordinator: Arc::new(coordinator),
        report: Arc::new(ingest::ReportWriter::new(&config.ingest.report_dir)),
        filters: Arc::new(filter::PredicateRegistry::with_default_providers()),
    };

    let app = create_router(state, &config);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Connect the configured storage backend, running migrations for Postgres.
async fn build_store(config: &Config) -> Result<Arc<dyn Store>> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
                .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
                .connect(&config.database.url)
                .await
                .context("Cannot connect to Postgres")?;

            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .context("Database migration failed")?;
            info!("Database pool ready, migrations applied");

            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store - data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn create_router(state: features::FeatureState, config: &Config) -> Router {
    let api = features::router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/v1", api)
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Liveness probe that also checks store connectivity.
async fn health_check(State(state): State<features::FeatureState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({ "status": "ok", "store": "reachable" })).into_response(),
        Err(error) => {
            tracing::error!(?error, "Health probe cannot reach the store");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Resolves once SIGTERM or Ctrl+C arrives.
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "Cannot listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => tracing::error!(%error, "Cannot listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, draining connections"),
        _ = terminate => info!("SIGTERM received, draining connections"),
    }

    info!(secs = timeout_secs.min(5), "Draining before exit");
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
