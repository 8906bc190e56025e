//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, migrations, worker spawning and the Axum
//! server lifecycle.

use crate::application::click_worker::run_click_worker;
use crate::application::services::{UrlService, UrlServiceSettings};
use crate::config::{Config, StorageBackend};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::persistence::{InMemoryStore, PgClickRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::{AppState, DynUrlService};
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (PostgreSQL with migrations, or in-memory)
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let url_service = build_url_service(&config).await?;

    let (click_tx, click_rx) = mpsc::channel::<ClickEvent>(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        url_service.clone(),
        config.click_worker_concurrency,
    ));

    let state = AppState::new(url_service, click_tx, config.behind_proxy);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it every click sender) is gone; let queued clicks drain.
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Click worker terminated abnormally");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Wires the URL service to the configured storage backend.
///
/// For PostgreSQL this connects the pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn build_url_service(config: &Config) -> Result<Arc<DynUrlService>> {
    let (links, clicks): (Arc<dyn LinkRepository>, Arc<dyn ClickRepository>) =
        match config.storage_backend {
            StorageBackend::Postgres => {
                let pool = Arc::new(connect_pool(config).await?);

                sqlx::migrate!("./migrations")
                    .run(pool.as_ref())
                    .await
                    .context("Failed to run database migrations")?;
                tracing::info!("Database migrations applied");

                let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
                let clicks: Arc<dyn ClickRepository> = Arc::new(PgClickRepository::new(pool));
                (links, clicks)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage, data is lost on shutdown");

                let store = Arc::new(InMemoryStore::new());
                let links: Arc<dyn LinkRepository> = store.clone();
                let clicks: Arc<dyn ClickRepository> = store;
                (links, clicks)
            }
        };

    let settings = UrlServiceSettings {
        base_url: config.base_url.clone(),
        code_length: config.short_code_length,
        default_expiry_days: config.default_expiry_days,
    };

    Ok(Arc::new(UrlService::new(
        links,
        clicks,
        CodeGenerator::os(),
        settings,
    )))
}

/// Opens a PostgreSQL pool using the configured pool settings.
///
/// # Errors
///
/// Returns an error if the database URL is missing or the connection fails.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres storage backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
