//! Archive Service Server
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use archive_core::config::AppConfig;
use archive_core::error::AppError;
use archive_database::{DatabasePool, JobRepository, JobStore, MemoryJobStore};
use archive_service::JobEngine;
use archive_worker::{CronScheduler, Sweeper, spawn_reporter};

#[tokio::main]
async fn main() {
    let env = std::env::var("ARCHIVE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
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
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting archive service v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);

    // ── Step 1: Job store ────────────────────────────────────────
    let (store, db_pool): (Arc<dyn JobStore>, Option<DatabasePool>) =
        if config.database.url.is_empty() {
            tracing::warn!("No database URL configured, jobs are kept in memory only");
            (Arc::new(MemoryJobStore::new()), None)
        } else {
            tracing::info!("Connecting to database...");
            let db_pool = DatabasePool::connect(&config.database).await?;
            if !db_pool.health_check().await? {
                return Err(AppError::database("Database health check returned an unexpected value"));
            }

            tracing::info!("Running database migrations...");
            archive_database::migration::run_migrations(db_pool.pool()).await?;
            tracing::info!("Database migrations complete");

            (
                Arc::new(JobRepository::new(db_pool.pool().clone())),
                Some(db_pool),
            )
        };

    // ── Step 2: Job engine ───────────────────────────────────────
    let engine = JobEngine::new(store, config.selection.clone());

    // ── Step 3: Background sweeps ────────────────────────────────
    let (sweeper, outcomes) = Sweeper::new(engine.clone(), config.worker.clone());
    let sweeper = Arc::new(sweeper);
    let reporter = spawn_reporter(outcomes);

    let mut scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new(Arc::clone(&sweeper), config.worker.clone()).await?;
        scheduler.register_sweeps().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background sweeps disabled");
        None
    };

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app_state = archive_api::AppState::new(Arc::clone(&config), engine);
    let app = archive_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Archive service listening");

    // ── Step 5: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 6: Drain background work ────────────────────────────
    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler did not shut down cleanly");
        }
    }

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    sweeper.shutdown(grace).await;

    // The reporter ends once every sender is gone; cron closures may still hold one.
    drop(scheduler);
    drop(sweeper);
    let mut reporter = reporter;
    if tokio::time::timeout(Duration::from_secs(1), &mut reporter)
        .await
        .is_err()
    {
        reporter.abort();
    }

    if let Some(db_pool) = db_pool {
        db_pool.close().await;
    }

    tracing::info!("Archive service shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
