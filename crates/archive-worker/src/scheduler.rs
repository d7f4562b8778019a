//! Cron scheduler that triggers the background sweeps.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use archive_core::config::WorkerConfig;
use archive_core::error::AppError;
use archive_entity::job::JobKind;

use crate::sweep::Sweeper;

/// Cron-based scheduler for the archive and extract sweeps
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Sweeper invoked on every tick
    sweeper: Arc<Sweeper>,
    /// Cron expressions
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("archive_sweep_cron", &self.config.archive_sweep_cron)
            .field("extract_sweep_cron", &self.config.extract_sweep_cron)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(sweeper: Arc<Sweeper>, config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            sweeper,
            config,
        })
    }

    /// Register both sweeps
    pub async fn register_sweeps(&self) -> Result<(), AppError> {
        self.register_sweep(JobKind::Archive, &self.config.archive_sweep_cron)
            .await?;
        self.register_sweep(JobKind::Extract, &self.config.extract_sweep_cron)
            .await?;

        tracing::info!("All sweeps registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler. Units already launched are not affected.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    async fn register_sweep(&self, kind: JobKind, schedule: &str) -> Result<(), AppError> {
        let sweeper = Arc::clone(&self.sweeper);
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let sweeper = Arc::clone(&sweeper);
            Box::pin(async move {
                tracing::trace!(%kind, "Sweep tick");
                if let Err(e) = sweeper.run_sweep(kind).await {
                    tracing::error!(%kind, error = %e, "Sweep failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid {kind} sweep schedule '{schedule}': {e}"
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {kind} sweep: {e}")))?;

        tracing::info!(%kind, schedule, "Registered sweep");
        Ok(())
    }
}
