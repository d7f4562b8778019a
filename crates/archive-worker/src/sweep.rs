//! Background sweeps: claim pending jobs and run each one as its own unit.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use archive_core::config::WorkerConfig;
use archive_core::result::AppResult;
use archive_entity::job::{Job, JobKind, JobStatus};
use archive_service::JobEngine;

use crate::outcome::{OutcomeReceiver, SweepError, SweepOutcome, UnitResult};

/// Drives background jobs forward.
///
/// Each sweep claims a batch of jobs and launches one tracked task per job,
/// then returns without waiting for them. Every task carries a child of the
/// sweeper's cancellation token and reports a [`SweepOutcome`] when it ends.
#[derive(Debug)]
pub struct Sweeper {
    engine: JobEngine,
    config: WorkerConfig,
    tracker: TaskTracker,
    token: CancellationToken,
    outcomes: mpsc::UnboundedSender<SweepOutcome>,
}

impl Sweeper {
    /// Create a sweeper and the receiver its units report to.
    pub fn new(engine: JobEngine, config: WorkerConfig) -> (Self, OutcomeReceiver) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let sweeper = Self {
            engine,
            config,
            tracker: TaskTracker::new(),
            token: CancellationToken::new(),
            outcomes,
        };
        (sweeper, receiver)
    }

    /// Claim and launch pending background archive jobs.
    pub async fn run_archive_sweep(&self) -> AppResult<usize> {
        self.run_sweep(JobKind::Archive).await
    }

    /// Claim and launch pending background extract jobs.
    pub async fn run_extract_sweep(&self) -> AppResult<usize> {
        self.run_sweep(JobKind::Extract).await
    }

    /// Claim up to `batch_size` jobs of `kind` and launch a unit for each.
    ///
    /// Returns the number of units launched. After [`shutdown`](Self::shutdown)
    /// nothing is claimed.
    pub async fn run_sweep(&self, kind: JobKind) -> AppResult<usize> {
        if self.token.is_cancelled() {
            tracing::debug!(%kind, "Sweeper is shut down, skipping sweep");
            return Ok(0);
        }

        let jobs = self
            .engine
            .store()
            .claim_pending(kind, self.config.batch_size, self.config.lease())
            .await?;
        let launched = jobs.len();

        for job in jobs {
            let unit = Unit {
                engine: self.engine.clone(),
                token: self.token.child_token(),
                timeout: self.config.job_timeout(),
                max_attempts: self.config.max_attempts,
                outcomes: self.outcomes.clone(),
            };
            self.tracker.spawn(unit.run(job));
        }

        if launched > 0 {
            tracing::info!(%kind, launched, in_flight = self.tracker.len(), "Sweep launched jobs");
        } else {
            tracing::trace!(%kind, "No pending jobs");
        }
        Ok(launched)
    }

    /// Number of units still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel every running unit and wait up to `grace` for them to finish.
    ///
    /// Returns `true` if all units drained in time.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.token.cancel();
        self.tracker.close();

        let in_flight = self.tracker.len();
        tracing::info!(in_flight, "Sweeper shutting down");

        let drained = tokio::time::timeout(grace, self.tracker.wait())
            .await
            .is_ok();
        if drained {
            tracing::info!("Sweeper shut down complete");
        } else {
            tracing::warn!(
                remaining = self.tracker.len(),
                "Sweeper grace period elapsed with units still running"
            );
        }
        drained
    }
}

/// One background run of one job.
struct Unit {
    engine: JobEngine,
    token: CancellationToken,
    timeout: Duration,
    max_attempts: i32,
    outcomes: mpsc::UnboundedSender<SweepOutcome>,
}

impl Unit {
    async fn run(self, job: Job) {
        let kind = job.kind;
        let job_id = job.id;
        let attempt = job.attempts;

        tracing::debug!(%kind, %job_id, attempt, "Running background job");

        let run = tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(SweepError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.engine.initiate(job)) => match result {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(SweepError::Engine(e)),
                Err(_) => Err(SweepError::TimedOut(self.timeout)),
            },
        };

        let result = match run {
            Ok(()) => UnitResult::Completed,
            Err(err) => self.release(kind, job_id, err).await,
        };

        // The receiver only goes away during process teardown.
        let _ = self.outcomes.send(SweepOutcome {
            kind,
            job_id,
            attempt,
            result,
        });
    }

    async fn release(&self, kind: JobKind, job_id: Uuid, err: SweepError) -> UnitResult {
        let error = err.to_string();
        let status = match self
            .engine
            .store()
            .release(kind, job_id, &error, self.max_attempts)
            .await
        {
            Ok(status) => status,
            Err(e) => {
                return UnitResult::Stranded {
                    error: e.to_string(),
                };
            }
        };

        match err {
            SweepError::TimedOut(_) => UnitResult::TimedOut { status },
            SweepError::Cancelled => UnitResult::Cancelled { status },
            SweepError::Engine(_) if status == JobStatus::Failed => UnitResult::Failed { error },
            SweepError::Engine(_) => UnitResult::Released { error },
        }
    }
}
