//! What happened to each background unit.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use archive_entity::job::{JobKind, JobStatus};
use archive_service::EngineError;

/// Why a background unit did not complete.
///
/// The display text is what gets recorded as the job's `error_message`.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The engine reported a failure.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The unit exceeded its deadline.
    #[error("timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// The sweeper was shut down while the unit ran.
    #[error("cancelled")]
    Cancelled,
}

/// Result of one background unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitResult {
    /// The job is `done`.
    Completed,
    /// The job failed and went back to `new` for another attempt.
    Released {
        /// Failure summary.
        error: String,
    },
    /// The job failed on its last allowed attempt and is now `failed`.
    Failed {
        /// Failure summary.
        error: String,
    },
    /// The unit hit its deadline; the job was released to `status`.
    TimedOut {
        /// Status after release.
        status: JobStatus,
    },
    /// The unit was cancelled; the job was released to `status`.
    Cancelled {
        /// Status after release.
        status: JobStatus,
    },
    /// Releasing the job failed. It stays claimed until its lease expires.
    Stranded {
        /// Why the release failed.
        error: String,
    },
}

/// Outcome reported by a background unit when it finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Kind of the job.
    pub kind: JobKind,
    /// Job identifier.
    pub job_id: Uuid,
    /// Attempt number of this run (1-based).
    pub attempt: i32,
    /// What happened.
    pub result: UnitResult,
}

/// Receiving end of the outcome channel.
pub type OutcomeReceiver = mpsc::UnboundedReceiver<SweepOutcome>;

/// Log every outcome until all senders are gone.
pub fn spawn_reporter(mut outcomes: OutcomeReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(outcome) = outcomes.recv().await {
            let SweepOutcome {
                kind,
                job_id,
                attempt,
                result,
            } = outcome;

            match result {
                UnitResult::Completed => {
                    tracing::info!(%kind, %job_id, attempt, "Background job completed");
                }
                UnitResult::Released { error } => {
                    tracing::warn!(%kind, %job_id, attempt, %error, "Background job released for retry");
                }
                UnitResult::Failed { error } => {
                    tracing::error!(%kind, %job_id, attempt, %error, "Background job failed");
                }
                UnitResult::TimedOut { status } => {
                    tracing::warn!(%kind, %job_id, attempt, %status, "Background job timed out");
                }
                UnitResult::Cancelled { status } => {
                    tracing::info!(%kind, %job_id, attempt, %status, "Background job cancelled");
                }
                UnitResult::Stranded { error } => {
                    tracing::error!(
                        %kind, %job_id, attempt, %error,
                        "Failed to release background job; waiting for lease expiry"
                    );
                }
            }
        }
        tracing::debug!("Outcome reporter stopped");
    })
}
