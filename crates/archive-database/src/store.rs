//! The job store abstraction consumed by the engine and the sweeper.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use archive_core::result::AppResult;
use archive_entity::job::{Job, JobKind, JobStatus};

/// Persistent storage for archive and extract jobs.
///
/// Archive and extract jobs live in separate tables with the same shape;
/// every operation is addressed by [`JobKind`]. Calls are plain futures, so
/// callers bound them with `tokio::time::timeout` or drop them to cancel.
#[async_trait]
pub trait JobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a job whose id was assigned by the caller.
    async fn insert(&self, job: &Job) -> AppResult<()>;

    /// Set the status of a job.
    ///
    /// Fails with `NotFound` when no row matches. A `done` job only accepts
    /// `done` again; any other target is rejected.
    async fn update_status(&self, kind: JobKind, id: Uuid, status: JobStatus) -> AppResult<()>;

    /// Fetch a job by id. A missing row is `Ok(None)`.
    async fn find_by_id(&self, kind: JobKind, id: Uuid) -> AppResult<Option<Job>>;

    /// List up to `limit` background jobs still in `new`, oldest first.
    ///
    /// This is a read-only view: nothing is claimed, and two calls may
    /// return the same jobs.
    async fn list_pending(&self, kind: JobKind, limit: usize) -> AppResult<Vec<Job>>;

    /// Atomically claim up to `limit` background jobs, oldest first.
    ///
    /// Claimable jobs are those in `new`, plus `in_progress` jobs whose claim
    /// is older than `lease`. Claimed jobs move to `in_progress`, get their
    /// `attempts` incremented and `claimed_at` stamped. A job is handed to at
    /// most one concurrent caller.
    async fn claim_pending(
        &self,
        kind: JobKind,
        limit: usize,
        lease: Duration,
    ) -> AppResult<Vec<Job>>;

    /// Give a claimed job back after a failed attempt.
    ///
    /// Records `error`, clears the claim, and moves the job to `new` when
    /// `attempts < max_attempts`, otherwise to `failed`. Returns the status
    /// the job ended in.
    async fn release(
        &self,
        kind: JobKind,
        id: Uuid,
        error: &str,
        max_attempts: i32,
    ) -> AppResult<JobStatus>;
}
