//! In-memory job store backed by `DashMap`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use archive_core::error::AppError;
use archive_core::result::AppResult;
use archive_entity::job::{Job, JobKind, JobStatus};

use crate::store::JobStore;

#[derive(Debug)]
struct Slot {
    /// Insertion order, breaks `created_on` ties.
    seq: u64,
    job: Job,
}

/// Job store that keeps every job in process memory.
///
/// Claims re-check eligibility under the entry's write lock, so two
/// concurrent sweeps never receive the same job.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    archive: DashMap<Uuid, Slot>,
    extract: DashMap<Uuid, Slot>,
    next_seq: AtomicU64,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: JobKind) -> &DashMap<Uuid, Slot> {
        match kind {
            JobKind::Archive => &self.archive,
            JobKind::Extract => &self.extract,
        }
    }

    fn missing(kind: JobKind, id: Uuid) -> AppError {
        AppError::not_found(format!("{kind} job {id} not found"))
    }

    /// Ids of background jobs matching `eligible`, oldest first.
    fn candidates(&self, kind: JobKind, eligible: impl Fn(&Job) -> bool) -> Vec<Uuid> {
        let mut found: Vec<_> = self
            .table(kind)
            .iter()
            .filter(|slot| slot.job.background && eligible(&slot.job))
            .map(|slot| (slot.job.created_on, slot.seq, slot.job.id))
            .collect();
        found.sort_unstable();
        found.into_iter().map(|(_, _, id)| id).collect()
    }
}

fn claimable(job: &Job, lease: TimeDelta) -> bool {
    match job.status {
        JobStatus::New => true,
        JobStatus::InProgress => job
            .claimed_at
            .and_then(|claimed| claimed.checked_add_signed(lease))
            .is_some_and(|expiry| expiry <= Utc::now()),
        _ => false,
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: &Job) -> AppResult<()> {
        let table = self.table(job.kind);
        if table.contains_key(&job.id) {
            return Err(AppError::conflict(format!(
                "{} job {} already exists",
                job.kind, job.id
            )));
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        table.insert(
            job.id,
            Slot {
                seq,
                job: job.clone(),
            },
        );
        Ok(())
    }

    async fn update_status(&self, kind: JobKind, id: Uuid, status: JobStatus) -> AppResult<()> {
        let mut slot = self
            .table(kind)
            .get_mut(&id)
            .ok_or_else(|| Self::missing(kind, id))?;
        let job = &mut slot.job;

        if job.status == JobStatus::Done && !job.status.can_transition_to(status) {
            return Err(AppError::conflict(format!(
                "{kind} job {id} cannot move from {} to {status}",
                job.status
            )));
        }

        job.status = status;
        job.claimed_at = None;
        job.updated_on = Utc::now();
        Ok(())
    }

    async fn find_by_id(&self, kind: JobKind, id: Uuid) -> AppResult<Option<Job>> {
        Ok(self.table(kind).get(&id).map(|slot| slot.job.clone()))
    }

    async fn list_pending(&self, kind: JobKind, limit: usize) -> AppResult<Vec<Job>> {
        let table = self.table(kind);
        Ok(self
            .candidates(kind, |job| job.status == JobStatus::New)
            .into_iter()
            .filter_map(|id| table.get(&id).map(|slot| slot.job.clone()))
            .take(limit)
            .collect())
    }

    async fn claim_pending(
        &self,
        kind: JobKind,
        limit: usize,
        lease: Duration,
    ) -> AppResult<Vec<Job>> {
        let lease = TimeDelta::from_std(lease).unwrap_or(TimeDelta::MAX);
        let table = self.table(kind);
        let mut claimed = Vec::new();

        for id in self.candidates(kind, |job| claimable(job, lease)) {
            if claimed.len() >= limit {
                break;
            }
            let Some(mut slot) = table.get_mut(&id) else {
                continue;
            };
            // Another claimer may have won since the scan.
            if !claimable(&slot.job, lease) {
                continue;
            }
            let now = Utc::now();
            let job = &mut slot.job;
            job.status = JobStatus::InProgress;
            job.attempts += 1;
            job.claimed_at = Some(now);
            job.updated_on = now;
            claimed.push(job.clone());
        }

        Ok(claimed)
    }

    async fn release(
        &self,
        kind: JobKind,
        id: Uuid,
        error: &str,
        max_attempts: i32,
    ) -> AppResult<JobStatus> {
        let mut slot = self
            .table(kind)
            .get_mut(&id)
            .ok_or_else(|| Self::missing(kind, id))?;
        let job = &mut slot.job;

        let next = if job.attempts >= max_attempts {
            JobStatus::Failed
        } else {
            JobStatus::New
        };
        if job.status != JobStatus::InProgress || !job.status.can_transition_to(next) {
            return Err(AppError::conflict(format!(
                "{kind} job {id} is {} and cannot be released",
                job.status
            )));
        }

        job.status = next;
        job.error_message = Some(error.to_string());
        job.claimed_at = None;
        job.updated_on = Utc::now();
        Ok(job.status)
    }
}
