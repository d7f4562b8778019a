//! Job engine: creation, execution, and status lookup.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use archive_codec::{compress, decompress, list_entries};
use archive_core::config::SelectionConfig;
use archive_database::JobStore;
use archive_entity::job::{CreateJob, Job, JobKind, JobStatus};

use super::error::EngineError;
use super::selector::{list_candidates, select_for_compress, select_for_extract};

/// Creates jobs, runs them through the codec, and tracks their status.
///
/// The engine holds no job state of its own: every call reads from and
/// writes to the [`JobStore`].
#[derive(Debug, Clone)]
pub struct JobEngine {
    /// Persistent job storage.
    store: Arc<dyn JobStore>,
    /// Selection policy.
    selection: SelectionConfig,
}

impl JobEngine {
    /// Create a new engine.
    pub fn new(store: Arc<dyn JobStore>, selection: SelectionConfig) -> Self {
        Self { store, selection }
    }

    /// The store backing this engine.
    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Record an archive job and, unless it is a background job, run it.
    pub async fn create_archive(&self, data: CreateJob) -> Result<Job, EngineError> {
        self.create(JobKind::Archive, data).await
    }

    /// Record an extract job and, unless it is a background job, run it.
    pub async fn create_extract(&self, data: CreateJob) -> Result<Job, EngineError> {
        self.create(JobKind::Extract, data).await
    }

    async fn create(&self, kind: JobKind, data: CreateJob) -> Result<Job, EngineError> {
        data.validate()
            .map_err(|e| EngineError::Validation(e.message))?;

        let job = Job::new(kind, data);
        self.store.insert(&job).await?;

        info!(
            job_id = %job.id,
            kind = %kind,
            file = %job.file_name,
            dir = %job.dir,
            background = job.background,
            "Job created"
        );

        if job.background {
            return Ok(job);
        }
        self.initiate(job).await
    }

    /// Run a job of either kind.
    pub async fn initiate(&self, job: Job) -> Result<Job, EngineError> {
        match job.kind {
            JobKind::Archive => self.initiate_archive(job).await,
            JobKind::Extract => self.initiate_extract(job).await,
        }
    }

    /// Compress the selected files of the job's directory into its archive.
    ///
    /// On failure the stored status is left untouched.
    pub async fn initiate_archive(&self, job: Job) -> Result<Job, EngineError> {
        let dir = PathBuf::from(&job.dir);
        let archive_path = job.archive_path();
        let target = job.file_name.clone();
        let filter = job.filtered_names.clone();
        let limit = self.selection.max_selected_files;

        let selected = tokio::task::spawn_blocking(move || -> Result<Vec<String>, EngineError> {
            let candidates = list_candidates(&dir).map_err(|source| EngineError::Selection {
                dir: dir.display().to_string(),
                source,
            })?;
            let selected = select_for_compress(&candidates, &filter, &target, limit);
            compress(&archive_path, &dir, &selected)?;
            Ok(selected)
        })
        .await?
        .inspect_err(|e| warn!(job_id = %job.id, error = %e, "Archive job failed"))?;

        debug!(job_id = %job.id, files = ?selected, "Files archived");
        self.complete(job).await
    }

    /// Extract the selected entries of the job's archive into its directory.
    ///
    /// On failure the stored status is left untouched.
    pub async fn initiate_extract(&self, job: Job) -> Result<Job, EngineError> {
        let dir = PathBuf::from(&job.dir);
        let archive_path = job.archive_path();
        let filter = job.filtered_names.clone();
        let index_filter = job.index_filter();

        let extracted = tokio::task::spawn_blocking(move || -> Result<usize, EngineError> {
            let entries = list_entries(&archive_path)?;
            let selected = select_for_extract(&entries, &filter, &index_filter);
            decompress(&archive_path, &dir, &selected)?;
            Ok(selected.len())
        })
        .await?
        .inspect_err(|e| warn!(job_id = %job.id, error = %e, "Extract job failed"))?;

        debug!(job_id = %job.id, entries = extracted, "Entries extracted");
        self.complete(job).await
    }

    /// Look up a job. A missing job is `Ok(None)`.
    pub async fn get_status(&self, kind: JobKind, id: Uuid) -> Result<Option<Job>, EngineError> {
        Ok(self.store.find_by_id(kind, id).await?)
    }

    async fn complete(&self, mut job: Job) -> Result<Job, EngineError> {
        self.store
            .update_status(job.kind, job.id, JobStatus::Done)
            .await?;

        job.status = JobStatus::Done;
        job.claimed_at = None;
        job.updated_on = Utc::now();

        info!(job_id = %job.id, kind = %job.kind, "Job done");
        Ok(job)
    }
}
