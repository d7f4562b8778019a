//! Job entity model.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use archive_core::error::AppError;

use super::status::{JobKind, JobStatus};

/// An archive or extract job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier, assigned at creation.
    pub id: Uuid,
    /// Operation performed by this job.
    pub kind: JobKind,
    /// Archive file name: the target for archive jobs, the source for extract jobs.
    pub file_name: String,
    /// Directory the operation is rooted at.
    pub dir: String,
    /// Current status.
    pub status: JobStatus,
    /// Free-form algorithm label supplied by the client (stored only).
    pub algorithm: Option<String>,
    /// Extension-stripped base names restricting which files participate.
    pub filtered_names: Vec<String>,
    /// 1-based entry indices restricting which entries are extracted.
    pub partial_extraction: Vec<i32>,
    /// Whether the job is deferred to the background sweep.
    pub background: bool,
    /// Number of background claims so far.
    pub attempts: i32,
    /// Summary of the last background failure.
    pub error_message: Option<String>,
    /// When the current background claim was taken.
    pub claimed_at: Option<DateTime<Utc>>,
    /// When the job was created.
    pub created_on: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_on: DateTime<Utc>,
}

impl Job {
    /// Build a fresh `new` job from a creation request.
    pub fn new(kind: JobKind, data: CreateJob) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            file_name: data.file_name,
            dir: data.dir,
            status: JobStatus::New,
            algorithm: data.algorithm,
            filtered_names: data.filtered_names,
            partial_extraction: data
                .partial_extraction
                .into_iter()
                .filter_map(|i| i32::try_from(i).ok())
                .collect(),
            background: data.background,
            attempts: 0,
            error_message: None,
            claimed_at: None,
            created_on: now,
            updated_on: now,
        }
    }

    /// Full path of the archive file this job reads or writes.
    pub fn archive_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.file_name)
    }

    /// 1-based index filter, ignoring any non-positive values.
    pub fn index_filter(&self) -> Vec<usize> {
        self.partial_extraction
            .iter()
            .filter(|i| **i > 0)
            .map(|i| *i as usize)
            .collect()
    }
}

/// Data required to create a new job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJob {
    /// Archive file name.
    pub file_name: String,
    /// Directory the operation is rooted at.
    pub dir: String,
    /// Optional algorithm label.
    pub algorithm: Option<String>,
    /// Base-name filter.
    pub filtered_names: Vec<String>,
    /// 1-based index filter (extract only).
    pub partial_extraction: Vec<u32>,
    /// Defer execution to the background sweep.
    pub background: bool,
}

impl CreateJob {
    /// Check the fields every job needs.
    ///
    /// `file_name` must be a bare file name so the archive always lands
    /// inside `dir`.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.file_name.trim().is_empty() {
            return Err(AppError::validation("file is required"));
        }
        if self.dir.trim().is_empty() {
            return Err(AppError::validation("dir is required"));
        }
        if self.file_name.contains(['/', '\\']) || self.file_name == "." || self.file_name == ".."
        {
            return Err(AppError::validation(format!(
                "file '{}' must be a plain file name",
                self.file_name
            )));
        }
        Ok(())
    }
}
