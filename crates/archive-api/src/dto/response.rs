//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use archive_entity::job::{Job, JobStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Returned when a job is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreatedResponse {
    /// Job ID.
    pub id: Uuid,
    /// Status after the request: `done` for inline jobs, `new` for background jobs.
    pub status: JobStatus,
}

impl From<&Job> for JobCreatedResponse {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            status: job.status,
        }
    }
}

/// Status lookup result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    /// Job ID.
    pub id: Uuid,
    /// Archive file name.
    pub file: String,
    /// Directory.
    pub dir: String,
    /// Current status.
    pub status: JobStatus,
    /// Creation time.
    pub created_on: DateTime<Utc>,
    /// Last background failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            file: job.file_name,
            dir: job.dir,
            status: job.status,
            created_on: job.created_on,
            error_message: job.error_message,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
