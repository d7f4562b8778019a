//! Job kind and status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which operation a job performs. Each kind is stored in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Compress a directory's files into an archive.
    Archive,
    /// Decompress an archive's entries onto disk.
    Extract,
}

impl JobKind {
    /// Every kind, in sweep order.
    pub const ALL: [JobKind; 2] = [JobKind::Archive, JobKind::Extract];

    /// Table holding jobs of this kind.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Extract => "extract",
        }
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Extract => "extract",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of an archive or extract job.
///
/// ```text
/// new ──claim──▶ in_progress ──success──▶ done
///  ▲                 │
///  └────release──────┤
///                    └──release (attempts exhausted)──▶ failed
/// ```
///
/// Inline jobs go straight from `new` to `done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, waiting to be executed.
    New,
    /// Claimed by a background unit.
    InProgress,
    /// Codec step finished successfully.
    Done,
    /// Background attempts exhausted.
    Failed,
}

impl JobStatus {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Check whether moving from `self` to `next` is a legal transition.
    ///
    /// `done -> done` is accepted so that repeated completion is idempotent,
    /// and `in_progress -> in_progress` covers re-claiming an expired lease.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (New, InProgress)
                | (New, Done)
                | (InProgress, InProgress)
                | (InProgress, New)
                | (InProgress, Done)
                | (InProgress, Failed)
                | (Done, Done)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
