//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use archive_core::error::AppError;
use archive_entity::job::{CreateJob, parse_index_filter, parse_name_filter};

/// Archive request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRequest {
    /// Name of the archive to create inside `dir`.
    #[serde(default)]
    #[validate(length(min = 1, message = "file is required"))]
    pub file: String,
    /// Directory holding the files to compress.
    #[serde(default)]
    #[validate(length(min = 1, message = "dir is required"))]
    pub dir: String,
    /// `|`-separated base names to include.
    #[serde(default)]
    pub filtered_names: Option<String>,
    /// Algorithm label.
    #[serde(default)]
    pub algorithm: Option<String>,
    /// Run in the background sweep instead of inline.
    #[serde(default)]
    pub background: bool,
}

impl ArchiveRequest {
    /// Convert into the engine's creation input.
    pub fn into_create_job(self) -> CreateJob {
        CreateJob {
            file_name: self.file,
            dir: self.dir,
            algorithm: self.algorithm,
            filtered_names: parse_name_filter(self.filtered_names.as_deref().unwrap_or_default()),
            partial_extraction: Vec::new(),
            background: self.background,
        }
    }
}

/// Extract request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    /// Name of the archive inside `dir`.
    #[serde(default)]
    #[validate(length(min = 1, message = "file is required"))]
    pub file: String,
    /// Directory holding the archive; entries are extracted here.
    #[serde(default)]
    #[validate(length(min = 1, message = "dir is required"))]
    pub dir: String,
    /// `|`-separated base names to include.
    #[serde(default)]
    pub filtered_names: Option<String>,
    /// `|`-separated 1-based entry positions to include.
    #[serde(default)]
    pub partial_extraction: Option<String>,
    /// Algorithm label.
    #[serde(default)]
    pub algorithm: Option<String>,
    /// Run in the background sweep instead of inline.
    #[serde(default)]
    pub background: bool,
}

impl ExtractRequest {
    /// Convert into the engine's creation input.
    ///
    /// Fails when `partialExtraction` holds anything but positive integers.
    pub fn into_create_job(self) -> Result<CreateJob, AppError> {
        let partial_extraction =
            parse_index_filter(self.partial_extraction.as_deref().unwrap_or_default())?;

        Ok(CreateJob {
            file_name: self.file,
            dir: self.dir,
            algorithm: self.algorithm,
            filtered_names: parse_name_filter(self.filtered_names.as_deref().unwrap_or_default()),
            partial_extraction,
            background: self.background,
        })
    }
}
