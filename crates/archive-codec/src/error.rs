//! Codec error type.

use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

use archive_core::error::{AppError, ErrorKind};

/// Errors raised while reading or writing an archive.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The archive could not be created, or does not exist / is not a valid container.
    #[error("Failed to open archive {}: {source}", path.display())]
    Open {
        /// Archive path.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: ZipError,
    },

    /// A single entry could not be written.
    #[error("Failed to write entry '{name}': {source}")]
    EntryWrite {
        /// Entry or source file name.
        name: String,
        /// Underlying cause.
        #[source]
        source: ZipError,
    },

    /// The archive's central directory could not be written.
    #[error("Failed to finish archive {}: {source}", path.display())]
    Finish {
        /// Archive path.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: ZipError,
    },

    /// An entry resolves outside the destination directory.
    #[error("Entry '{name}' resolves outside the destination directory")]
    PathTraversal {
        /// Stored entry name.
        name: String,
    },
}

impl CodecError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: impl Into<ZipError>) -> Self {
        Self::Open {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn entry(name: impl Into<String>, source: impl Into<ZipError>) -> Self {
        Self::EntryWrite {
            name: name.into(),
            source: source.into(),
        }
    }
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        let kind = match &err {
            CodecError::PathTraversal { .. } => ErrorKind::PathTraversal,
            CodecError::Open { .. }
            | CodecError::EntryWrite { .. }
            | CodecError::Finish { .. } => ErrorKind::Codec,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
