//! Engine error type.

use std::io;

use thiserror::Error;

use archive_codec::CodecError;
use archive_core::error::{AppError, ErrorKind};

/// Errors raised while creating or running a job.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The creation request is malformed.
    #[error("Invalid job request: {0}")]
    Validation(String),

    /// The job store failed.
    #[error(transparent)]
    Store(#[from] AppError),

    /// Compressing or extracting failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The job's directory could not be listed.
    #[error("Failed to list directory {dir}: {source}")]
    Selection {
        /// Directory being listed.
        dir: String,
        /// Underlying cause.
        #[source]
        source: io::Error,
    },

    /// The blocking task running the codec panicked or was cancelled.
    #[error("Codec task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(message) => AppError::validation(message),
            EngineError::Store(e) => e,
            EngineError::Codec(e) => e.into(),
            EngineError::Selection { .. } => {
                AppError::with_source(ErrorKind::Storage, err.to_string(), err)
            }
            EngineError::Join(_) => {
                AppError::with_source(ErrorKind::Internal, err.to_string(), err)
            }
        }
    }
}
