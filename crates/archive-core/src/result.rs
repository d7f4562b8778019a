//! Convenience result type alias for the archive service.

use crate::error::AppError;

/// A specialized `Result` type for archive service operations.
pub type AppResult<T> = Result<T, AppError>;
