//! # archive-service
//!
//! Business logic for archive and extract jobs. The [`JobEngine`] records
//! jobs in a [`JobStore`](archive_database::JobStore), picks the files or
//! entries to operate on, and drives the codec on the blocking pool.

pub mod job;

pub use job::engine::JobEngine;
pub use job::error::EngineError;
