//! Job orchestration.

pub mod engine;
pub mod error;
pub mod selector;

pub use engine::JobEngine;
pub use error::EngineError;
pub use selector::{FileCandidate, list_candidates, select_for_compress, select_for_extract};
