//! # archive-api
//!
//! HTTP API layer for the archive service built on Axum.
//!
//! Provides the archive and extract endpoints, request validation, the
//! request deadline and logging middleware, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
