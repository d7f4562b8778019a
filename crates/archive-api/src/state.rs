//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use archive_core::config::AppConfig;
use archive_service::JobEngine;

/// Application state passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Job engine
    pub engine: JobEngine,
}

impl AppState {
    /// Create the application state.
    pub fn new(config: Arc<AppConfig>, engine: JobEngine) -> Self {
        Self { config, engine }
    }
}
