//! File and entry selection policy.

use serde::{Deserialize, Serialize};

/// Limits applied when choosing which files take part in a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Maximum number of source files packed into one archive.
    #[serde(default = "default_max_selected_files")]
    pub max_selected_files: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_selected_files: default_max_selected_files(),
        }
    }
}

fn default_max_selected_files() -> usize {
    10
}
