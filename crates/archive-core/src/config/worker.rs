//! Background sweep configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Background job sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the background sweeps are scheduled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for the archive sweep.
    #[serde(default = "default_sweep_cron")]
    pub archive_sweep_cron: String,
    /// Cron expression (with seconds) for the extract sweep.
    #[serde(default = "default_sweep_cron")]
    pub extract_sweep_cron: String,
    /// Maximum number of jobs claimed per sweep and kind.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Deadline for a single background unit.
    #[serde(default = "default_job_timeout")]
    pub job_timeout_seconds: u64,
    /// How long a claim is honoured before another sweep may take the job over.
    #[serde(default = "default_lease")]
    pub lease_seconds: u64,
    /// Background attempts before a job is marked failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i32,
}

impl WorkerConfig {
    /// Deadline for a single background unit.
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_seconds)
    }

    /// Claim lease duration.
    pub fn lease(&self) -> Duration {
        Duration::from_secs(self.lease_seconds)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            archive_sweep_cron: default_sweep_cron(),
            extract_sweep_cron: default_sweep_cron(),
            batch_size: default_batch_size(),
            job_timeout_seconds: default_job_timeout(),
            lease_seconds: default_lease(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_cron() -> String {
    "0 * * * * *".to_string()
}

fn default_batch_size() -> usize {
    10
}

fn default_job_timeout() -> u64 {
    180
}

fn default_lease() -> u64 {
    600
}

fn default_max_attempts() -> i32 {
    3
}
