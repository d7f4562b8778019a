//! Background processing for archive and extract jobs.
//!
//! This crate provides:
//! - A sweeper that claims pending background jobs and runs each one as a
//!   tracked, time-bounded task
//! - Outcome reporting for finished units
//! - A cron scheduler that triggers both sweeps

pub mod outcome;
pub mod scheduler;
pub mod sweep;

pub use outcome::{OutcomeReceiver, SweepError, SweepOutcome, UnitResult, spawn_reporter};
pub use scheduler::CronScheduler;
pub use sweep::Sweeper;
