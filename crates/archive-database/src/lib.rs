//! # archive-database
//!
//! Persistence for archive and extract jobs: the [`JobStore`] trait the
//! engine and sweeper depend on, a PostgreSQL implementation, and an
//! in-memory implementation used by tests and database-less deployments.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
#[cfg(feature = "memory")]
pub use memory::MemoryJobStore;
pub use repositories::job::JobRepository;
pub use store::JobStore;
