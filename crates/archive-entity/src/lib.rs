//! # archive-entity
//!
//! Domain entity models for the archive service. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod job;
