//! Route handlers.

pub mod archive;
pub mod extract;
pub mod health;
