//! HTTP middleware.

pub mod logging;
pub mod timeout;
