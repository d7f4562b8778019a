//! Archive and extract job entities.

pub mod filter;
pub mod model;
pub mod status;

pub use filter::{base_name, parse_index_filter, parse_name_filter, path_stem};
pub use model::{CreateJob, Job};
pub use status::{JobKind, JobStatus};
