//! Domain types for mediadrop.
//!
//! Pure data types with no I/O dependencies.

mod format;
mod job;

pub use format::FormatSelector;
pub use job::{Job, JobId, JobStatus};
