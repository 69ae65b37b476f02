//! Core services - the application's business logic layer.
//!
//! Services here are pure orchestrators - they don't know about concrete
//! implementations of the ports they drive.

mod job_tracker;

pub use job_tracker::{CompletedDownload, FailurePolicy, JobTracker, TrackerConfig};
