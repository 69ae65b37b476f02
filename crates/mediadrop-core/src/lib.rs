#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod domain;
pub mod jobs;
pub mod paths;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{FormatSelector, Job, JobId, JobStatus};
pub use jobs::{
    DEFAULT_MAX_COMPLETED_JOBS, JobError, JobIdGenerator, JobRegistry, ResolvedArtifact,
    resolve_artifact,
};
pub use ports::{DownloadOutcome, DownloadRequest, DownloaderPort};
pub use services::{CompletedDownload, FailurePolicy, JobTracker, TrackerConfig};

// Re-export path utilities
pub use paths::{
    DEFAULT_DOWNLOADS_DIR_RELATIVE, DirectoryCreationStrategy, PathError, default_downloads_dir,
    prepare_downloads_dir, verify_writable,
};
