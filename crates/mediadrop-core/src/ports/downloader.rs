//! Downloader trait definition.
//!
//! This port defines the interface for the external media tool. The
//! tracker decides what to download and where; implementations decide
//! how to drive the tool.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::{FormatSelector, JobId};
use crate::jobs::JobError;

/// Output template placeholders resolved by the tool itself.
pub const OUTPUT_TEMPLATE_SUFFIX: &str = "%(title)s.%(ext)s";

/// Everything the tool needs to run one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub job_id: JobId,
    pub url: String,
    pub format: FormatSelector,
    /// `<downloads_dir>/<job_id>_%(title)s.%(ext)s`
    pub output_template: PathBuf,
}

impl DownloadRequest {
    pub fn new(
        job_id: JobId,
        url: impl Into<String>,
        format: FormatSelector,
        downloads_dir: &Path,
    ) -> Self {
        let output_template =
            downloads_dir.join(format!("{}{OUTPUT_TEMPLATE_SUFFIX}", job_id.file_prefix()));
        Self {
            job_id,
            url: url.into(),
            format,
            output_template,
        }
    }
}

/// What a successful tool run reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Final artifact path as printed by the tool, when it printed one.
    pub reported_path: Option<PathBuf>,
    /// Captured stderr (warnings are common even on success).
    pub stderr: String,
}

impl DownloadOutcome {
    #[must_use]
    pub fn with_reported_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.reported_path = Some(path.into());
        self
    }
}

/// Runs the external media tool for one job.
///
/// Implementations return once the tool has exited. A tool that cannot
/// be started or exits unsuccessfully maps to [`JobError::Subprocess`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DownloaderPort: Send + Sync {
    async fn download(&self, request: &DownloadRequest) -> Result<DownloadOutcome, JobError>;
}
