//! Shared fixtures for the route tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use mediadrop_axum::bootstrap::{AxumContext, CorsConfig};
use mediadrop_axum::routes::create_router;
use mediadrop_core::{
    DownloadOutcome, DownloadRequest, DownloaderPort, FailurePolicy, JobError, JobIdGenerator,
    JobTracker, TrackerConfig,
};
use std::path::Path;
use std::sync::Arc;

pub const FROZEN_MILLIS: u64 = 1_700_000_000_000;

fn frozen_clock() -> u64 {
    FROZEN_MILLIS
}

/// Scripted stand-in for yt-dlp.
pub enum FakeDownloader {
    /// Write `<id>_<title>.<ext>` next to the template and report it.
    Writes { title: &'static str, ext: &'static str },
    /// Exit unsuccessfully with this stderr.
    Fails { stderr: &'static str },
    /// Succeed without producing anything.
    Silent,
}

#[async_trait]
impl DownloaderPort for FakeDownloader {
    async fn download(&self, request: &DownloadRequest) -> Result<DownloadOutcome, JobError> {
        match self {
            Self::Writes { title, ext } => {
                let dir = request
                    .output_template
                    .parent()
                    .expect("template has a parent");
                let path = dir.join(format!("{}{title}.{ext}", request.job_id.file_prefix()));
                tokio::fs::write(&path, b"media bytes").await.unwrap();
                Ok(DownloadOutcome::default().with_reported_path(path))
            }
            Self::Fails { stderr } => Err(JobError::subprocess(
                "yt-dlp exited with exit status: 1",
                *stderr,
            )),
            Self::Silent => Ok(DownloadOutcome::default()),
        }
    }
}

/// Router backed by `downloader`, writing into `downloads_dir`, with ids
/// pinned to [`FROZEN_MILLIS`].
pub fn app(downloader: FakeDownloader, downloads_dir: &Path, policy: FailurePolicy) -> Router {
    let config = TrackerConfig::new(downloads_dir).with_failure_policy(policy);
    let tracker = JobTracker::new(Arc::new(downloader), config)
        .with_id_generator(JobIdGenerator::with_clock(frozen_clock));
    create_router(AxumContext::new(Arc::new(tracker)), &CorsConfig::AllowAll)
}
