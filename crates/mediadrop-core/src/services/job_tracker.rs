//! `JobTracker` - owns job records and drives the downloader.
//!
//! A submission registers a `downloading` record, runs the tool to
//! completion, resolves the artifact and finalizes the record. Status
//! polls read the registry and never block on a running job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{FormatSelector, Job, JobId};
use crate::jobs::{
    DEFAULT_MAX_COMPLETED_JOBS, JobError, JobIdGenerator, JobRegistry, resolve_artifact,
};
use crate::ports::{DownloadRequest, DownloaderPort};

/// What happens to a job's record when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Drop the record; later polls see "not found".
    #[default]
    Remove,
    /// Keep the record in `failed` with the error message.
    Retain,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remove => f.write_str("remove"),
            Self::Retain => f.write_str("retain"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remove" => Ok(Self::Remove),
            "retain" => Ok(Self::Retain),
            other => Err(format!(
                "invalid failure policy '{other}' (expected 'remove' or 'retain')"
            )),
        }
    }
}

/// Tracker settings.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Flat directory the tool writes artifacts into. Expected absolute;
    /// see `paths::prepare_downloads_dir`.
    pub downloads_dir: PathBuf,
    pub failure_policy: FailurePolicy,
    /// Finished jobs kept for polling (0 = unlimited).
    pub max_completed_jobs: usize,
}

impl TrackerConfig {
    pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
            failure_policy: FailurePolicy::default(),
            max_completed_jobs: DEFAULT_MAX_COMPLETED_JOBS,
        }
    }

    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_max_completed_jobs(mut self, max: usize) -> Self {
        self.max_completed_jobs = max;
        self
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDownload {
    pub download_id: JobId,
    pub file_name: String,
    pub output_path: PathBuf,
}

impl CompletedDownload {
    /// Relative URL the artifact is served under.
    #[must_use]
    pub fn file_url(&self) -> String {
        format!("/downloads/{}", self.file_name)
    }
}

/// The download job tracker.
///
/// Constructed once at the composition root and shared by all request
/// handlers.
pub struct JobTracker {
    downloader: Arc<dyn DownloaderPort>,
    registry: JobRegistry,
    ids: JobIdGenerator,
    config: TrackerConfig,
}

impl JobTracker {
    pub fn new(downloader: Arc<dyn DownloaderPort>, config: TrackerConfig) -> Self {
        Self {
            downloader,
            registry: JobRegistry::new(config.max_completed_jobs),
            ids: JobIdGenerator::new(),
            config,
        }
    }

    /// Replace the id generator (tests pin the clock this way).
    #[must_use]
    pub fn with_id_generator(mut self, ids: JobIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub const fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.config.downloads_dir
    }

    /// Submit a download and wait for it to finish.
    ///
    /// The job is visible as `downloading` from the moment this is called.
    /// The tool runs on its own task, so dropping this future does not
    /// leave the record stuck in `downloading`.
    pub async fn submit(
        &self,
        url: &str,
        format: FormatSelector,
    ) -> Result<CompletedDownload, JobError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(JobError::InvalidRequest("URL is required".to_string()));
        }

        let id = self.ids.next_id();
        let request = DownloadRequest::new(id, url, format.clone(), &self.config.downloads_dir);
        self.registry
            .insert(Job::downloading(id, url, format.clone()))
            .await;

        info!(
            target: "mediadrop.jobs",
            job_id = %id,
            url,
            format = %format,
            "Download submitted"
        );

        let run = JobRun {
            downloader: Arc::clone(&self.downloader),
            registry: self.registry.clone(),
            downloads_dir: self.config.downloads_dir.clone(),
            failure_policy: self.config.failure_policy,
        };

        match tokio::spawn(run.execute(request)).await {
            Ok(result) => result,
            Err(join_err) => {
                let err = JobError::subprocess(
                    format!("Download task for job {id} aborted: {join_err}"),
                    String::new(),
                );
                record_failure(&self.registry, self.config.failure_policy, id, &err).await;
                Err(err)
            }
        }
    }

    /// Look up a job. Pure read; never waits for a running job.
    pub async fn get_status(&self, id: JobId) -> Result<Job, JobError> {
        self.registry
            .get(id)
            .await
            .ok_or(JobError::NotFound { id })
    }
}

/// The owned half of a submission that runs on its own task.
struct JobRun {
    downloader: Arc<dyn DownloaderPort>,
    registry: JobRegistry,
    downloads_dir: PathBuf,
    failure_policy: FailurePolicy,
}

impl JobRun {
    async fn execute(self, request: DownloadRequest) -> Result<CompletedDownload, JobError> {
        let id = request.job_id;

        let outcome = match self.downloader.download(&request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(target: "mediadrop.jobs", job_id = %id, error = %err, "Download failed");
                record_failure(&self.registry, self.failure_policy, id, &err).await;
                return Err(err);
            }
        };

        let artifact =
            match resolve_artifact(&self.downloads_dir, id, outcome.reported_path.as_deref()).await
            {
                Ok(Some(artifact)) => artifact,
                Ok(None) => {
                    let err = JobError::ArtifactNotFound { id };
                    warn!(target: "mediadrop.jobs", job_id = %id, "Tool succeeded but no artifact found");
                    record_failure(&self.registry, self.failure_policy, id, &err).await;
                    return Err(err);
                }
                Err(io_err) => {
                    let err = JobError::ArtifactNotFound { id };
                    warn!(
                        target: "mediadrop.jobs",
                        job_id = %id,
                        downloads_dir = %self.downloads_dir.display(),
                        error = %io_err,
                        "Could not scan downloads directory"
                    );
                    record_failure(&self.registry, self.failure_policy, id, &err).await;
                    return Err(err);
                }
            };

        if self
            .registry
            .complete(id, artifact.path.clone(), artifact.file_name.clone())
            .await
            .is_none()
        {
            // Evicted or finished elsewhere; the caller still gets its file.
            debug!(target: "mediadrop.jobs", job_id = %id, "Job record no longer pending");
        }

        info!(
            target: "mediadrop.jobs",
            job_id = %id,
            file_name = %artifact.file_name,
            "Download completed"
        );

        Ok(CompletedDownload {
            download_id: id,
            file_name: artifact.file_name,
            output_path: artifact.path,
        })
    }
}

async fn record_failure(registry: &JobRegistry, policy: FailurePolicy, id: JobId, err: &JobError) {
    match policy {
        FailurePolicy::Remove => {
            registry.remove(id).await;
        }
        FailurePolicy::Retain => {
            registry.fail(id, err.to_string()).await;
        }
    }
}
