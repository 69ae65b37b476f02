//! The job record and its identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;

use super::FormatSelector;

/// Identifier of a download job.
///
/// Ids are milliseconds since the Unix epoch at submission time, bumped
/// forward when two jobs land in the same millisecond. The decimal form
/// doubles as the filename prefix of the job's artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Filename prefix shared by every file the tool writes for this job.
    ///
    /// Includes the `_` separator so that id `17` never claims `170_x.mp4`.
    #[must_use]
    pub fn file_prefix(self) -> String {
        format!("{}_", self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// The external tool is still running.
    Downloading,
    /// The artifact was located.
    Completed,
    /// The tool failed or produced nothing. Only stored under the retain policy.
    Failed,
}

impl JobStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Downloading)
    }
}

/// One requested download and its tracked outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    /// Requested media location.
    #[serde(rename = "url")]
    pub source_url: String,
    pub format: FormatSelector,
    pub status: JobStatus,
    /// Absolute path of the artifact, set once completed.
    pub output_path: Option<PathBuf>,
    /// Artifact file name, set once completed.
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A freshly submitted job.
    pub fn downloading(id: JobId, source_url: impl Into<String>, format: FormatSelector) -> Self {
        Self {
            id,
            source_url: source_url.into(),
            format,
            status: JobStatus::Downloading,
            output_path: None,
            file_name: None,
            error: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Move to `completed`. Returns `false` if the job had already finished.
    pub(crate) fn mark_completed(&mut self, output_path: PathBuf, file_name: String) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Completed;
        self.output_path = Some(output_path);
        self.file_name = Some(file_name);
        self.finished_at = Some(Utc::now());
        true
    }

    /// Move to `failed`. Returns `false` if the job had already finished.
    pub(crate) fn mark_failed(&mut self, message: String) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Failed;
        self.error = Some(message);
        self.finished_at = Some(Utc::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_parses_and_prefixes() {
        let id: JobId = "1700000000000".parse().unwrap();
        assert_eq!(id.get(), 1_700_000_000_000);
        assert_eq!(id.file_prefix(), "1700000000000_");
        assert!("abc".parse::<JobId>().is_err());
    }

    #[test]
    fn downloading_job_serializes_original_shape() {
        let job = Job::downloading(
            JobId::new(42),
            "http://example.com/v",
            FormatSelector::default(),
        );
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["id"], 42);
        assert_eq!(value["url"], "http://example.com/v");
        assert_eq!(value["status"], "downloading");
        assert!(value["outputPath"].is_null());
        assert!(value["fileName"].is_null());
        assert!(value.get("error").is_none());
        assert!(value.get("finishedAt").is_none());
    }

    #[test]
    fn terminal_jobs_are_never_mutated() {
        let mut job = Job::downloading(JobId::new(1), "u", FormatSelector::Audio);
        assert!(job.mark_completed(PathBuf::from("/d/1_a.mp3"), "1_a.mp3".into()));
        assert!(!job.mark_failed("late failure".into()));
        assert!(!job.mark_completed(PathBuf::from("/d/1_b.mp3"), "1_b.mp3".into()));

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.file_name.as_deref(), Some("1_a.mp3"));
        assert!(job.error.is_none());
    }
}
