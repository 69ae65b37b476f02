//! Locating the file the external tool produced for a job.
//!
//! The tool is asked to report the final path itself. When that report is
//! missing or unusable we fall back to scanning the downloads directory
//! for the job's filename prefix.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::JobId;

/// Suffixes of files the tool writes while it is still working.
const IN_PROGRESS_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp"];

/// A located artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// `downloads_dir` joined with the file name. Absolute whenever the
    /// tracker was given an absolute directory, which bootstrap guarantees.
    pub path: PathBuf,
    /// Bare file name, always starting with the job prefix.
    pub file_name: String,
}

/// Find the artifact for `id` inside `downloads_dir`.
///
/// `reported` is the path the tool printed, if any. It is only trusted when
/// its file name carries the job prefix and names a file directly inside
/// `downloads_dir`. Otherwise the directory is scanned and the
/// lexicographically smallest matching name wins, so concurrent listings
/// always agree.
pub async fn resolve_artifact(
    downloads_dir: &Path,
    id: JobId,
    reported: Option<&Path>,
) -> io::Result<Option<ResolvedArtifact>> {
    let prefix = id.file_prefix();

    if let Some(name) = reported
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .filter(|n| is_candidate(n, &prefix))
    {
        let path = downloads_dir.join(name);
        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            debug!(target: "mediadrop.jobs", job_id = %id, file_name = name, "Using tool-reported artifact");
            return Ok(Some(ResolvedArtifact {
                path,
                file_name: name.to_string(),
            }));
        }
    }

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(downloads_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    Ok(pick_artifact(names.iter().map(String::as_str), id).map(|name| ResolvedArtifact {
        path: downloads_dir.join(name),
        file_name: name.to_string(),
    }))
}

/// Deterministically pick one artifact name for `id` out of a listing.
pub(crate) fn pick_artifact<'a>(
    names: impl IntoIterator<Item = &'a str>,
    id: JobId,
) -> Option<&'a str> {
    let prefix = id.file_prefix();
    names.into_iter().filter(|n| is_candidate(n, &prefix)).min()
}

fn is_candidate(name: &str, prefix: &str) -> bool {
    name.starts_with(prefix) && !IN_PROGRESS_SUFFIXES.iter().any(|s| name.ends_with(s))
}
