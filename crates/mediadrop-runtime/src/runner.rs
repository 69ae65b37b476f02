//! `DownloaderPort` implementation for yt-dlp.
//!
//! This module provides the `YtDlpRunner`, which runs one yt-dlp child
//! process per job and waits for it to exit.

use async_trait::async_trait;
use mediadrop_core::{DownloadOutcome, DownloadRequest, DownloaderPort, JobError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::command::{build_command, collect_lines};

/// `DownloaderPort` implementation using the yt-dlp executable.
///
/// # Design
///
/// - Pure OS/process concerns only
/// - No registry or artifact logic
/// - No concurrency cap, no timeout: a hung tool hangs its job
#[derive(Debug, Clone)]
pub struct YtDlpRunner {
    tool_path: PathBuf,
}

impl YtDlpRunner {
    /// Create a runner for the binary at `tool_path`.
    ///
    /// The path is not checked here; call
    /// [`validate_tool`](crate::validate_tool) at startup.
    pub fn new(tool_path: impl Into<PathBuf>) -> Self {
        Self {
            tool_path: tool_path.into(),
        }
    }

    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }
}

#[async_trait]
impl DownloaderPort for YtDlpRunner {
    async fn download(&self, request: &DownloadRequest) -> Result<DownloadOutcome, JobError> {
        let job_id = request.job_id;

        let mut child = build_command(&self.tool_path, request)
            .spawn()
            .map_err(|e| {
                JobError::subprocess(
                    format!("Failed to start {}: {e}", self.tool_path.display()),
                    String::new(),
                )
            })?;

        info!(
            target: "mediadrop.runtime",
            job_id = %job_id,
            pid = ?child.id(),
            "Spawned yt-dlp"
        );

        let stdout = collect_lines(child.stdout.take(), job_id, "stdout");
        let stderr = collect_lines(child.stderr.take(), job_id, "stderr");

        let status = child.wait().await.map_err(|e| {
            JobError::subprocess(format!("Failed to wait for yt-dlp: {e}"), String::new())
        })?;

        let stdout_lines = stdout.await.unwrap_or_default();
        let stderr_text = stderr.await.unwrap_or_default().join("\n");

        debug!(
            target: "mediadrop.runtime",
            job_id = %job_id,
            %status,
            "yt-dlp exited"
        );

        if !status.success() {
            return Err(JobError::subprocess(
                format!("yt-dlp exited with {status}"),
                stderr_text,
            ));
        }

        // The print spec emits the final path as the last stdout line.
        let reported_path = stdout_lines
            .iter()
            .rev()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
            .map(PathBuf::from);

        Ok(DownloadOutcome {
            reported_path,
            stderr: stderr_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediadrop_core::{FormatSelector, JobId};
    use std::fs;
    use tempfile::TempDir;

    const ID: JobId = JobId::new(1_700_000_000_000);

    /// Write an executable shell script standing in for yt-dlp.
    #[cfg(unix)]
    fn fake_tool(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("yt-dlp");
        fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    const WRITES_ARTIFACT: &str = r#"
while [ "$#" -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
file=$(printf '%s' "$out" | sed 's/%(title)s/Song/; s/%(ext)s/mp3/')
printf 'data' > "$file"
echo "WARNING: falling back to generic extractor" >&2
echo "$file"
"#;

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_run_reports_final_path() {
        let bin = TempDir::new().unwrap();
        let downloads = TempDir::new().unwrap();
        let runner = YtDlpRunner::new(fake_tool(bin.path(), WRITES_ARTIFACT));
        let request = DownloadRequest::new(
            ID,
            "http://example.com/v",
            FormatSelector::Audio,
            downloads.path(),
        );

        let outcome = runner.download(&request).await.unwrap();

        let expected = downloads.path().join("1700000000000_Song.mp3");
        assert_eq!(outcome.reported_path, Some(expected.clone()));
        assert!(expected.is_file());
        assert!(outcome.stderr.contains("WARNING"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_a_subprocess_error_with_stderr() {
        let bin = TempDir::new().unwrap();
        let downloads = TempDir::new().unwrap();
        let runner = YtDlpRunner::new(fake_tool(
            bin.path(),
            "echo 'ERROR: Unsupported URL' >&2\nexit 1\n",
        ));
        let request = DownloadRequest::new(
            ID,
            "http://example.com/bad",
            FormatSelector::default(),
            downloads.path(),
        );

        let err = runner.download(&request).await.unwrap_err();
        assert!(matches!(err, JobError::Subprocess { .. }));
        assert_eq!(err.stderr(), Some("ERROR: Unsupported URL"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_subprocess_error() {
        let downloads = TempDir::new().unwrap();
        let runner = YtDlpRunner::new("/nonexistent/yt-dlp");
        let request = DownloadRequest::new(
            ID,
            "http://example.com/v",
            FormatSelector::default(),
            downloads.path(),
        );

        let err = runner.download(&request).await.unwrap_err();
        assert!(err.to_string().contains("Failed to start"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_utf8_stderr_does_not_break_a_successful_run() {
        let bin = TempDir::new().unwrap();
        let downloads = TempDir::new().unwrap();
        let body = format!(
            "printf 'Title: caf\\351\\n' >&2\n\
             i=0; while [ $i -lt 2000 ]; do echo \"[download] progress line $i\" >&2; i=$((i+1)); done\n\
             {WRITES_ARTIFACT}"
        );
        let runner = YtDlpRunner::new(fake_tool(bin.path(), &body));
        let request = DownloadRequest::new(
            ID,
            "http://example.com/v",
            FormatSelector::Audio,
            downloads.path(),
        );

        let outcome = runner.download(&request).await.unwrap();

        assert!(outcome.reported_path.is_some());
        assert!(outcome.stderr.contains("caf\u{fffd}"));
        assert!(outcome.stderr.contains("progress line 1999"));
        assert!(outcome.stderr.contains("WARNING"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_success_reports_no_path() {
        let bin = TempDir::new().unwrap();
        let downloads = TempDir::new().unwrap();
        let runner = YtDlpRunner::new(fake_tool(bin.path(), "exit 0\n"));
        let request = DownloadRequest::new(
            ID,
            "http://example.com/v",
            FormatSelector::default(),
            downloads.path(),
        );

        let outcome = runner.download(&request).await.unwrap();
        assert!(outcome.reported_path.is_none());
        assert!(outcome.stderr.is_empty());
    }
}
