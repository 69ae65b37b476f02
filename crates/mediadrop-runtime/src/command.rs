//! Command builder and output capture for yt-dlp.
//!
//! This module handles building the yt-dlp argument vector and reading
//! the child's stdout/stderr. Arguments go straight to the process as an
//! argv vector; no shell is involved, so URLs and format specifiers are
//! never re-parsed.

use mediadrop_core::{DownloadRequest, FormatSelector, JobId};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::debug;

/// yt-dlp print spec that emits the final artifact path after post-processing.
const PRINT_FINAL_PATH: &str = "after_move:filepath";

/// Build the yt-dlp arguments for a request.
///
/// Audio jobs extract and transcode (`-x --audio-format mp3`); everything
/// else selects a format with `-f`. The URL always comes last, after `--`,
/// so a URL starting with `-` cannot be read as an option.
pub fn build_args(request: &DownloadRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(10);

    match &request.format {
        FormatSelector::Audio => {
            args.push("-x".into());
            args.push("--audio-format".into());
            args.push(FormatSelector::AUDIO_CODEC.into());
        }
        FormatSelector::Format(spec) => {
            args.push("-f".into());
            args.push(spec.into());
        }
    }

    args.push("-o".into());
    args.push(request.output_template.clone().into_os_string());
    args.push("--print".into());
    args.push(PRINT_FINAL_PATH.into());
    args.push("--".into());
    args.push((&request.url).into());

    args
}

/// Build the yt-dlp command with piped stdout/stderr.
pub(crate) fn build_command(tool_path: &Path, request: &DownloadRequest) -> Command {
    let mut cmd = Command::new(tool_path);
    cmd.args(build_args(request))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// Spawn a task that forwards each line of `stream` to tracing and
/// returns all lines once the stream closes.
///
/// The stream is drained to EOF. Bytes that are not UTF-8 are replaced
/// rather than ending the read, so the child never writes into a closed
/// pipe.
pub(crate) fn collect_lines<R>(
    stream: Option<R>,
    job_id: JobId,
    stream_type: &'static str,
) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut collected = Vec::new();
        let Some(stream) = stream else {
            return collected;
        };

        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buf);
                    let text = text.trim_end_matches(['\n', '\r']);
                    debug!(target: "mediadrop.runtime", job_id = %job_id, stream = stream_type, "{}", text);
                    collected.push(text.to_owned());
                }
                Err(e) => {
                    debug!(target: "mediadrop.runtime", job_id = %job_id, stream = stream_type, "Read failed: {e}");
                    break;
                }
            }
        }
        collected
    })
}
