//! Locating and validating the yt-dlp executable.
//!
//! The tool is a fixed local file resolved once at startup. A missing or
//! unusable binary is fatal; nothing here retries or degrades.

use mediadrop_core::PathError;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where users can fetch a release build of the tool.
pub const YT_DLP_RELEASES_URL: &str = "https://github.com/yt-dlp/yt-dlp/releases/latest";

/// Errors that make the configured tool unusable.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Nothing at the configured path
    #[error(
        "yt-dlp not found at: {}\n\nDownload it from {} and place it there.",
        .path.display(),
        YT_DLP_RELEASES_URL
    )]
    NotFound { path: PathBuf },

    /// Path exists but is a directory or something else
    #[error("yt-dlp path is not a file: {}", .path.display())]
    NotAFile { path: PathBuf },

    /// Unix only: no execute bit set
    #[error("yt-dlp is not executable: {}\n\nTry: chmod +x \"{}\"", .path.display(), .path.display())]
    NotExecutable { path: PathBuf },

    #[error("Failed to read metadata for {}: {reason}", .path.display())]
    Metadata { path: PathBuf, reason: String },
}

/// Platform-specific file name of the tool.
pub const fn tool_binary_name() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "yt-dlp.exe"
    }

    #[cfg(not(target_os = "windows"))]
    {
        "yt-dlp"
    }
}

/// `<cwd>/yt-dlp` (`yt-dlp.exe` on Windows).
pub fn default_tool_path() -> Result<PathBuf, PathError> {
    let cwd = env::current_dir().map_err(PathError::CurrentDir)?;
    Ok(cwd.join(tool_binary_name()))
}

/// Check that `path` names a file we can execute.
pub fn validate_tool(path: &Path) -> Result<(), ToolError> {
    if !path.exists() {
        return Err(ToolError::NotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(ToolError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = path.metadata().map_err(|e| ToolError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(ToolError::NotExecutable {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}
