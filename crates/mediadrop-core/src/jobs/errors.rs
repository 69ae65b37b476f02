//! Job error types.
//!
//! Every error is terminal for the request that triggered it; nothing
//! here is retried.

use thiserror::Error;

use crate::domain::JobId;

/// Error type for job operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum JobError {
    /// The submission itself was unusable (e.g. empty URL).
    #[error("{0}")]
    InvalidRequest(String),

    /// The external tool could not start or exited with an error.
    #[error("{message}")]
    Subprocess {
        /// What went wrong (spawn error or exit status).
        message: String,
        /// Everything the tool wrote to stderr.
        stderr: String,
    },

    /// The tool reported success but no file carries the job prefix.
    #[error("Download completed but no file found for job {id}")]
    ArtifactNotFound {
        /// The job whose artifact is missing.
        id: JobId,
    },

    /// Unknown id, or a job that failed and was dropped.
    #[error("Download not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: JobId,
    },
}

impl JobError {
    pub fn subprocess(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Subprocess {
            message: message.into(),
            stderr: stderr.into(),
        }
    }

    /// Captured stderr, if this error came from the tool.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Subprocess { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
