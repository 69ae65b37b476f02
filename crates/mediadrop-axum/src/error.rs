//! Axum-specific error types and mappings.
//!
//! This module maps `JobError` to HTTP status codes and the JSON bodies
//! clients of the download API expect: `{error, details?, stderr?}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mediadrop_core::JobError;
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The download itself failed.
    #[error("{error}: {details}")]
    DownloadFailed {
        error: String,
        details: String,
        stderr: Option<String>,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stderr: Option<String>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: msg,
                    details: None,
                    stderr: None,
                },
            ),
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    details: None,
                    stderr: None,
                },
            ),
            Self::DownloadFailed {
                error,
                details,
                stderr,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error,
                    details: Some(details),
                    stderr,
                },
            ),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: msg,
                    details: None,
                    stderr: None,
                },
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<JobError> for HttpError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::InvalidRequest(msg) => Self::BadRequest(msg),
            JobError::Subprocess { message, stderr } => Self::DownloadFailed {
                error: "Download failed".to_string(),
                details: message,
                stderr: Some(stderr),
            },
            err @ JobError::ArtifactNotFound { .. } => Self::DownloadFailed {
                error: "Download completed but no file found".to_string(),
                details: err.to_string(),
                stderr: None,
            },
            JobError::NotFound { .. } => Self::NotFound("Download not found".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediadrop_core::JobId;

    #[test]
    fn subprocess_errors_keep_stderr() {
        let err: HttpError = JobError::subprocess("yt-dlp exited with exit status: 1", "boom").into();
        match err {
            HttpError::DownloadFailed {
                error,
                details,
                stderr,
            } => {
                assert_eq!(error, "Download failed");
                assert!(details.contains("exit status"));
                assert_eq!(stderr.as_deref(), Some("boom"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn lookup_misses_map_to_not_found() {
        let err: HttpError = JobError::NotFound { id: JobId::new(9) }.into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_request_maps_to_bad_request() {
        let err: HttpError = JobError::InvalidRequest("URL is required".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
