//! Download handlers - submission and status polling.

use axum::Json;
use axum::extract::{Form, FromRequest, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::error::HttpError;
use crate::state::AppState;
use mediadrop_core::{FormatSelector, Job, JobId};

/// Request to submit a download.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitDownloadRequest {
    /// Media location. Optional at the wire level so a missing value
    /// yields the API's own 400 body rather than a deserialization error.
    pub url: Option<String>,
    /// `"audio"` or a raw format specifier; defaults to `best`.
    pub format: Option<String>,
}

/// Body extractor accepting either JSON or an urlencoded form post.
#[derive(Debug)]
pub struct SubmitBody(pub SubmitDownloadRequest);

impl<S> FromRequest<S> for SubmitBody
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Some(content_type) = req.headers().get(CONTENT_TYPE) else {
            // No body to speak of; let the missing URL be reported as such.
            return Ok(Self(SubmitDownloadRequest::default()));
        };
        let is_form = content_type
            .to_str()
            .is_ok_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(body) = Form::<SubmitDownloadRequest>::from_request(req, state)
                .await
                .map_err(|e| HttpError::BadRequest(e.body_text()))?;
            Ok(Self(body))
        } else {
            let Json(body) = Json::<SubmitDownloadRequest>::from_request(req, state)
                .await
                .map_err(|e| HttpError::BadRequest(e.body_text()))?;
            Ok(Self(body))
        }
    }
}

/// Response from a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDownloadResponse {
    pub success: bool,
    pub file_name: String,
    /// Relative URL under `/downloads/`.
    pub file_path: String,
    pub download_id: JobId,
}

/// Submit a download and hold the request open until the tool exits.
pub async fn submit(
    State(state): State<AppState>,
    SubmitBody(req): SubmitBody,
) -> Result<Json<SubmitDownloadResponse>, HttpError> {
    let url = req.url.unwrap_or_default();
    let format = FormatSelector::parse(req.format.as_deref());

    let done = state.tracker.submit(&url, format).await?;

    Ok(Json(SubmitDownloadResponse {
        success: true,
        file_path: done.file_url(),
        file_name: done.file_name,
        download_id: done.download_id,
    }))
}

/// Get the stored record for a job.
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, HttpError> {
    let id: JobId = id
        .parse()
        .map_err(|_| HttpError::NotFound("Download not found".to_string()))?;

    let job = state.tracker.get_status(id).await?;

    tracing::debug!(
        target: "mediadrop.http",
        job_id = %id,
        status = ?job.status,
        "Status polled"
    );

    Ok(Json(job))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_allows_missing_format() {
        let json = serde_json::json!({ "url": "http://example.com/v" });

        let req: SubmitDownloadRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.url.as_deref(), Some("http://example.com/v"));
        assert!(req.format.is_none());
    }

    #[test]
    fn submit_request_allows_missing_url() {
        let req: SubmitDownloadRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(req.url.is_none());
    }

    #[test]
    fn submit_response_uses_camel_case() {
        let resp = SubmitDownloadResponse {
            success: true,
            file_name: "1_a.mp4".into(),
            file_path: "/downloads/1_a.mp4".into(),
            download_id: JobId::new(1),
        };
        let value = serde_json::to_value(resp).unwrap();
        assert_eq!(value["fileName"], "1_a.mp4");
        assert_eq!(value["filePath"], "/downloads/1_a.mp4");
        assert_eq!(value["downloadId"], 1);
    }
}
