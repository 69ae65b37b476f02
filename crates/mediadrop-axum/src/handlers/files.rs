//! Artifact download handler.
//!
//! Streams a file from the downloads directory as an attachment. Reads
//! are confined to that directory: names with separators or `..`, and
//! symlinks that lead elsewhere, are treated as missing.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use std::path::{Component, Path as FsPath, PathBuf};
use tokio_util::io::ReaderStream;

use crate::error::HttpError;
use crate::state::AppState;

fn file_not_found() -> HttpError {
    HttpError::NotFound("File not found".to_string())
}

/// Serve a downloaded artifact.
pub async fn download(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, HttpError> {
    let path = confine(state.tracker.downloads_dir(), &file_name)
        .await
        .ok_or_else(file_not_found)?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| file_not_found())?;
    let metadata = file.metadata().await.map_err(|_| file_not_found())?;
    if !metadata.is_file() {
        return Err(file_not_found());
    }

    tracing::info!(
        target: "mediadrop.http",
        file_name = %file_name,
        bytes = metadata.len(),
        "Serving artifact"
    );

    let headers = [
        (CONTENT_TYPE, "application/octet-stream".to_string()),
        (CONTENT_LENGTH, metadata.len().to_string()),
        (CONTENT_DISPOSITION, attachment_disposition(&file_name)),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

/// Resolve `file_name` inside `dir`, or `None` if it would escape it.
pub(crate) async fn confine(dir: &FsPath, file_name: &str) -> Option<PathBuf> {
    if file_name.contains(['/', '\\']) {
        return None;
    }
    let mut components = FsPath::new(file_name).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return None;
    }

    let root = tokio::fs::canonicalize(dir).await.ok()?;
    let resolved = tokio::fs::canonicalize(root.join(file_name)).await.ok()?;
    resolved.starts_with(&root).then_some(resolved)
}

/// `attachment; filename="..."; filename*=UTF-8''...`
fn attachment_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}
