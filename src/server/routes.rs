use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, info, warn};

use crate::dispatch::{render_response, UploadedFile};

use super::AppState;

/// Unexpected request-level failure; rendered as a `500`.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "an error occurred while processing files");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal server error: {}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Keeps axum's `413` for uploads over the body limit; every other multipart failure is a `500`.
fn multipart_failure(err: MultipartError) -> Response {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(error = %err.body_text(), "upload exceeds the body limit");
        return (StatusCode::PAYLOAD_TOO_LARGE, err.body_text()).into_response();
    }
    AppError::from(err).into_response()
}

/// `POST` upload handler: every multipart part with a filename is one file.
pub async fn process_files(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response, AppError> {
    let mut files = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Ok(multipart_failure(err)),
        };
        let Some(filename) = field.file_name().map(str::to_owned) else {
            debug!(field = ?field.name(), "ignoring form field without a filename");
            continue;
        };
        let content_type = field.content_type().map(str::to_owned);
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(err) => return Ok(multipart_failure(err)),
        };
        files.push(UploadedFile {
            filename,
            content_type,
            content: Some(data.to_vec()),
        });
    }

    if files.is_empty() {
        return Ok((StatusCode::BAD_REQUEST, "No file uploaded.").into_response());
    }

    let dispatcher = state.dispatcher.clone();
    let outcomes = tokio::task::spawn_blocking(move || dispatcher.process_files(&files)).await?;

    info!(
        files_processed = state.metrics.files_processed(),
        "total files processed so far"
    );
    Ok((StatusCode::OK, render_response(&outcomes)).into_response())
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
