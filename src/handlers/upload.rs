// POST /upload handler

use crate::files::FileProcessor;
use crate::models::ErrorBody;
use bytes::BufMut;
use futures_util::stream::TryStreamExt;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::multipart::{FormData, Part};
use warp::reply::Response;
use warp::Reply;

const FILE_FIELD: &str = "file";

#[tracing::instrument(skip(processor, form))]
pub async fn upload_handler(processor: FileProcessor, mut form: FormData) -> Result<Response, Infallible> {
    let part = match next_file_part(&mut form).await {
        Ok(Some(part)) => part,
        Ok(None) => {
            tracing::warn!("Upload request with no file field");
            return Ok(error_reply(StatusCode::BAD_REQUEST, "No file provided"));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing file: {}", e),
            ));
        }
    };

    let filename = part.filename().unwrap_or_default().to_string();
    if filename.is_empty() {
        return Ok(error_reply(StatusCode::BAD_REQUEST, "No file selected"));
    }

    if !processor.is_supported(&filename) {
        tracing::warn!(filename = %filename, "Unsupported upload type");
        return Ok(error_reply(StatusCode::BAD_REQUEST, "Unsupported file type"));
    }

    let data = match read_part(part).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing file: {}", e),
            ));
        }
    };

    tracing::debug!(filename = %filename, bytes = data.len(), "File data received");

    let result = match tokio::task::spawn_blocking(move || processor.process(&data, &filename)).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Extraction task failed");
            return Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing file: {}", e),
            ));
        }
    };

    tracing::info!(
        filename = %result.filename(),
        file_type = %result.file_type(),
        success = result.is_success(),
        "Upload processed"
    );

    // A failed extraction is still a processed upload; `success` carries the outcome.
    Ok(warp::reply::json(&result).into_response())
}

/// First part named `file`; other fields are skipped
async fn next_file_part(form: &mut FormData) -> Result<Option<Part>, warp::Error> {
    while let Some(part) = form.try_next().await? {
        if part.name() == FILE_FIELD {
            return Ok(Some(part));
        }
    }
    Ok(None)
}

async fn read_part(part: Part) -> Result<Vec<u8>, warp::Error> {
    part.stream()
        .try_fold(Vec::new(), |mut data, buf| async move {
            data.put(buf);
            Ok(data)
        })
        .await
}

fn error_reply(status: StatusCode, error: impl Into<String>) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody::new(error)), status).into_response()
}
