//! HTTP client for the transcription service.
//!
//! Sends the selected image as multipart form data (one part named "image")
//! and maps transport problems to a single error kind. The diagnostic detail
//! of a failure goes to the log; the viewer only ever shows a fixed message.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::config::ServiceConfig;
use crate::transcription::response::TranscriptionResult;

/// Failure kinds of one transcription request cycle.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// The transcribe action was triggered without a selected image
    #[error("no image selected")]
    NoImageSelected,
    /// Network failure, timeout, unexpected status or non-JSON body
    #[error("transcription request failed: {0}")]
    Transport(#[source] anyhow::Error),
}

impl TranscribeError {
    /// The fixed message shown to the user for this error kind.
    ///
    /// Internal diagnostic detail is never part of this string.
    pub fn user_message(&self) -> &'static str {
        match self {
            TranscribeError::NoImageSelected => "Please upload an image first",
            TranscribeError::Transport(_) => {
                "Failed to connect to the server. Please try again."
            }
        }
    }
}

/// Transcribes an image file via the configured service endpoint.
///
/// Posts the image bytes as a multipart part named "image". Any JSON body is
/// accepted and normalized; with `strict_status` enabled, non-2xx responses
/// take the transport failure path instead of being parsed.
///
/// # Errors
/// - If the image file cannot be read from disk
/// - If the request fails due to network issues (connection, timeout)
/// - If the service returns a non-2xx status (when `strict_status` is set)
/// - If the response body is not JSON
pub async fn transcribe(
    service: &ServiceConfig,
    image_path: &Path,
    mime: &str,
) -> Result<TranscriptionResult, TranscribeError> {
    let image_data = std::fs::read(image_path).map_err(|e| {
        TranscribeError::Transport(anyhow::anyhow!(
            "Failed to read image file {}: {e}",
            image_path.display()
        ))
    })?;

    let file_name = image_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let file_part = reqwest::multipart::Part::bytes(image_data)
        .file_name(file_name)
        .mime_str(mime)
        .map_err(|e| {
            TranscribeError::Transport(anyhow::anyhow!(
                "Failed to create image part for upload: {e}"
            ))
        })?;

    let form = reqwest::multipart::Form::new().part("image", file_part);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(service.timeout_secs))
        .build()
        .map_err(|e| {
            TranscribeError::Transport(anyhow::anyhow!("Failed to build HTTP client: {e}"))
        })?;

    tracing::debug!(
        "Transcription request:\n  URL: {}\n  Method: POST\n  Content-Type: multipart/form-data\n  Image: {}",
        service.endpoint,
        image_path.display()
    );

    let response = match client.post(&service.endpoint).multipart(form).send().await {
        Ok(resp) => resp,
        Err(e) => {
            let detail = if e.is_connect() {
                format!(
                    "Failed to connect to transcription service at {}: {e}",
                    service.endpoint
                )
            } else if e.is_timeout() {
                format!(
                    "Transcription request timed out after {}s: {e}",
                    service.timeout_secs
                )
            } else {
                format!("Transcription network error: {e}")
            };
            return Err(TranscribeError::Transport(anyhow::anyhow!(detail)));
        }
    };

    let status = response.status();
    if service.strict_status && !status.is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(TranscribeError::Transport(anyhow::anyhow!(
            "Transcription service returned status {status}: {error_body}"
        )));
    }

    let value: serde_json::Value = response.json().await.map_err(|e| {
        TranscribeError::Transport(anyhow::anyhow!(
            "Failed to parse transcription response as JSON: {e}"
        ))
    })?;

    tracing::debug!("Transcription response (status {status}): {value:#}");

    Ok(TranscriptionResult::from_json(&value))
}
