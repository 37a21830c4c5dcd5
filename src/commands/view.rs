//! Interactive transcription viewer.
//!
//! Runs the upload viewer loop: image selection, the transcription request as
//! a background task, the word reveal animation and the reset path.

use crate::clipboard::copy_to_clipboard;
use crate::config::ScriveConfig;
use crate::transcription::{self, TranscribeError, TranscriptionResult};
use crate::viewer::{SelectedImage, UploadViewer, ViewerCommand, ViewerTui};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

type RequestHandle = JoinHandle<Result<TranscriptionResult, TranscribeError>>;

/// Runs the interactive viewer, optionally preselecting an image file.
///
/// # Errors
/// - If the configuration cannot be loaded or created
/// - If the terminal UI cannot be initialized
pub async fn handle_view(file: Option<PathBuf>) -> Result<(), anyhow::Error> {
    tracing::info!("=== scrive viewer started ===");

    let config = ScriveConfig::load_or_init().map_err(|e| {
        tracing::error!("Failed to load configuration: {e}");
        anyhow::anyhow!("Configuration error: {e}")
    })?;

    tracing::info!(
        "Configuration loaded: endpoint={}, timeout={}s, strict_status={}, reveal_interval={}ms",
        config.service.endpoint,
        config.service.timeout_secs,
        config.service.strict_status,
        config.display.reveal_interval_ms
    );

    let mut viewer = UploadViewer::new(Duration::from_millis(config.display.reveal_interval_ms));

    let initial_path = file.as_ref().map(|p| p.display().to_string());
    if let Some(path) = file {
        match SelectedImage::load(&path) {
            Ok(image) => viewer.select_image(image),
            Err(e) => {
                tracing::warn!("Could not preselect image: {e}");
                viewer.set_error(e.to_string());
            }
        }
    }

    let mut tui =
        ViewerTui::new(initial_path).map_err(|e| anyhow::anyhow!("Failed to initialize UI: {e}"))?;

    // The one request that may be in flight at a time
    let mut request: Option<RequestHandle> = None;

    loop {
        viewer.tick(Instant::now());
        tui.draw(&viewer)?;

        if request.as_ref().is_some_and(JoinHandle::is_finished) {
            let handle = request.take().unwrap();
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Transcription task failed: {e}");
                    Err(TranscribeError::Transport(anyhow::anyhow!(
                        "Transcription task failed: {e}"
                    )))
                }
            };
            if let Err(e) = &outcome {
                tracing::error!("Transcription failed: {e:#}");
            } else {
                tracing::info!("Transcription completed");
            }
            viewer.finish_request(outcome, Instant::now());
        }

        match tui.handle_input(viewer.state())? {
            ViewerCommand::Continue => {}
            ViewerCommand::SelectPath(path) => match SelectedImage::load(&path) {
                Ok(image) => {
                    tracing::debug!("Selected image: {}", path.display());
                    viewer.select_image(image);
                }
                Err(e) => {
                    tracing::warn!("Image selection failed: {e}");
                    viewer.set_error(e.to_string());
                }
            },
            ViewerCommand::Transcribe => {
                if request.is_none() {
                    if let Some(image) = viewer.begin_request() {
                        tracing::info!("Transcribing {}", image.path.display());
                        let service = config.service.clone();
                        let path = image.path.clone();
                        let mime = image.mime;
                        request = Some(tokio::spawn(async move {
                            transcription::transcribe(&service, &path, mime).await
                        }));
                    }
                }
            }
            ViewerCommand::ShowCorrected => viewer.apply_correction(),
            ViewerCommand::Reset => {
                viewer.reset();
                tui.clear_input();
            }
            ViewerCommand::Copy => {
                let text = viewer.display_text();
                if !text.is_empty() {
                    if let Err(e) = copy_to_clipboard(text) {
                        tracing::warn!("Failed to copy to clipboard: {e}");
                    } else {
                        tui.notify("Copied to clipboard!");
                    }
                }
            }
            ViewerCommand::Quit => {
                if let Some(handle) = request.take() {
                    handle.abort();
                }
                break;
            }
        }
    }

    tui.cleanup()
        .map_err(|e| anyhow::anyhow!("Cleanup failed: {e}"))?;

    tracing::info!("=== scrive viewer exited ===");
    Ok(())
}
