//! One-shot transcription of an image file.
//!
//! Accepts an image path and prints the transcription (or the corrected
//! variant) without entering the interactive viewer, reusing the same
//! service client.

use crate::clipboard::copy_to_clipboard;
use crate::config::ScriveConfig;
use crate::transcription::{self, CORRECTION_PLACEHOLDER};
use crate::viewer::SelectedImage;
use std::path::PathBuf;

/// Handles non-interactive transcription of an image file.
///
/// # Arguments
/// * `file` - Path to the image file to transcribe
/// * `corrected` - If true, output the corrected text instead of the raw one
/// * `clipboard` - If true, copy to clipboard instead of stdout
/// * `output_file` - Optional file path to write output to instead of stdout
pub async fn handle_transcribe(
    file: PathBuf,
    corrected: bool,
    clipboard: bool,
    output_file: Option<String>,
) -> Result<(), anyhow::Error> {
    tracing::info!("=== scrive transcribe command ===");

    let config = ScriveConfig::load_or_init().map_err(|e| {
        tracing::error!("Failed to load configuration: {e}");
        anyhow::anyhow!("Configuration error: {e}")
    })?;

    let image = SelectedImage::load(&file)?;
    tracing::info!("Transcribing file: {}", image.path.display());

    let result = transcription::transcribe(&config.service, &image.path, image.mime)
        .await
        .map_err(|e| {
            tracing::error!("Transcription failed: {e:#}");
            anyhow::anyhow!("Transcription failed: {e:#}")
        })?;

    let text = if corrected {
        if result.has_correction() {
            result.corrected
        } else {
            CORRECTION_PLACEHOLDER.to_string()
        }
    } else {
        result.transcribed
    };

    // Determine output destination: file > clipboard > stdout (default)
    if let Some(file_path) = output_file {
        std::fs::write(&file_path, &text)
            .map_err(|e| anyhow::anyhow!("Failed to write to file '{file_path}': {e}"))?;
        tracing::debug!("Transcribed text written to file: {file_path}");
    } else if clipboard {
        if let Err(e) = copy_to_clipboard(&text) {
            tracing::warn!("Failed to copy to clipboard: {e}");
        } else {
            tracing::debug!("Transcribed text copied to clipboard");
        }
    } else {
        println!("{text}");
    }

    Ok(())
}
