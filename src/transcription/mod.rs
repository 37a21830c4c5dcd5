//! Transcription service client for image-to-text conversion.
//!
//! This module talks to the external transcription service over HTTP and
//! normalizes its JSON responses into a shape the viewer can animate.

pub mod api;
pub mod response;

pub use api::{transcribe, TranscribeError};
pub use response::{TranscriptionResult, CORRECTION_PLACEHOLDER, TRANSCRIPTION_FALLBACK};
