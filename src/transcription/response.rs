//! Normalization of transcription service responses.
//!
//! The service replies with a JSON object carrying optional string fields
//! `transcribedText` and `correctedText`. Either field may be missing or of
//! the wrong type; such responses are still usable and get fixed substitutes
//! instead of being surfaced as errors.

use serde_json::Value;

/// Shown when the service returns no usable transcription field.
pub const TRANSCRIPTION_FALLBACK: &str = "No readable text found in the image";

/// Shown when corrected text is requested but the service returned none.
pub const CORRECTION_PLACEHOLDER: &str = "No corrected text available";

/// Normalized output of one transcription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResult {
    /// Raw transcription, whitespace-collapsed; fallback text if the field
    /// was missing or not a string
    pub transcribed: String,
    /// Corrected transcription, whitespace-collapsed; empty if the field was
    /// missing or not a string
    pub corrected: String,
}

impl TranscriptionResult {
    /// Builds a result from any JSON value the service returned.
    ///
    /// Non-object values and wrong-typed fields are tolerated: the
    /// transcription falls back to [`TRANSCRIPTION_FALLBACK`] and the
    /// correction to the empty string.
    pub fn from_json(value: &Value) -> Self {
        let transcribed = match value.get("transcribedText").and_then(Value::as_str) {
            Some(text) => collapse_whitespace(text),
            None => TRANSCRIPTION_FALLBACK.to_string(),
        };
        let corrected = value
            .get("correctedText")
            .and_then(Value::as_str)
            .map(collapse_whitespace)
            .unwrap_or_default();

        Self {
            transcribed,
            corrected,
        }
    }

    /// True when the service produced a non-empty corrected variant.
    pub fn has_correction(&self) -> bool {
        !self.corrected.is_empty()
    }
}

/// Trims and collapses runs of whitespace to single spaces.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_both_fields_normalized() {
        let result = TranscriptionResult::from_json(&json!({
            "transcribedText": "  Hello   world  ",
            "correctedText": "Hello,  world. ",
        }));
        assert_eq!(result.transcribed, "Hello world");
        assert_eq!(result.corrected, "Hello, world.");
        assert!(result.has_correction());
    }

    #[test]
    fn test_missing_transcription_uses_fallback() {
        let result = TranscriptionResult::from_json(&json!({}));
        assert_eq!(result.transcribed, TRANSCRIPTION_FALLBACK);
        assert_eq!(result.corrected, "");
        assert!(!result.has_correction());
    }

    #[test]
    fn test_non_string_fields_are_substituted() {
        let result = TranscriptionResult::from_json(&json!({
            "transcribedText": 42,
            "correctedText": ["not", "a", "string"],
        }));
        assert_eq!(result.transcribed, TRANSCRIPTION_FALLBACK);
        assert_eq!(result.corrected, "");
    }

    #[test]
    fn test_non_object_json_is_tolerated() {
        let result = TranscriptionResult::from_json(&json!(["unexpected"]));
        assert_eq!(result.transcribed, TRANSCRIPTION_FALLBACK);
        assert_eq!(result.corrected, "");
    }

    #[test]
    fn test_empty_string_transcription_stays_empty() {
        // An empty string is a valid value, not a missing field
        let result = TranscriptionResult::from_json(&json!({ "transcribedText": "   " }));
        assert_eq!(result.transcribed, "");
    }
}
