//! Viewer state machine and word reveal animation.
//!
//! All viewer behavior that does not touch the terminal lives here: the
//! Idle → Requesting → ResultAnimating → ResultCorrected transitions, the
//! timer-driven reveal of the transcription and the reset path. The render
//! loop owns the clock and feeds `Instant`s into [`UploadViewer::tick`].

use std::time::{Duration, Instant};

use crate::transcription::{TranscribeError, TranscriptionResult};
use crate::viewer::SelectedImage;

/// Shown in the text pane while the display buffer is empty.
pub const NO_TEXT_PLACEHOLDER: &str = "No text available";

/// Which screen the viewer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Waiting for a selection or a transcribe action
    Idle,
    /// A transcription request is in flight
    Requesting,
    /// Revealing (or done revealing) the raw transcription
    ResultAnimating,
    /// Showing the corrected text
    ResultCorrected,
}

/// Timer-driven word reveal over a fixed text.
///
/// Owned by the current reveal cycle only; dropping it is the cancellation.
/// Words are split on whitespace up front, so empty tokens never appear.
#[derive(Debug)]
struct WordReveal {
    words: Vec<String>,
    revealed: usize,
    interval: Duration,
    next_word_at: Instant,
}

impl WordReveal {
    fn new(text: &str, interval: Duration, now: Instant) -> Self {
        let words = text.split_whitespace().map(str::to_string).collect();
        Self {
            words,
            revealed: 0,
            interval,
            next_word_at: now + interval,
        }
    }

    /// Returns the next word once its tick is due, at most one per call.
    fn next_word(&mut self, now: Instant) -> Option<String> {
        if self.revealed >= self.words.len() || now < self.next_word_at {
            return None;
        }
        let word = self.words[self.revealed].clone();
        self.revealed += 1;
        self.next_word_at = now + self.interval;
        Some(word)
    }

    fn is_done(&self) -> bool {
        self.revealed >= self.words.len()
    }
}

/// The upload viewer: one selected image, one request cycle, one reveal.
///
/// Exactly one [`ViewState`] holds at a time; the payload fields below are
/// cleared on every transition that invalidates them, so a failed request can
/// never coexist with a stale result and a reset always returns to a clean
/// Idle screen.
#[derive(Debug)]
pub struct UploadViewer {
    state: ViewState,
    image: Option<SelectedImage>,
    result: Option<TranscriptionResult>,
    reveal: Option<WordReveal>,
    display: String,
    error: Option<String>,
    reveal_interval: Duration,
}

impl UploadViewer {
    pub fn new(reveal_interval: Duration) -> Self {
        Self {
            state: ViewState::Idle,
            image: None,
            result: None,
            reveal: None,
            display: String::new(),
            error: None,
            reveal_interval,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The display buffer: the words revealed so far, or the corrected text.
    pub fn display_text(&self) -> &str {
        &self.display
    }

    /// True once every word of the raw transcription has been revealed.
    pub fn reveal_complete(&self) -> bool {
        self.reveal.as_ref().is_none_or(WordReveal::is_done)
    }

    /// True when a non-empty corrected text can still be switched to.
    pub fn has_correction(&self) -> bool {
        self.state == ViewState::ResultAnimating
            && self
                .result
                .as_ref()
                .is_some_and(TranscriptionResult::has_correction)
    }

    /// Shows a selection problem (bad path, unsupported type) on the Idle screen.
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Replaces the selected image, discarding any previous result, reveal
    /// and error. Does not leave the Idle state.
    pub fn select_image(&mut self, image: SelectedImage) {
        self.image = Some(image);
        self.result = None;
        self.reveal = None;
        self.display.clear();
        self.error = None;
    }

    /// Starts a request cycle, returning the image to send.
    ///
    /// Returns `None` without side effects while a request is already in
    /// flight or a result is on screen. Without a selected image it fails
    /// fast: the fixed no-image message is set and no request is issued.
    pub fn begin_request(&mut self) -> Option<&SelectedImage> {
        if self.state != ViewState::Idle {
            return None;
        }
        if self.image.is_none() {
            self.error = Some(TranscribeError::NoImageSelected.user_message().to_string());
            return None;
        }
        self.error = None;
        self.result = None;
        self.reveal = None;
        self.display.clear();
        self.state = ViewState::Requesting;
        self.image.as_ref()
    }

    /// Completes the in-flight request cycle.
    ///
    /// On success the reveal animation starts from an empty buffer. On
    /// failure any prior result is cleared, the fixed user message is shown
    /// and the viewer returns to Idle. Ignored unless a request is in flight,
    /// so a completion that lost its cycle to a reset cannot append stale
    /// state.
    pub fn finish_request(
        &mut self,
        outcome: Result<TranscriptionResult, TranscribeError>,
        now: Instant,
    ) {
        if self.state != ViewState::Requesting {
            tracing::debug!("Dropping request completion outside a request cycle");
            return;
        }

        match outcome {
            Ok(result) => {
                self.display.clear();
                self.reveal = Some(WordReveal::new(
                    &result.transcribed,
                    self.reveal_interval,
                    now,
                ));
                self.result = Some(result);
                self.error = None;
                self.state = ViewState::ResultAnimating;
            }
            Err(e) => {
                self.result = None;
                self.reveal = None;
                self.display.clear();
                self.error = Some(e.user_message().to_string());
                self.state = ViewState::Idle;
            }
        }
    }

    /// Advances the reveal animation. Returns true when a word was appended.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state != ViewState::ResultAnimating {
            return false;
        }
        let Some(reveal) = self.reveal.as_mut() else {
            return false;
        };
        let Some(word) = reveal.next_word(now) else {
            return false;
        };
        if !self.display.is_empty() {
            self.display.push(' ');
        }
        self.display.push_str(&word);
        true
    }

    /// Swaps the display buffer to the corrected text, without animation.
    ///
    /// A no-op unless the raw result is on screen and a non-empty corrected
    /// text exists.
    pub fn apply_correction(&mut self) {
        if self.state != ViewState::ResultAnimating {
            return;
        }
        let corrected = match &self.result {
            Some(result) if result.has_correction() => result.corrected.clone(),
            _ => return,
        };
        self.reveal = None;
        self.display = corrected;
        self.state = ViewState::ResultCorrected;
    }

    /// Returns to the initial Idle state, discarding all derived state.
    /// Legal from every state.
    pub fn reset(&mut self) {
        self.state = ViewState::Idle;
        self.image = None;
        self.result = None;
        self.reveal = None;
        self.display.clear();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::TRANSCRIPTION_FALLBACK;
    use serde_json::json;
    use std::path::PathBuf;

    const INTERVAL: Duration = Duration::from_millis(200);

    fn sample_image() -> SelectedImage {
        SelectedImage {
            path: PathBuf::from("/tmp/page.png"),
            file_name: "page.png".to_string(),
            mime: "image/png",
            size_bytes: 4,
            dimensions: Some((595, 842)),
        }
    }

    fn viewer_with_result(raw: &str, corrected: &str, start: Instant) -> UploadViewer {
        let mut viewer = UploadViewer::new(INTERVAL);
        viewer.select_image(sample_image());
        assert!(viewer.begin_request().is_some());
        viewer.finish_request(
            Ok(TranscriptionResult::from_json(&json!({
                "transcribedText": raw,
                "correctedText": corrected,
            }))),
            start,
        );
        viewer
    }

    #[test]
    fn test_request_without_image_fails_fast() {
        let mut viewer = UploadViewer::new(INTERVAL);
        assert!(viewer.begin_request().is_none());
        assert_eq!(viewer.state(), ViewState::Idle);
        assert_eq!(viewer.error(), Some("Please upload an image first"));
    }

    #[test]
    fn test_resubmission_is_rejected_while_requesting() {
        let mut viewer = UploadViewer::new(INTERVAL);
        viewer.select_image(sample_image());
        assert!(viewer.begin_request().is_some());
        assert_eq!(viewer.state(), ViewState::Requesting);
        assert!(viewer.begin_request().is_none());
        assert_eq!(viewer.state(), ViewState::Requesting);
    }

    #[test]
    fn test_reveal_appends_one_word_per_interval() {
        let start = Instant::now();
        let mut viewer = viewer_with_result("Hello   world  ", "", start);
        assert_eq!(viewer.state(), ViewState::ResultAnimating);
        assert_eq!(viewer.display_text(), "");

        // Before the first tick is due nothing appears
        assert!(!viewer.tick(start + Duration::from_millis(100)));
        assert_eq!(viewer.display_text(), "");

        assert!(viewer.tick(start + Duration::from_millis(200)));
        assert_eq!(viewer.display_text(), "Hello");

        assert!(viewer.tick(start + Duration::from_millis(400)));
        assert_eq!(viewer.display_text(), "Hello world");
        assert!(viewer.reveal_complete());

        // Terminal for this phase: further ticks change nothing
        assert!(!viewer.tick(start + Duration::from_millis(600)));
        assert_eq!(viewer.display_text(), "Hello world");
        assert_eq!(viewer.state(), ViewState::ResultAnimating);
    }

    #[test]
    fn test_completed_reveal_matches_collapsed_source() {
        let start = Instant::now();
        let raw = "The  quick\tbrown\n fox ";
        let mut viewer = viewer_with_result(raw, "", start);
        let mut now = start;
        for _ in 0..10 {
            now += INTERVAL;
            viewer.tick(now);
        }
        assert_eq!(viewer.display_text(), "The quick brown fox");
    }

    #[test]
    fn test_display_is_word_prefix_of_source_at_every_step() {
        let start = Instant::now();
        let mut viewer = viewer_with_result("one two three four", "", start);
        let mut now = start;
        for _ in 0..6 {
            now += INTERVAL;
            viewer.tick(now);
            let source = "one two three four";
            let shown = viewer.display_text();
            assert!(source.starts_with(shown));
            assert!(shown.is_empty() || !shown.ends_with(' '));
        }
    }

    #[test]
    fn test_missing_transcription_reveals_fallback() {
        let start = Instant::now();
        let mut viewer = UploadViewer::new(INTERVAL);
        viewer.select_image(sample_image());
        viewer.begin_request();
        viewer.finish_request(Ok(TranscriptionResult::from_json(&json!({}))), start);

        let mut now = start;
        for _ in 0..20 {
            now += INTERVAL;
            viewer.tick(now);
        }
        assert_eq!(viewer.display_text(), TRANSCRIPTION_FALLBACK);
    }

    #[test]
    fn test_failed_request_returns_to_idle_with_fixed_message() {
        let mut viewer = UploadViewer::new(INTERVAL);
        viewer.select_image(sample_image());
        viewer.begin_request();
        viewer.finish_request(
            Err(TranscribeError::Transport(anyhow::anyhow!(
                "connection refused"
            ))),
            Instant::now(),
        );
        assert_eq!(viewer.state(), ViewState::Idle);
        assert_eq!(
            viewer.error(),
            Some("Failed to connect to the server. Please try again.")
        );
        assert_eq!(viewer.display_text(), "");
        assert!(!viewer.has_correction());
    }

    #[test]
    fn test_correction_replaces_buffer_immediately() {
        let start = Instant::now();
        let mut viewer = viewer_with_result("Paris is nife.", "Paris is nice.", start);
        viewer.tick(start + INTERVAL);
        assert_eq!(viewer.display_text(), "Paris");
        assert!(viewer.has_correction());

        viewer.apply_correction();
        assert_eq!(viewer.state(), ViewState::ResultCorrected);
        assert_eq!(viewer.display_text(), "Paris is nice.");

        // The old reveal cycle is gone; no stale append can happen
        assert!(!viewer.tick(start + Duration::from_secs(10)));
        assert_eq!(viewer.display_text(), "Paris is nice.");
    }

    #[test]
    fn test_correction_without_corrected_text_is_noop() {
        let start = Instant::now();
        let mut viewer = viewer_with_result("Hello world", "", start);
        viewer.tick(start + INTERVAL);
        let before = viewer.display_text().to_string();

        viewer.apply_correction();
        assert_eq!(viewer.state(), ViewState::ResultAnimating);
        assert_eq!(viewer.display_text(), before);
    }

    #[test]
    fn test_correction_is_noop_outside_result_animating() {
        let mut viewer = UploadViewer::new(INTERVAL);
        viewer.apply_correction();
        assert_eq!(viewer.state(), ViewState::Idle);
    }

    #[test]
    fn test_reset_clears_everything_from_any_state() {
        let start = Instant::now();

        let mut idle = UploadViewer::new(INTERVAL);
        idle.set_error("Please upload an image first".to_string());
        idle.reset();
        assert_eq!(idle.state(), ViewState::Idle);
        assert!(idle.error().is_none());

        let mut requesting = UploadViewer::new(INTERVAL);
        requesting.select_image(sample_image());
        requesting.begin_request();
        requesting.reset();
        assert_eq!(requesting.state(), ViewState::Idle);
        assert!(requesting.image().is_none());

        let mut animating = viewer_with_result("Hello world", "Hello, world.", start);
        animating.tick(start + INTERVAL);
        animating.reset();
        assert_eq!(animating.state(), ViewState::Idle);
        assert!(animating.image().is_none());
        assert_eq!(animating.display_text(), "");
        assert!(animating.error().is_none());

        let mut corrected = viewer_with_result("Hello world", "Hello, world.", start);
        corrected.apply_correction();
        corrected.reset();
        assert_eq!(corrected.state(), ViewState::Idle);
        assert_eq!(corrected.display_text(), "");
    }

    #[test]
    fn test_late_completion_after_reset_is_dropped() {
        let start = Instant::now();
        let mut viewer = UploadViewer::new(INTERVAL);
        viewer.select_image(sample_image());
        viewer.begin_request();
        viewer.reset();

        viewer.finish_request(
            Ok(TranscriptionResult::from_json(
                &json!({ "transcribedText": "late" }),
            )),
            start,
        );
        assert_eq!(viewer.state(), ViewState::Idle);
        assert_eq!(viewer.display_text(), "");
        let mut now = start;
        for _ in 0..5 {
            now += INTERVAL;
            assert!(!viewer.tick(now));
        }
    }

    #[test]
    fn test_new_selection_supersedes_previous_result() {
        let start = Instant::now();
        let mut viewer = viewer_with_result("old text here", "fixed", start);
        viewer.tick(start + INTERVAL);
        assert_eq!(viewer.display_text(), "old");

        viewer.select_image(sample_image());
        assert_eq!(viewer.display_text(), "");
        assert!(!viewer.has_correction());
        // The superseded reveal cycle was cancelled with it
        assert!(!viewer.tick(start + Duration::from_secs(5)));
    }
}
