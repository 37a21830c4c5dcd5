//! Terminal user interface for the upload viewer.
//!
//! Renders one of four screens depending on the viewer state: the selection
//! screen with a path input, the busy screen while a request is in flight,
//! and the two-pane result view (image summary left, revealed text right).

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::viewer::state::NO_TEXT_PLACEHOLDER;
use crate::viewer::{UploadViewer, ViewState};

/// Common colors/styles.
const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const ACCENT: Color = Color::Rgb(150, 123, 182);
const ERROR_FG: Color = Color::Rgb(255, 80, 80);
const HELP_FG: Color = Color::Rgb(100, 100, 100);

/// User action resulting from input handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCommand {
    /// No action (no key pressed, or the key edited the path input)
    Continue,
    /// Select the image at this path
    SelectPath(PathBuf),
    /// Send the transcription request
    Transcribe,
    /// Swap to the corrected text
    ShowCorrected,
    /// Upload another image (reset)
    Reset,
    /// Copy the displayed text to the clipboard
    Copy,
    /// Leave the viewer
    Quit,
}

/// Terminal UI for the upload viewer.
pub struct ViewerTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Path input on the selection screen
    input: Input,
    /// Whether keystrokes edit the path input
    input_mode: bool,
    /// Start of the current busy indicator cycle
    busy_since: Instant,
    /// Short-lived feedback message (e.g. after copying)
    notification: Option<(String, Instant)>,
    cleaned_up: bool,
}

impl ViewerTui {
    /// Creates a new TUI instance and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    pub fn new(initial_path: Option<String>) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        let input_mode = initial_path.is_none();
        let input = Input::new(initial_path.unwrap_or_default());

        Ok(Self {
            terminal,
            input,
            input_mode,
            busy_since: Instant::now(),
            notification: None,
            cleaned_up: false,
        })
    }

    /// Shows a transient feedback message over the current screen.
    pub fn notify(&mut self, message: &str) {
        self.notification = Some((message.to_string(), Instant::now()));
    }

    /// Clears the path input, used when resetting to the selection screen.
    pub fn clear_input(&mut self) {
        self.input.reset();
        self.input_mode = true;
    }

    /// Polls for user input and maps it to a viewer command.
    ///
    /// Blocks for at most 50ms, which also paces the render loop. While a
    /// request is in flight only quitting is honored, so the transcribe
    /// action cannot be re-triggered.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self, state: ViewState) -> Result<ViewerCommand> {
        if !event::poll(Duration::from_millis(50))? {
            return Ok(ViewerCommand::Continue);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(ViewerCommand::Continue);
        };

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(ViewerCommand::Quit);
        }

        Ok(match state {
            ViewState::Idle => self.handle_idle_key(key),
            ViewState::Requesting => ViewerCommand::Continue,
            ViewState::ResultAnimating | ViewState::ResultCorrected => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => ViewerCommand::Quit,
                KeyCode::Char('p') => ViewerCommand::ShowCorrected,
                KeyCode::Char('u') => ViewerCommand::Reset,
                KeyCode::Char('c') => ViewerCommand::Copy,
                _ => ViewerCommand::Continue,
            },
        })
    }

    /// Keys on the selection screen.
    ///
    /// In input mode keystrokes edit the path and Enter submits it. Outside
    /// input mode Enter is the transcribe action and 'e' re-opens the input.
    fn handle_idle_key(&mut self, key: KeyEvent) -> ViewerCommand {
        if self.input_mode {
            match key.code {
                KeyCode::Enter => {
                    let path = self.input.value().trim().to_string();
                    if path.is_empty() {
                        // Submitting an empty path is the transcribe action,
                        // which fails fast without a selected image
                        return ViewerCommand::Transcribe;
                    }
                    self.input_mode = false;
                    ViewerCommand::SelectPath(PathBuf::from(path))
                }
                KeyCode::Esc => {
                    self.input_mode = false;
                    ViewerCommand::Continue
                }
                _ => {
                    self.input.handle_event(&Event::Key(key));
                    ViewerCommand::Continue
                }
            }
        } else {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => ViewerCommand::Quit,
                KeyCode::Enter => ViewerCommand::Transcribe,
                KeyCode::Char('e') => {
                    self.input_mode = true;
                    ViewerCommand::Continue
                }
                KeyCode::Char('u') => ViewerCommand::Reset,
                _ => ViewerCommand::Continue,
            }
        }
    }

    /// Renders the screen for the current viewer state.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn draw(&mut self, viewer: &UploadViewer) -> Result<()> {
        // Expire stale notifications before rendering
        if let Some((_, since)) = &self.notification {
            if since.elapsed() >= Duration::from_millis(1500) {
                self.notification = None;
            }
        }

        let input_mode = self.input_mode;
        let input_value = self.input.value().to_string();
        let input_cursor = self.input.visual_cursor();
        let busy_elapsed = self.busy_since.elapsed();
        let notification = self.notification.clone();

        self.terminal.draw(|frame| {
            let area = frame.area();

            let padding_block = Block::default()
                .padding(Padding::uniform(1))
                .style(Style::default().bg(BG).fg(FG));
            frame.render_widget(&padding_block, area);
            let inner = padding_block.inner(area);

            let [content_area, footer_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

            match viewer.state() {
                ViewState::Idle => Self::draw_selection(
                    frame,
                    content_area,
                    viewer,
                    &input_value,
                    input_cursor,
                    input_mode,
                ),
                ViewState::Requesting => Self::draw_busy(frame, content_area, busy_elapsed),
                ViewState::ResultAnimating | ViewState::ResultCorrected => {
                    Self::draw_result(frame, content_area, viewer);
                }
            }

            let help = Self::help_line(viewer, input_mode);
            let footer = Paragraph::new(help)
                .alignment(Alignment::Center)
                .style(Style::default().fg(HELP_FG));
            frame.render_widget(footer, footer_area);

            if let Some((message, _)) = notification {
                Self::render_notification(frame, area, &message);
            }
        })?;

        Ok(())
    }

    /// Selection screen: upload target, path input and error line.
    fn draw_selection(
        frame: &mut Frame,
        area: Rect,
        viewer: &UploadViewer,
        input_value: &str,
        input_cursor: usize,
        input_mode: bool,
    ) {
        let [target_area, input_area, error_area] = Layout::vertical([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let target_block = Block::default()
            .title(" Upload ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT));
        let target_inner = target_block.inner(target_area);
        frame.render_widget(target_block, target_area);

        let target_lines: Vec<Line> = match viewer.image() {
            Some(image) => {
                let dimensions = image
                    .dimensions
                    .map(|(w, h)| format!("{w} x {h} px"))
                    .unwrap_or_else(|| "unknown size".to_string());
                vec![
                    Line::from(""),
                    Line::styled(
                        image.file_name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Line::from(format!("{} / {dimensions}", image.mime)),
                    Line::from(image.size_display()),
                    Line::from(""),
                    Line::styled("Press Enter to transcribe", Style::default().fg(ACCENT)),
                ]
            }
            None => vec![
                Line::from(""),
                Line::from("No image selected"),
                Line::from(""),
                Line::styled(
                    "Type a path to a png/jpg/jpeg file below",
                    Style::default().fg(HELP_FG),
                ),
            ],
        };
        let target = Paragraph::new(target_lines).alignment(Alignment::Center);
        frame.render_widget(target, target_inner);

        let input_style = if input_mode {
            Style::default().fg(FG)
        } else {
            Style::default().fg(HELP_FG)
        };
        let input_block = Block::default()
            .title(" Image path ")
            .borders(Borders::ALL)
            .border_style(input_style);
        let input_widget = Paragraph::new(input_value).style(input_style).block(input_block);
        frame.render_widget(input_widget, input_area);

        if input_mode {
            frame.set_cursor_position((
                input_area.x + 1 + input_cursor as u16,
                input_area.y + 1,
            ));
        }

        if let Some(message) = viewer.error() {
            let error = Paragraph::new(message)
                .style(Style::default().fg(ERROR_FG))
                .alignment(Alignment::Center);
            frame.render_widget(error, error_area);
        }
    }

    /// Busy screen with a pulsing indicator while the request is in flight.
    fn draw_busy(frame: &mut Frame, area: Rect, elapsed: Duration) {
        let dots = (elapsed.as_millis() / 300) % 4;
        let label = format!("Transcribing{}", ".".repeat(dots as usize));

        let centered = Rect {
            x: area.x,
            y: area.y + area.height / 2,
            width: area.width,
            height: 1,
        };
        let busy = Paragraph::new(label)
            .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(busy, centered);
    }

    /// Two-pane result view: image summary left, revealed text right.
    fn draw_result(frame: &mut Frame, area: Rect, viewer: &UploadViewer) {
        let [image_area, text_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);

        let image_block = Block::default()
            .title(" Image ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .padding(Padding::uniform(1));
        let image_inner = image_block.inner(image_area);
        frame.render_widget(image_block, image_area);

        if let Some(image) = viewer.image() {
            let dimensions = image
                .dimensions
                .map(|(w, h)| format!("{w} x {h} px"))
                .unwrap_or_else(|| "unknown size".to_string());
            let lines = vec![
                Line::styled(
                    image.file_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::from(""),
                Line::from(format!("Format:     {}", image.mime)),
                Line::from(format!("Dimensions: {dimensions}")),
                Line::from(format!("Size:       {}", image.size_display())),
                Line::from(""),
                Line::from(image.path.display().to_string()),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), image_inner);
        }

        let text_title = match viewer.state() {
            ViewState::ResultCorrected => " Corrected text ",
            _ => " Transcription ",
        };
        let text_block = Block::default()
            .title(text_title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .padding(Padding::uniform(1));
        let text_inner = text_block.inner(text_area);
        frame.render_widget(text_block, text_area);

        let display = viewer.display_text();
        let (content, style) = if display.is_empty() && viewer.reveal_complete() {
            (NO_TEXT_PLACEHOLDER, Style::default().fg(HELP_FG))
        } else {
            (display, Style::default().fg(FG))
        };
        let text = Paragraph::new(content).style(style).wrap(Wrap { trim: true });
        frame.render_widget(text, text_inner);
    }

    /// Key hints for the footer, matching what the current screen accepts.
    fn help_line(viewer: &UploadViewer, input_mode: bool) -> &'static str {
        match viewer.state() {
            ViewState::Idle => {
                if input_mode {
                    "↵ select image, esc done editing"
                } else {
                    "↵ transcribe, e edit path, esc/q exit"
                }
            }
            ViewState::Requesting => "waiting for the transcription service",
            ViewState::ResultAnimating => {
                if viewer.has_correction() {
                    "p corrected text, u upload another image, c copy, esc/q exit"
                } else {
                    "u upload another image, c copy, esc/q exit"
                }
            }
            ViewState::ResultCorrected => "u upload another image, c copy, esc/q exit",
        }
    }

    /// Renders a centered notification modal.
    fn render_notification(frame: &mut Frame, screen_area: Rect, message: &str) {
        let modal_width = (message.len() as u16).saturating_add(4);
        let modal_height = 3;

        let modal_x = screen_area.x + (screen_area.width.saturating_sub(modal_width)) / 2;
        let modal_y = screen_area.y + (screen_area.height.saturating_sub(modal_height)) / 2;

        let modal_area = Rect {
            x: modal_x,
            y: modal_y,
            width: modal_width.min(screen_area.width),
            height: modal_height,
        };

        let modal_block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Green).fg(Color::Black));
        frame.render_widget(&modal_block, modal_area);

        let inner_area = modal_block.inner(modal_area);
        let notification_text = Paragraph::new(message)
            .style(Style::default().bg(Color::Green).fg(Color::Black))
            .alignment(Alignment::Center);
        frame.render_widget(notification_text, inner_area);
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    pub fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ViewerTui {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
