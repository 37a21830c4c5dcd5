//! Application command handlers for scrive.
//!
//! This module organizes command handling into separate submodules, each responsible
//! for a specific application command.
//!
//! # Commands
//! - `view`: Interactive transcription viewer with word-by-word reveal
//! - `transcribe`: One-shot transcription of an image file
//! - `config`: Open configuration file in user's preferred editor
//! - `logs`: Display recent log entries

pub mod config;
pub mod logs;
pub mod transcribe;
pub mod view;

pub use config::handle_config;
pub use logs::handle_logs;
pub use transcribe::handle_transcribe;
pub use view::handle_view;
