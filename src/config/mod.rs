//! Configuration management for scrive.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory and created with
//! defaults on first run.

pub mod file;

pub use file::{get_config_path, DisplayConfig, ScriveConfig, ServiceConfig};
