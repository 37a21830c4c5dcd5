//! Configuration file management for scrive.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Transcription service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Endpoint of the transcription service. Expects a POST with a multipart
    /// body carrying one part named "image".
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Treat non-2xx responses as failures instead of parsing their body
    #[serde(default = "default_true")]
    pub strict_status: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            strict_status: true,
        }
    }
}

/// Text reveal display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Milliseconds between revealed words during the animation
    #[serde(default = "default_reveal_interval_ms")]
    pub reveal_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            reveal_interval_ms: default_reveal_interval_ms(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:5000/transcribe".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_reveal_interval_ms() -> u64 {
    200
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriveConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl ScriveConfig {
    /// Loads configuration from the user's config directory, writing a default
    /// config file if none exists yet.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the config file cannot be read or written
    /// - If the TOML is malformed
    pub fn load_or_init() -> Result<Self, anyhow::Error> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            let config = ScriveConfig::default();
            config.save()?;
            tracing::info!("Created default config at {}", config_path.display());
            return Ok(config);
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: ScriveConfig = toml::from_str(&config_content).map_err(|e| {
            anyhow::anyhow!("Invalid config file {}: {e}", config_path.display())
        })?;
        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = get_config_path()?;
        let config_content = toml::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Retrieves the path to the config file, creating the config directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> Result<PathBuf, anyhow::Error> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    let config_dir = home.join(".config").join("scrive");

    fs::create_dir_all(&config_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create config directory: {e}"))?;

    Ok(config_dir.join("scrive.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: ScriveConfig = toml::from_str("").unwrap();
        assert_eq!(config.service.endpoint, "http://localhost:5000/transcribe");
        assert_eq!(config.service.timeout_secs, 60);
        assert!(config.service.strict_status);
        assert_eq!(config.display.reveal_interval_ms, 200);
    }

    #[test]
    fn test_partial_toml_fills_missing_fields() {
        let config: ScriveConfig = toml::from_str(
            r#"
            [service]
            endpoint = "http://transcriber.local/transcribe"

            [display]
            reveal_interval_ms = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.service.endpoint, "http://transcriber.local/transcribe");
        assert_eq!(config.service.timeout_secs, 60);
        assert_eq!(config.display.reveal_interval_ms, 50);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = ScriveConfig::default();
        config.service.strict_status = false;
        config.display.reveal_interval_ms = 100;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: ScriveConfig = toml::from_str(&serialized).unwrap();
        assert!(!parsed.service.strict_status);
        assert_eq!(parsed.display.reveal_interval_ms, 100);
    }
}
