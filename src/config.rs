//! Configuration management for Mirage Theme
//!
//! Provides persistent configuration that is saved to and loaded from a
//! platform-specific config file. The stored theme options live in the
//! same file, so an options update is a config save.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/mirage-theme/config.toml` |
//! | macOS | `~/Library/Application Support/mirage-theme/config.toml` |
//! | Windows | `%APPDATA%\mirage-theme\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use mirage_theme::Config;
//!
//! // Load existing config or use defaults
//! let mut config = Config::load().unwrap_or_default();
//!
//! // Modify settings
//! config.options.glass_blur = 30.0;
//!
//! // Save to disk
//! config.save().expect("Failed to save config");
//! ```

use crate::options::ThemeOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "mirage-theme";

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the application config directory, creating it if needed.
pub fn app_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join(APP_DIR_NAME);

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir)
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dir()?.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// How the integration talks to the host
    #[serde(default)]
    pub integration: IntegrationConfig,
    /// Stored theme options
    #[serde(default)]
    pub options: ThemeOptions,
}

/// Host integration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Host UI language reported to the settings panel
    pub language: String,
    /// How generated themes are delivered
    pub output: OutputTarget,
    /// Host configuration directory (contains `themes/` and `www/`)
    pub ha_config_dir: PathBuf,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            output: OutputTarget::File,
            ha_config_dir: PathBuf::from("/config"),
        }
    }
}

/// Theme delivery target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    /// Push payloads to the live theme registry
    Live,
    /// Write the YAML theme file
    #[default]
    File,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Blank option values are normalized to their defaults on load.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.options.normalize();
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CardTextColorMode;
    use tempfile::TempDir;

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.integration.language, "en");
        assert_eq!(config.integration.output, OutputTarget::File);
        assert_eq!(config.integration.ha_config_dir, PathBuf::from("/config"));
        assert_eq!(config.options, ThemeOptions::default());
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.integration.output = OutputTarget::Live;
        config.options.card_text_color_mode = CardTextColorMode::Dark;
        config.options.door_color = Some("#ff00ff".to_string());

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn config_load_missing_file_errors() {
        let result = Config::load_from(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn config_serializes_to_toml() {
        let toml_str = toml::to_string_pretty(&Config::default()).expect("Failed to serialize");

        assert!(toml_str.contains("[integration]"));
        assert!(toml_str.contains("[options]"));
        assert!(toml_str.contains("output = \"file\""));
    }

    #[test]
    fn config_deserializes_partial_toml() {
        let toml_str = r##"
[integration]
output = "live"

[options]
accent_color = "#ff6b35"
glass_transparency = 45
bg_color_dark = ""
"##;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, toml_str).unwrap();
        let config = Config::load_from(&path).expect("Failed to deserialize");

        assert_eq!(config.integration.output, OutputTarget::Live);
        assert_eq!(config.integration.language, "en");
        assert_eq!(config.options.accent_color, "#ff6b35");
        assert_eq!(config.options.glass_transparency, 45.0);
        assert_eq!(config.options.bg_color_dark, "#0d1117");
        assert_eq!(config.options.border_radius, 16.0);
    }

    #[test]
    fn config_rejects_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[integration\noutput = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "Could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }
}
