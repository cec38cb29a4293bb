//! Integration lifecycle
//!
//! [`Integration`] is what the host orchestrator drives: it is set up once,
//! told when options change, asked to handle panel commands, and finally
//! unloaded or removed. Every theme refresh generates from the stored
//! options and hands the result to the configured output.
//!
//! Failures while delivering a theme are logged and swallowed: a broken
//! theme file or an unreachable registry leaves the previous theme in
//! place but never fails setup or an options update.

use crate::backgrounds::{remove_backgrounds, save_background};
use crate::commands::{
    parse_message, Command, CommandMessage, Response, ERR_INVALID_SETTINGS, ERR_SAVE_FAILED,
    ERR_UPLOAD_FAILED,
};
use crate::config::{Config, ConfigError, OutputTarget};
use crate::generator::{generate, DerivedTheme};
use crate::host::{RegistryError, ThemeRegistry};
use crate::options::ThemeOptions;
use crate::output::{cleared_payloads, live_payloads, theme_file_path, write_theme_file, OutputError};
use crate::presets::{PresetError, PresetStore};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Service domain of the integration
pub const DOMAIN: &str = "mirage";
/// Service name for applying a preset
pub const SERVICE_APPLY_PRESET: &str = "apply_preset";

/// Error delivering a theme to the host
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned to callers of option-changing operations
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error(transparent)]
    Preset(#[from] PresetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A configured integration instance
pub struct Integration<R: ThemeRegistry> {
    config: Config,
    /// Where option changes are persisted; `None` keeps them in memory
    config_path: Option<PathBuf>,
    registry: R,
}

impl<R: ThemeRegistry> Integration<R> {
    pub fn new(config: Config, config_path: Option<PathBuf>, registry: R) -> Self {
        Self {
            config,
            config_path,
            registry,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn options(&self) -> &ThemeOptions {
        &self.config.options
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn into_registry(self) -> R {
        self.registry
    }

    /// Location of the generated theme file
    pub fn theme_file(&self) -> PathBuf {
        theme_file_path(&self.config.integration.ha_config_dir)
    }

    /// Generate the theme for the stored options
    pub fn current_theme(&self) -> DerivedTheme {
        generate(&self.config.options)
    }

    /// Set up the entry and apply the theme.
    pub fn setup(&mut self) -> bool {
        log::debug!(
            "Setting up Mirage theme integration ({:?} output)",
            self.config.integration.output
        );
        self.apply_theme();
        true
    }

    /// Replace the stored options, persist them and re-apply the theme.
    pub fn options_updated(&mut self, mut options: ThemeOptions) -> Result<(), IntegrationError> {
        options.normalize();
        let mut config = self.config.clone();
        config.options = options;
        if let Some(path) = &self.config_path {
            config.save_to(path)?;
        }
        self.config = config;
        log::debug!("Mirage options updated, reloading theme.");
        self.apply_theme();
        Ok(())
    }

    /// Apply a preset by name over the stored options.
    pub fn apply_preset(&mut self, presets: &PresetStore, name: &str) -> Result<(), IntegrationError> {
        let preset = presets
            .find(name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))?;
        let mut options = self.config.options.clone();
        preset.apply_to(&mut options);
        log::info!(
            "{}.{}: applying preset '{}'",
            DOMAIN,
            SERVICE_APPLY_PRESET,
            preset.name
        );
        self.options_updated(options)
    }

    /// Unload the entry.
    pub fn unload(&mut self) -> bool {
        log::info!("Unloading Mirage theme integration.");
        true
    }

    /// Remove the entry: delete uploaded backgrounds and clear both themes.
    pub fn remove(&mut self) {
        log::info!("Removing Mirage theme integration and cleaning up resources.");

        if let Err(e) = remove_backgrounds(&self.config.integration.ha_config_dir) {
            log::error!("Error removing background directory: {}", e);
        }

        match self.try_clear_themes() {
            Ok(()) => log::debug!("Cleared Mirage Dark and Mirage Light themes."),
            Err(e) => log::error!("Error clearing themes: {}", e),
        }
    }

    /// Generate and deliver the theme, logging any failure.
    pub fn apply_theme(&mut self) {
        match self.try_apply_theme() {
            Ok(()) => log::debug!("Mirage themes reloaded successfully."),
            Err(e) => log::error!("Failed to set Mirage theme: {}", e),
        }
    }

    /// Generate and deliver the theme.
    pub fn try_apply_theme(&mut self) -> Result<(), ApplyError> {
        let theme = self.current_theme();
        match self.config.integration.output {
            OutputTarget::Live => {
                for payload in live_payloads(&theme) {
                    self.registry.set_theme(&payload)?;
                }
            }
            OutputTarget::File => {
                let path = self.theme_file();
                write_theme_file(&theme, &path)?;
                log::debug!("Wrote theme file {}", path.display());
            }
        }
        self.registry.reload_themes()?;
        Ok(())
    }

    fn try_clear_themes(&mut self) -> Result<(), ApplyError> {
        match self.config.integration.output {
            OutputTarget::Live => {
                for payload in cleared_payloads() {
                    self.registry.set_theme(&payload)?;
                }
            }
            OutputTarget::File => {
                let path = self.theme_file();
                if path.exists() {
                    fs::remove_file(&path)?;
                }
            }
        }
        self.registry.reload_themes()?;
        Ok(())
    }

    /// Handle a raw JSON command message.
    pub fn handle_raw(&mut self, raw: &str) -> Response {
        match parse_message(raw) {
            Ok(msg) => self.handle_command(msg),
            Err(response) => response,
        }
    }

    /// Handle a parsed command message.
    pub fn handle_command(&mut self, msg: CommandMessage) -> Response {
        let id = msg.id;
        match msg.command {
            Command::GetSettings => match serde_json::to_value(&self.config.options) {
                Ok(settings) => Response::result(id, settings),
                Err(e) => Response::error(id, ERR_INVALID_SETTINGS, e.to_string()),
            },
            Command::GetLanguage => Response::result(id, json!(self.config.integration.language)),
            Command::UpdateSettings { settings } => self.handle_update_settings(id, settings),
            Command::UploadImage {
                file_name,
                file_data,
            } => match save_background(&self.config.integration.ha_config_dir, &file_name, &file_data)
            {
                Ok(url) => Response::result(id, json!({ "success": true, "url": url })),
                Err(e) => {
                    log::error!("Failed to upload image: {}", e);
                    Response::error(id, ERR_UPLOAD_FAILED, e.to_string())
                }
            },
        }
    }

    fn handle_update_settings(&mut self, id: u64, settings: serde_json::Value) -> Response {
        if !settings.is_object() {
            return Response::error(id, ERR_INVALID_SETTINGS, "settings must be an object");
        }
        let mut options: ThemeOptions = match serde_json::from_value(settings) {
            Ok(options) => options,
            Err(e) => return Response::error(id, ERR_INVALID_SETTINGS, e.to_string()),
        };
        options.normalize();
        if let Err(e) = options.validate() {
            return Response::error(id, ERR_INVALID_SETTINGS, e.to_string());
        }

        match self.options_updated(options) {
            Ok(()) => Response::result(id, json!({ "success": true })),
            Err(e) => {
                log::error!("Failed to store Mirage settings: {}", e);
                Response::error(id, ERR_SAVE_FAILED, e.to_string())
            }
        }
    }
}
