//! Style presets and settings import/export
//!
//! A preset is a named partial set of options applied over the current
//! ones. Three presets ship built in; user presets are kept in a JSON file
//! next to the config file.

use crate::config::{app_dir, ConfigError};
use crate::options::{CardTextColorMode, OptionsError, OptionsPatch, ThemeOptions};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for preset and import/export operations
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Preset not found: {0}")]
    NotFound(String),
    #[error("Built-in preset cannot be changed: {0}")]
    BuiltIn(String),
    #[error("Preset name cannot be empty")]
    EmptyName,
    #[error("Imported settings must be a JSON object")]
    NotAnObject,
    #[error("Invalid settings: {0}")]
    Invalid(#[from] OptionsError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A named partial set of options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,
    pub settings: OptionsPatch,
}

impl Preset {
    /// Apply this preset's settings over `options`.
    pub fn apply_to(&self, options: &mut ThemeOptions) {
        self.settings.apply_to(options);
    }
}

/// Presets that ship with the integration
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "Mirage Default".to_string(),
            is_default: true,
            settings: OptionsPatch {
                glass_transparency: Some(30.0),
                glass_blur: Some(20.0),
                border_radius: Some(16.0),
                border_width: Some(1.0),
                separator_width: Some(1.0),
                accent_color: Some("#3b82f6".to_string()),
                card_text_color_mode: Some(CardTextColorMode::Auto),
                ..Default::default()
            },
        },
        Preset {
            name: "Pure Glass".to_string(),
            is_default: true,
            settings: OptionsPatch {
                glass_transparency: Some(25.0),
                glass_blur: Some(30.0),
                border_width: Some(0.0),
                separator_width: Some(0.0),
                border_radius: Some(24.0),
                card_text_color_mode: Some(CardTextColorMode::Light),
                ..Default::default()
            },
        },
        Preset {
            name: "Minimalist Solid".to_string(),
            is_default: true,
            settings: OptionsPatch {
                border_radius: Some(8.0),
                border_width: Some(1.0),
                separator_width: Some(1.0),
                card_text_color_mode: Some(CardTextColorMode::Dark),
                ..Default::default()
            },
        },
    ]
}

fn is_builtin(name: &str) -> bool {
    builtin_presets().iter().any(|p| p.name == name)
}

/// Returns the path to the user presets file.
pub fn presets_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dir()?.join("presets.json"))
}

/// Built-in presets plus user presets persisted to a JSON file
#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
    custom: Vec<Preset>,
}

impl PresetStore {
    /// Load user presets from the default presets file.
    pub fn load() -> Result<Self, PresetError> {
        Self::load_from(&presets_path()?)
    }

    /// Load user presets from `path`; a missing file means no user presets.
    pub fn load_from(path: &Path) -> Result<Self, PresetError> {
        let custom = if path.exists() {
            let contents = fs::read_to_string(path)?;
            let mut presets: Vec<Preset> = serde_json::from_str(&contents)?;
            presets.retain(|p| !p.is_default);
            presets
        } else {
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            custom,
        })
    }

    fn persist(&self) -> Result<(), PresetError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.custom)?)?;
        Ok(())
    }

    /// All presets, built-ins first
    pub fn all(&self) -> Vec<Preset> {
        let mut presets = builtin_presets();
        presets.extend(self.custom.iter().cloned());
        presets
    }

    pub fn find(&self, name: &str) -> Option<Preset> {
        self.all().into_iter().find(|p| p.name == name)
    }

    /// Save the full current options as a user preset, replacing any user
    /// preset with the same name.
    pub fn save_preset(&mut self, name: &str, options: &ThemeOptions) -> Result<(), PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }
        if is_builtin(name) {
            return Err(PresetError::BuiltIn(name.to_string()));
        }

        self.custom.retain(|p| p.name != name);
        self.custom.push(Preset {
            name: name.to_string(),
            is_default: false,
            settings: OptionsPatch::from_options(options),
        });
        self.persist()
    }

    /// Delete a user preset.
    pub fn delete_preset(&mut self, name: &str) -> Result<(), PresetError> {
        let name = name.trim();
        if is_builtin(name) {
            return Err(PresetError::BuiltIn(name.to_string()));
        }
        let before = self.custom.len();
        self.custom.retain(|p| p.name != name);
        if self.custom.len() == before {
            return Err(PresetError::NotFound(name.to_string()));
        }
        self.persist()
    }
}

/// Exported settings document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsExport {
    pub metadata: ExportMetadata,
    pub settings: ThemeOptions,
}

/// Export metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Export timestamp (RFC 3339)
    pub exported_at: String,
    /// Application version
    pub version: String,
}

impl SettingsExport {
    pub fn new(options: &ThemeOptions) -> Self {
        let now: DateTime<Utc> = Utc::now();
        Self {
            metadata: ExportMetadata {
                exported_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            settings: options.clone(),
        }
    }

    /// Export to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parse exported settings.
///
/// Accepts either a [`SettingsExport`] document or a bare options object.
pub fn import_settings(json: &str) -> Result<ThemeOptions, PresetError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let object = value.as_object().ok_or(PresetError::NotAnObject)?;

    let settings = match object.get("settings") {
        Some(inner) if object.contains_key("metadata") => inner.clone(),
        _ => value.clone(),
    };
    if !settings.is_object() {
        return Err(PresetError::NotAnObject);
    }

    let mut options: ThemeOptions = serde_json::from_value(settings)?;
    options.normalize();
    options.validate()?;
    Ok(options)
}
