//! Theme options as edited in the settings panel
//!
//! Options are a flat bag of snake_case keys. Every key has a published
//! default in [`defaults`]; missing keys, `null` and empty strings all
//! resolve to that default (entity colors resolve to the accent color
//! instead, see [`crate::generator`]).
//!
//! ## Example
//!
//! ```
//! use mirage_theme::options::{CardTextColorMode, ThemeOptions};
//!
//! let options: ThemeOptions = serde_json::from_str(r##"{
//!     "accent_color": "#ff6b35",
//!     "glass_transparency": 45,
//!     "temperature_color": ""
//! }"##).unwrap();
//!
//! assert_eq!(options.accent_color, "#ff6b35");
//! assert_eq!(options.border_radius, 16.0);
//! assert_eq!(options.temperature_color, None);
//! assert_eq!(options.card_text_color_mode, CardTextColorMode::Auto);
//! ```

use crate::utils::NonEmptyExt;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Published default values for every option
pub mod defaults {
    pub const ACCENT_COLOR: &str = "#3b82f6";
    pub const BORDER_RADIUS: f64 = 16.0;
    pub const BORDER_WIDTH: f64 = 1.0;
    pub const SEPARATOR_WIDTH: f64 = 1.0;
    pub const GLASS_BLUR: f64 = 20.0;
    pub const GLASS_TRANSPARENCY: f64 = 30.0;
    pub const FLOATING_OPACITY: f64 = 100.0;

    pub const SOLID_BG_COLOR_DARK: &str = "#2d3748";
    pub const SOLID_BG_COLOR_LIGHT: &str = "#e2e8f0";
    pub const PAPER_BG_COLOR_DARK: &str = "#2a2d35";
    pub const PAPER_BG_COLOR_LIGHT: &str = "#ffffff";
    pub const FLOATING_BG_COLOR_DARK: &str = "#2a323d";
    pub const FLOATING_BG_COLOR_LIGHT: &str = "#ffffff";
    pub const BG_COLOR_DARK: &str = "#0d1117";
    pub const BG_COLOR_LIGHT: &str = "#f3f4f6";

    pub const DARK_PRIMARY_TEXT_COLOR: &str = "#e5e7eb";
    pub const DARK_SECONDARY_TEXT_COLOR: &str = "#9ca3af";
    pub const LIGHT_PRIMARY_TEXT_COLOR: &str = "#1f2937";
    pub const LIGHT_SECONDARY_TEXT_COLOR: &str = "#4b5563";
}

/// Error raised when options fall outside the ranges the settings panel allows
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Which palette card text is drawn from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardTextColorMode {
    /// Each theme variant uses its own text colors
    #[default]
    Auto,
    /// Both variants use the light-mode text colors
    Light,
    /// Both variants use the dark-mode text colors
    Dark,
}

impl CardTextColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardTextColorMode::Auto => "auto",
            CardTextColorMode::Light => "light",
            CardTextColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for CardTextColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The flat option bag that drives theme generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeOptions {
    #[serde(deserialize_with = "null_as_empty")]
    pub accent_color: String,
    /// Entity colors; `None` follows the accent color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door_color: Option<String>,

    /// Card corner radius in px
    #[serde(deserialize_with = "blank_border_radius")]
    pub border_radius: f64,
    /// Card border width in px
    #[serde(deserialize_with = "blank_border_width")]
    pub border_width: f64,
    /// Separator line width in px
    #[serde(deserialize_with = "blank_separator_width")]
    pub separator_width: f64,

    #[serde(deserialize_with = "blank_card_text_color_mode")]
    pub card_text_color_mode: CardTextColorMode,

    /// Backdrop blur in px
    #[serde(deserialize_with = "blank_glass_blur")]
    pub glass_blur: f64,
    /// Glass transparency slider, 0-100
    #[serde(deserialize_with = "blank_glass_transparency")]
    pub glass_transparency: f64,

    #[serde(deserialize_with = "null_as_empty")]
    pub solid_bg_color_dark: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub solid_bg_color_light: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub paper_bg_color_dark: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub paper_bg_color_light: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub floating_bg_color_dark: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub floating_bg_color_light: String,
    /// Floating panel opacity, 0-100
    #[serde(deserialize_with = "blank_floating_opacity")]
    pub floating_opacity: f64,

    #[serde(deserialize_with = "null_as_empty")]
    pub bg_color_dark: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub bg_color_light: String,

    #[serde(deserialize_with = "null_as_empty")]
    pub dark_primary_text_color: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub dark_secondary_text_color: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub light_primary_text_color: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub light_secondary_text_color: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A typed value or a cleared form field
#[derive(Deserialize)]
#[serde(untagged)]
enum Blankable<T> {
    Value(T),
    Text(String),
}

/// Deserialize `T`, resolving `null` and blank strings to `default`.
fn blank_or<'de, D, T>(deserializer: D, default: T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<Blankable<T>>::deserialize(deserializer)? {
        None => Ok(default),
        Some(Blankable::Value(value)) => Ok(value),
        Some(Blankable::Text(text)) if text.trim().is_empty() => Ok(default),
        Some(Blankable::Text(text)) => Err(de::Error::invalid_value(
            Unexpected::Str(&text),
            &"a value, null or an empty string",
        )),
    }
}

macro_rules! blank_defaults {
    ($($name:ident: $ty:ty = $default:expr;)*) => {
        $(
            fn $name<'de, D>(deserializer: D) -> Result<$ty, D::Error>
            where
                D: Deserializer<'de>,
            {
                blank_or(deserializer, $default)
            }
        )*
    };
}

blank_defaults! {
    blank_border_radius: f64 = defaults::BORDER_RADIUS;
    blank_border_width: f64 = defaults::BORDER_WIDTH;
    blank_separator_width: f64 = defaults::SEPARATOR_WIDTH;
    blank_glass_blur: f64 = defaults::GLASS_BLUR;
    blank_glass_transparency: f64 = defaults::GLASS_TRANSPARENCY;
    blank_floating_opacity: f64 = defaults::FLOATING_OPACITY;
    blank_card_text_color_mode: CardTextColorMode = CardTextColorMode::Auto;
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            accent_color: defaults::ACCENT_COLOR.to_string(),
            temperature_color: None,
            weather_color: None,
            humidity_color: None,
            door_color: None,
            border_radius: defaults::BORDER_RADIUS,
            border_width: defaults::BORDER_WIDTH,
            separator_width: defaults::SEPARATOR_WIDTH,
            card_text_color_mode: CardTextColorMode::Auto,
            glass_blur: defaults::GLASS_BLUR,
            glass_transparency: defaults::GLASS_TRANSPARENCY,
            solid_bg_color_dark: defaults::SOLID_BG_COLOR_DARK.to_string(),
            solid_bg_color_light: defaults::SOLID_BG_COLOR_LIGHT.to_string(),
            paper_bg_color_dark: defaults::PAPER_BG_COLOR_DARK.to_string(),
            paper_bg_color_light: defaults::PAPER_BG_COLOR_LIGHT.to_string(),
            floating_bg_color_dark: defaults::FLOATING_BG_COLOR_DARK.to_string(),
            floating_bg_color_light: defaults::FLOATING_BG_COLOR_LIGHT.to_string(),
            floating_opacity: defaults::FLOATING_OPACITY,
            bg_color_dark: defaults::BG_COLOR_DARK.to_string(),
            bg_color_light: defaults::BG_COLOR_LIGHT.to_string(),
            dark_primary_text_color: defaults::DARK_PRIMARY_TEXT_COLOR.to_string(),
            dark_secondary_text_color: defaults::DARK_SECONDARY_TEXT_COLOR.to_string(),
            light_primary_text_color: defaults::LIGHT_PRIMARY_TEXT_COLOR.to_string(),
            light_secondary_text_color: defaults::LIGHT_SECONDARY_TEXT_COLOR.to_string(),
        }
    }
}

/// Pick `value` unless it is blank.
pub(crate) fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}

impl ThemeOptions {
    /// Replace blank values with their defaults and blank entity colors with `None`.
    pub fn normalize(&mut self) {
        let fill = |value: &mut String, default: &str| {
            *value = or_default(value, default).to_string();
        };
        fill(&mut self.accent_color, defaults::ACCENT_COLOR);
        fill(&mut self.solid_bg_color_dark, defaults::SOLID_BG_COLOR_DARK);
        fill(&mut self.solid_bg_color_light, defaults::SOLID_BG_COLOR_LIGHT);
        fill(&mut self.paper_bg_color_dark, defaults::PAPER_BG_COLOR_DARK);
        fill(&mut self.paper_bg_color_light, defaults::PAPER_BG_COLOR_LIGHT);
        fill(&mut self.floating_bg_color_dark, defaults::FLOATING_BG_COLOR_DARK);
        fill(&mut self.floating_bg_color_light, defaults::FLOATING_BG_COLOR_LIGHT);
        fill(&mut self.bg_color_dark, defaults::BG_COLOR_DARK);
        fill(&mut self.bg_color_light, defaults::BG_COLOR_LIGHT);
        fill(&mut self.dark_primary_text_color, defaults::DARK_PRIMARY_TEXT_COLOR);
        fill(&mut self.dark_secondary_text_color, defaults::DARK_SECONDARY_TEXT_COLOR);
        fill(&mut self.light_primary_text_color, defaults::LIGHT_PRIMARY_TEXT_COLOR);
        fill(&mut self.light_secondary_text_color, defaults::LIGHT_SECONDARY_TEXT_COLOR);

        self.temperature_color.clear_if_empty();
        self.weather_color.clear_if_empty();
        self.humidity_color.clear_if_empty();
        self.door_color.clear_if_empty();
    }

    /// Check numeric options against the ranges the settings panel allows.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let check = |field: &'static str, value: f64, min: f64, max: f64| {
            if value.is_finite() && (min..=max).contains(&value) {
                Ok(())
            } else {
                Err(OptionsError::OutOfRange {
                    field,
                    min,
                    max,
                    value,
                })
            }
        };
        check("border_radius", self.border_radius, 0.0, 32.0)?;
        check("border_width", self.border_width, 0.0, 5.0)?;
        check("separator_width", self.separator_width, 0.0, 5.0)?;
        check("glass_blur", self.glass_blur, 0.0, 40.0)?;
        check("glass_transparency", self.glass_transparency, 0.0, 100.0)?;
        check("floating_opacity", self.floating_opacity, 0.0, 100.0)?;
        Ok(())
    }

    /// Apply a partial set of options on top of these.
    pub fn apply_patch(&mut self, patch: &OptionsPatch) {
        patch.apply_to(self);
    }
}

/// A partial set of options, as stored in presets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    /// An empty string resets the entity color to follow the accent color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_text_color_mode: Option<CardTextColorMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glass_blur: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glass_transparency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solid_bg_color_dark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solid_bg_color_light: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bg_color_dark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bg_color_light: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_bg_color_dark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_bg_color_light: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color_dark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color_light: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_primary_text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_secondary_text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_primary_text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_secondary_text_color: Option<String>,
}

impl OptionsPatch {
    /// Capture every field of a full option set.
    pub fn from_options(options: &ThemeOptions) -> Self {
        Self {
            accent_color: Some(options.accent_color.clone()),
            temperature_color: options.temperature_color.clone(),
            weather_color: options.weather_color.clone(),
            humidity_color: options.humidity_color.clone(),
            door_color: options.door_color.clone(),
            border_radius: Some(options.border_radius),
            border_width: Some(options.border_width),
            separator_width: Some(options.separator_width),
            card_text_color_mode: Some(options.card_text_color_mode),
            glass_blur: Some(options.glass_blur),
            glass_transparency: Some(options.glass_transparency),
            solid_bg_color_dark: Some(options.solid_bg_color_dark.clone()),
            solid_bg_color_light: Some(options.solid_bg_color_light.clone()),
            paper_bg_color_dark: Some(options.paper_bg_color_dark.clone()),
            paper_bg_color_light: Some(options.paper_bg_color_light.clone()),
            floating_bg_color_dark: Some(options.floating_bg_color_dark.clone()),
            floating_bg_color_light: Some(options.floating_bg_color_light.clone()),
            floating_opacity: Some(options.floating_opacity),
            bg_color_dark: Some(options.bg_color_dark.clone()),
            bg_color_light: Some(options.bg_color_light.clone()),
            dark_primary_text_color: Some(options.dark_primary_text_color.clone()),
            dark_secondary_text_color: Some(options.dark_secondary_text_color.clone()),
            light_primary_text_color: Some(options.light_primary_text_color.clone()),
            light_secondary_text_color: Some(options.light_secondary_text_color.clone()),
        }
    }

    /// Overwrite every field of `options` that this patch sets.
    pub fn apply_to(&self, options: &mut ThemeOptions) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn set_entity(target: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value {
                *target = Some(v.clone());
                target.clear_if_empty();
            }
        }

        set(&mut options.accent_color, &self.accent_color);
        set_entity(&mut options.temperature_color, &self.temperature_color);
        set_entity(&mut options.weather_color, &self.weather_color);
        set_entity(&mut options.humidity_color, &self.humidity_color);
        set_entity(&mut options.door_color, &self.door_color);
        set(&mut options.border_radius, &self.border_radius);
        set(&mut options.border_width, &self.border_width);
        set(&mut options.separator_width, &self.separator_width);
        set(&mut options.card_text_color_mode, &self.card_text_color_mode);
        set(&mut options.glass_blur, &self.glass_blur);
        set(&mut options.glass_transparency, &self.glass_transparency);
        set(&mut options.solid_bg_color_dark, &self.solid_bg_color_dark);
        set(&mut options.solid_bg_color_light, &self.solid_bg_color_light);
        set(&mut options.paper_bg_color_dark, &self.paper_bg_color_dark);
        set(&mut options.paper_bg_color_light, &self.paper_bg_color_light);
        set(&mut options.floating_bg_color_dark, &self.floating_bg_color_dark);
        set(&mut options.floating_bg_color_light, &self.floating_bg_color_light);
        set(&mut options.floating_opacity, &self.floating_opacity);
        set(&mut options.bg_color_dark, &self.bg_color_dark);
        set(&mut options.bg_color_light, &self.bg_color_light);
        set(&mut options.dark_primary_text_color, &self.dark_primary_text_color);
        set(&mut options.dark_secondary_text_color, &self.dark_secondary_text_color);
        set(&mut options.light_primary_text_color, &self.light_primary_text_color);
        set(&mut options.light_secondary_text_color, &self.light_secondary_text_color);
        options.normalize();
    }
}
