//! Theme generation
//!
//! [`generate`] maps a [`ThemeOptions`] bag onto the two theme variants the
//! frontend consumes. It is a pure function: every input, including
//! malformed colors, produces output, and the same input always produces
//! byte-identical output.
//!
//! ## Example
//!
//! ```
//! use mirage_theme::generator::{generate, Mode};
//! use mirage_theme::options::ThemeOptions;
//!
//! let theme = generate(&ThemeOptions::default());
//! assert_eq!(
//!     theme.variant(Mode::Dark).get("mirage-glass-bg-color-dark"),
//!     Some("rgba(86, 94, 88, 0.54)")
//! );
//! assert_eq!(
//!     theme.variant(Mode::Light).get("mirage-temperature-color"),
//!     Some("var(--mirage-accent-color)")
//! );
//! ```

use crate::color::{hex_to_rgba, rgba};
use crate::options::{defaults, or_default, CardTextColorMode, ThemeOptions};
use crate::utils::{format_px, NonEmptyExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the dark theme variant
pub const THEME_NAME_DARK: &str = "Mirage Dark";
/// Name of the light theme variant
pub const THEME_NAME_LIGHT: &str = "Mirage Light";

/// Entity colors that are unset resolve to this reference rather than a
/// copied literal, so a live accent change reaches them too.
pub const ACCENT_REFERENCE: &str = "var(--mirage-accent-color)";

/// Theme mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Dark,
    Light,
}

impl Mode {
    pub fn all() -> [Mode; 2] {
        [Mode::Dark, Mode::Light]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Dark => "dark",
            Mode::Light => "light",
        }
    }

    /// Name of the theme variant for this mode
    pub fn theme_name(&self) -> &'static str {
        match self {
            Mode::Dark => THEME_NAME_DARK,
            Mode::Light => THEME_NAME_LIGHT,
        }
    }

    /// Base RGB of the glass surface
    fn glass_rgb(&self) -> (u8, u8, u8) {
        match self {
            Mode::Dark => (86, 94, 88),
            Mode::Light => (240, 242, 240),
        }
    }

    /// Glass reads more opaque on dark backgrounds at the same slider value,
    /// so the dark alpha is scaled less.
    fn glass_alpha_scale(&self) -> f64 {
        match self {
            Mode::Dark => 1.8,
            Mode::Light => 2.0,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed surface decorations per mode
struct SurfaceStyle {
    glass_border: &'static str,
    glass_shadow: &'static str,
    solid_border: &'static str,
    solid_shadow: &'static str,
    paper_border: &'static str,
    paper_shadow: &'static str,
    floating_shadow: &'static str,
}

const DARK_SURFACES: SurfaceStyle = SurfaceStyle {
    glass_border: "rgba(255, 255, 255, 0.15)",
    glass_shadow: "0 8px 24px rgba(0,0,0,0.3)",
    solid_border: "rgba(255, 255, 255, 0.1)",
    solid_shadow: "0 2px 8px rgba(0,0,0,0.3)",
    paper_border: "rgba(255, 255, 255, 0.1)",
    paper_shadow: "0 6px 16px rgba(0,0,0,0.5)",
    floating_shadow: "0 6px 20px rgba(0,0,0,0.3)",
};

const LIGHT_SURFACES: SurfaceStyle = SurfaceStyle {
    glass_border: "rgba(0, 0, 0, 0.1)",
    glass_shadow: "0 8px 24px rgba(0,0,0,0.1)",
    solid_border: "rgba(0, 0, 0, 0.08)",
    solid_shadow: "0 2px 8px rgba(0,0,0,0.08)",
    paper_border: "rgba(0, 0, 0, 0.08)",
    paper_shadow: "0 4px 12px rgba(0,0,0,0.1)",
    floating_shadow: "0 6px 20px rgba(0,0,0,0.1)",
};

/// Option values resolved for one mode
struct Palette<'a> {
    solid_bg: &'a str,
    paper_bg: &'a str,
    floating_bg: &'a str,
    page_bg: &'a str,
    primary_text: &'a str,
    secondary_text: &'a str,
    surfaces: &'static SurfaceStyle,
}

impl<'a> Palette<'a> {
    fn resolve(options: &'a ThemeOptions, mode: Mode) -> Self {
        let (primary_text, secondary_text) = text_colors(options, mode);
        match mode {
            Mode::Dark => Self {
                solid_bg: or_default(&options.solid_bg_color_dark, defaults::SOLID_BG_COLOR_DARK),
                paper_bg: or_default(&options.paper_bg_color_dark, defaults::PAPER_BG_COLOR_DARK),
                floating_bg: or_default(
                    &options.floating_bg_color_dark,
                    defaults::FLOATING_BG_COLOR_DARK,
                ),
                page_bg: or_default(&options.bg_color_dark, defaults::BG_COLOR_DARK),
                primary_text,
                secondary_text,
                surfaces: &DARK_SURFACES,
            },
            Mode::Light => Self {
                solid_bg: or_default(&options.solid_bg_color_light, defaults::SOLID_BG_COLOR_LIGHT),
                paper_bg: or_default(&options.paper_bg_color_light, defaults::PAPER_BG_COLOR_LIGHT),
                floating_bg: or_default(
                    &options.floating_bg_color_light,
                    defaults::FLOATING_BG_COLOR_LIGHT,
                ),
                page_bg: or_default(&options.bg_color_light, defaults::BG_COLOR_LIGHT),
                primary_text,
                secondary_text,
                surfaces: &LIGHT_SURFACES,
            },
        }
    }
}

/// Primary and secondary text colors configured for a mode.
fn text_colors(options: &ThemeOptions, mode: Mode) -> (&str, &str) {
    match mode {
        Mode::Dark => (
            or_default(&options.dark_primary_text_color, defaults::DARK_PRIMARY_TEXT_COLOR),
            or_default(&options.dark_secondary_text_color, defaults::DARK_SECONDARY_TEXT_COLOR),
        ),
        Mode::Light => (
            or_default(&options.light_primary_text_color, defaults::LIGHT_PRIMARY_TEXT_COLOR),
            or_default(&options.light_secondary_text_color, defaults::LIGHT_SECONDARY_TEXT_COLOR),
        ),
    }
}

/// Mode whose text colors card text uses inside a `variant` theme.
pub fn card_text_mode(setting: CardTextColorMode, variant: Mode) -> Mode {
    match setting {
        CardTextColorMode::Auto => variant,
        CardTextColorMode::Light => Mode::Light,
        CardTextColorMode::Dark => Mode::Dark,
    }
}

/// One generated theme variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeVariant {
    pub name: String,
    pub mode: Mode,
    pub variables: BTreeMap<String, String>,
}

impl ThemeVariant {
    fn new(mode: Mode) -> Self {
        Self {
            name: mode.theme_name().to_string(),
            mode,
            variables: BTreeMap::new(),
        }
    }

    fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Look up a variable value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Both generated theme variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTheme {
    pub dark: ThemeVariant,
    pub light: ThemeVariant,
}

impl DerivedTheme {
    pub fn variant(&self, mode: Mode) -> &ThemeVariant {
        match mode {
            Mode::Dark => &self.dark,
            Mode::Light => &self.light,
        }
    }

    /// Variants in publishing order (dark first)
    pub fn variants(&self) -> [&ThemeVariant; 2] {
        [&self.dark, &self.light]
    }
}

/// Generate both theme variants from options.
pub fn generate(options: &ThemeOptions) -> DerivedTheme {
    DerivedTheme {
        dark: generate_variant(options, Mode::Dark),
        light: generate_variant(options, Mode::Light),
    }
}

fn generate_variant(options: &ThemeOptions, mode: Mode) -> ThemeVariant {
    let palette = Palette::resolve(options, mode);
    let accent = or_default(&options.accent_color, defaults::ACCENT_COLOR);
    let entity = |value: &Option<String>| value.non_empty().unwrap_or(ACCENT_REFERENCE).to_string();
    let (card_primary, card_secondary) =
        text_colors(options, card_text_mode(options.card_text_color_mode, mode));

    let (r, g, b) = mode.glass_rgb();
    let glass_alpha = (options.glass_transparency / 100.0) * mode.glass_alpha_scale();
    let floating_alpha = options.floating_opacity / 100.0;
    let m = mode.as_str();

    let mut variant = ThemeVariant::new(mode);

    // Accent and entity colors
    variant.set("mirage-accent-color", accent);
    variant.set("mirage-temperature-color", entity(&options.temperature_color));
    variant.set("mirage-weather-color", entity(&options.weather_color));
    variant.set("mirage-humidity-color", entity(&options.humidity_color));
    variant.set("mirage-door-color", entity(&options.door_color));
    variant.set("mirage-slider-thumb-bg-color", hex_to_rgba(accent, 0.7));

    // Text
    variant.set("mirage-primary-text-color", palette.primary_text);
    variant.set("mirage-secondary-text-color", palette.secondary_text);
    variant.set("mirage-card-primary-text-color", card_primary);
    variant.set("mirage-card-secondary-text-color", card_secondary);

    // Geometry
    variant.set("mirage-border-radius", format_px(options.border_radius));
    variant.set("mirage-border-width", format_px(options.border_width));
    variant.set("mirage-separator-width", format_px(options.separator_width));
    variant.set("mirage-glass-blur", format_px(options.glass_blur));

    // Surfaces
    let surfaces = palette.surfaces;
    variant.set(format!("mirage-glass-bg-color-{m}"), rgba(r, g, b, glass_alpha));
    variant.set(format!("mirage-glass-border-color-{m}"), surfaces.glass_border);
    variant.set(format!("mirage-glass-shadow-{m}"), surfaces.glass_shadow);
    variant.set(format!("mirage-solid-bg-color-{m}"), palette.solid_bg);
    variant.set(format!("mirage-solid-border-color-{m}"), surfaces.solid_border);
    variant.set(format!("mirage-solid-shadow-{m}"), surfaces.solid_shadow);
    variant.set(format!("mirage-paper-bg-color-{m}"), palette.paper_bg);
    variant.set(format!("mirage-paper-border-color-{m}"), surfaces.paper_border);
    variant.set(format!("mirage-paper-shadow-{m}"), surfaces.paper_shadow);
    variant.set(
        format!("mirage-floating-bg-color-{m}"),
        hex_to_rgba(palette.floating_bg, floating_alpha),
    );
    variant.set(format!("mirage-floating-shadow-{m}"), surfaces.floating_shadow);

    // Platform-standard names
    variant.set("primary-color", accent);
    variant.set("accent-color", accent);
    variant.set("primary-text-color", palette.primary_text);
    variant.set("secondary-text-color", palette.secondary_text);
    variant.set("primary-background-color", palette.page_bg);
    variant.set("card-background-color", format!("var(--mirage-glass-bg-color-{m})"));
    variant.set("ha-card-border-radius", format_px(options.border_radius));
    variant.set("ha-card-border-width", format_px(options.border_width));

    variant
}
