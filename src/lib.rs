//! Mirage Theme - glass-style theme generator for the Mirage dashboard UI
//!
//! Turns a flat set of user options into two named themes, "Mirage Dark"
//! and "Mirage Light", and delivers them to the host either as live
//! `set_theme` payloads or as a YAML theme file.
//!
//! ```
//! use mirage_theme::{generate, ThemeOptions};
//!
//! let theme = generate(&ThemeOptions::default());
//! assert_eq!(
//!     theme.dark.get("mirage-glass-bg-color-dark"),
//!     Some("rgba(86, 94, 88, 0.54)")
//! );
//! ```

pub mod backgrounds;
pub mod color;
pub mod commands;
pub mod config;
pub mod generator;
pub mod host;
pub mod integration;
pub mod options;
pub mod output;
pub mod presets;
pub mod utils;

pub use config::Config;
pub use generator::{generate, DerivedTheme, Mode, ThemeVariant};
pub use integration::Integration;
pub use options::{CardTextColorMode, ThemeOptions};
