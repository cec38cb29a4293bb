//! Hex to RGBA conversion
//!
//! Colors coming from the settings panel are user-typed strings, so the
//! conversion never fails: anything that is not a `#RGB` or `#RRGGBB` hex
//! code renders as the fallback blue at the requested alpha.

/// Channels used when a color string cannot be parsed
pub const FALLBACK_RGB: (u8, u8, u8) = (59, 130, 246);

/// Render an alpha fraction with two decimal places.
pub fn format_alpha(alpha: f64) -> String {
    format!("{:.2}", alpha)
}

/// Format channels and alpha as a CSS `rgba(...)` string.
pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> String {
    format!("rgba({}, {}, {}, {})", r, g, b, format_alpha(alpha))
}

/// Parse a `#RGB` or `#RRGGBB` string into channels.
///
/// Returns `None` for anything else, including a missing `#`.
///
/// # Example
///
/// ```
/// use mirage_theme::color::parse_hex;
///
/// assert_eq!(parse_hex("#3b82f6"), Some((59, 130, 246)));
/// assert_eq!(parse_hex("#fff"), Some((255, 255, 255)));
/// assert_eq!(parse_hex("3b82f6"), None);
/// ```
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let body = hex.strip_prefix('#')?;
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match body.len() {
        3 => body.chars().flat_map(|c| [c, c]).collect(),
        6 => body.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Convert a hex color to an `rgba(r, g, b, a)` string.
///
/// # Example
///
/// ```
/// use mirage_theme::color::hex_to_rgba;
///
/// assert_eq!(hex_to_rgba("#2a323d", 1.0), "rgba(42, 50, 61, 1.00)");
/// assert_eq!(hex_to_rgba("not-a-color", 0.5), "rgba(59, 130, 246, 0.50)");
/// ```
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    let (r, g, b) = parse_hex(hex).unwrap_or(FALLBACK_RGB);
    rgba(r, g, b, alpha)
}
