//! Shared utility functions and traits

/// Extension trait for treating blank optional strings as unset.
///
/// Settings arrive from a form where a cleared text field is an empty
/// string rather than a missing key, so both cases collapse to `None`.
///
/// # Example
///
/// ```
/// use mirage_theme::utils::NonEmptyExt;
///
/// let unset: Option<String> = Some(String::new());
/// let blank: Option<String> = Some("   ".to_string());
/// let set: Option<String> = Some("#ff0000".to_string());
///
/// assert_eq!(unset.non_empty(), None);
/// assert_eq!(blank.non_empty(), None);
/// assert_eq!(set.non_empty(), Some("#ff0000"));
/// ```
pub trait NonEmptyExt {
    /// Borrow the trimmed value if it is present and not blank.
    fn non_empty(&self) -> Option<&str>;

    /// Replace a blank value with `None` in place.
    fn clear_if_empty(&mut self);
}

impl NonEmptyExt for Option<String> {
    fn non_empty(&self) -> Option<&str> {
        self.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn clear_if_empty(&mut self) {
        if self.non_empty().is_none() {
            *self = None;
        }
    }
}

/// Render a dimension in pixel units.
///
/// Whole numbers drop the fractional part so `16.0` renders as `16px`.
pub fn format_px(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.0}px", value)
    } else {
        format!("{}px", value)
    }
}
