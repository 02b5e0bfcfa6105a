//! Normalization of raw catalog values into display/storage form.

use crate::types::{IMAGE_SUFFIX, NOT_AVAILABLE, PLACEHOLDER_IMAGE};

/// Rewrite every apostrophe in a card name to a caret.
///
/// Both the ASCII apostrophe and the typographic right single quote are
/// rewritten, so "Professor's Research" and "Professor’s Research" end up
/// stored identically.
pub fn normalize_name(name: &str) -> String {
    name.replace(['\'', '\u{2019}'], "^")
}

/// Build the full image URL from the catalog's base image path.
///
/// An absent or blank base path yields the placeholder image.
pub fn image_url_from_base(base: Option<&str>) -> String {
    match base.map(str::trim) {
        Some(b) if !b.is_empty() => format!("{b}{IMAGE_SUFFIX}"),
        _ => PLACEHOLDER_IMAGE.to_string(),
    }
}

/// True for an empty (or whitespace-only) value or the `N/A` sentinel.
pub fn is_missing(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == NOT_AVAILABLE
}
