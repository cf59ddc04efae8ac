//! Slug and display-name normalization for recipe names.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Used when a name contains no ASCII letters or digits at all.
pub const FALLBACK_SLUG: &str = "recipe";

/// Generate a URL-safe slug from a recipe name.
///
/// Folds accents to ASCII (NFKD, combining marks dropped), lowercases, turns every
/// run of non-alphanumeric characters into a single hyphen, and trims
/// leading/trailing hyphens.
pub fn slugify(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_hyphen = true;
    for c in name.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }
    let trimmed = result.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Title-case a name: the first letter of every alphabetic run is uppercased
/// and the rest lowercased ("o'neil's PIE" -> "O'Neil'S Pie").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
