//! Shortcode syntax: the `:name:` shape and colon normalization.

use std::sync::OnceLock;

use regex::Regex;

/// Pattern for a shortcode occurrence in text
static SHORTCODE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get the compiled shortcode regex.
///
/// A shortcode is a colon, one or more ASCII word characters, `+` or `-`,
/// and a closing colon. Matches never overlap: in `:a:b:` only `:a:` is found.
pub(crate) fn shortcode_regex() -> &'static Regex {
    SHORTCODE_REGEX.get_or_init(|| {
        Regex::new(r":[+\-A-Za-z0-9_]+:").expect("Failed to compile shortcode regex")
    })
}

/// Whether `text` contains at least one shortcode-shaped substring.
#[must_use]
pub fn contains_shortcode(text: &str) -> bool {
    shortcode_regex().is_match(text)
}

/// Normalize a shortcode to its colon-wrapped form.
///
/// An empty string stays empty and a string that already starts and ends
/// with `:` is returned unchanged. Anything else has its leading and
/// trailing colons trimmed and is wrapped in exactly one pair.
///
/// # Example
/// ```
/// use shortmoji_core::ensure_colon;
///
/// assert_eq!(ensure_colon("smile"), ":smile:");
/// assert_eq!(ensure_colon("::smile"), ":smile:");
/// assert_eq!(ensure_colon(":smile:"), ":smile:");
/// assert_eq!(ensure_colon(""), "");
/// ```
#[must_use]
pub fn ensure_colon(shortcode: &str) -> String {
    if shortcode.is_empty() || (shortcode.starts_with(':') && shortcode.ends_with(':')) {
        return shortcode.to_string();
    }
    format!(":{}:", shortcode.trim_matches(':'))
}

/// Drop the first and last character, turning `:name:` into `name`.
///
/// Strings shorter than two characters become empty.
#[must_use]
pub fn bare(shortcode: &str) -> &str {
    let mut chars = shortcode.chars();
    let _ = chars.next();
    let _ = chars.next_back();
    chars.as_str()
}
