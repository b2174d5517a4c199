//! Flattening of emoji and alias source documents.
//!
//! Emoji data arrives in one of three shapes:
//!
//! ```text
//! {":smile:": {"unicode": "1f604", "unicode_alt": "1f604"}, ...}   code point table
//! {"smile": "😄", ...}                                              flat map
//! [{"shortcode": "smile", "emoji": "😄"}, ...]                      record list
//! ```
//!
//! Aliases arrive as `{":a:": ":b:"}` or `[{"alias": ":a:", "to": ":b:"}]`.
//! Malformed entries are dropped; normalization itself never fails. Record
//! list elements must be objects with the named string fields, so a
//! positional `["smile", "😄"]` element is ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::maps::{AliasMap, EmojiMap};

#[derive(Deserialize)]
struct EmojiRecord {
    shortcode: String,
    emoji: String,
}

#[derive(Deserialize)]
struct AliasRecord {
    alias: String,
    to: String,
}

/// Flatten an emoji source document into an [`EmojiMap`].
///
/// Every registered shortcode is reachable both as `:name:` and `name`.
///
/// # Example
/// ```
/// use serde_json::json;
/// use shortmoji_core::normalize_emoji_data;
///
/// let map = normalize_emoji_data(&json!({":flag_us:": {"unicode": "1f1fa-1f1f8"}}));
/// assert_eq!(map.get("flag_us"), Some("\u{1F1FA}\u{1F1F8}"));
/// ```
#[must_use]
pub fn normalize_emoji_data(data: &Value) -> EmojiMap {
    let mut out = EmojiMap::new();
    match data {
        Value::Array(items) => {
            for item in items.iter().filter(|item| item.is_object()) {
                if let Ok(record) = EmojiRecord::deserialize(item) {
                    out.register(&record.shortcode, record.emoji);
                }
            }
        }
        Value::Object(entries) if looks_like_code_point_table(entries) => {
            for (key, entry) in entries {
                if let Some(emoji) = code_point_field(entry).and_then(decode_code_points) {
                    out.register(key, emoji);
                }
            }
        }
        Value::Object(entries) => {
            for (key, value) in entries {
                if let Value::String(emoji) = value {
                    out.register(key, emoji.as_str());
                }
            }
        }
        _ => {}
    }
    out
}

/// Flatten an alias source document into an [`AliasMap`].
///
/// Both sides are colon-normalized, so `{"thumbsup": "+1"}` maps
/// `:thumbsup:` and `thumbsup` to `:+1:`.
#[must_use]
pub fn normalize_aliases(data: &Value) -> AliasMap {
    let mut out = AliasMap::new();
    match data {
        Value::Array(items) => {
            for item in items.iter().filter(|item| item.is_object()) {
                if let Ok(record) = AliasRecord::deserialize(item) {
                    out.register(&record.alias, &record.to);
                }
            }
        }
        Value::Object(entries) => {
            for (alias, target) in entries {
                if let Value::String(target) = target {
                    out.register(alias, target);
                }
            }
        }
        _ => {}
    }
    out
}

/// The shape is decided by the first value alone: an object with a
/// `unicode` or `unicode_alt` key.
///
/// "First" is document order; integer-like keys get no precedence.
fn looks_like_code_point_table(entries: &Map<String, Value>) -> bool {
    entries.values().next().is_some_and(|first| {
        first
            .as_object()
            .is_some_and(|fields| fields.contains_key("unicode") || fields.contains_key("unicode_alt"))
    })
}

/// `unicode_alt` when truthy, otherwise `unicode`; only a string is usable.
fn code_point_field(entry: &Value) -> Option<&str> {
    entry
        .get("unicode_alt")
        .filter(|alt| is_truthy(alt))
        .or_else(|| entry.get("unicode"))?
        .as_str()
}

/// Decode `"1f1fa-1f1f8"` into the characters it names.
///
/// Returns `None` if any group is not hexadecimal or not a Unicode scalar
/// value, so a malformed sequence never yields a partial string.
fn decode_code_points(sequence: &str) -> Option<String> {
    sequence
        .split('-')
        .map(|group| {
            u32::from_str_radix(group.trim(), 16)
                .ok()
                .and_then(char::from_u32)
        })
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_code_points() {
        assert_eq!(decode_code_points("1f604").as_deref(), Some("\u{1F604}"));
        assert_eq!(decode_code_points("2764-FE0F").as_deref(), Some("\u{2764}\u{FE0F}"));
        assert_eq!(decode_code_points("zz"), None);
        assert_eq!(decode_code_points(""), None);
        assert_eq!(decode_code_points("d83d"), None);
        assert_eq!(decode_code_points("1f604-"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::from(0)));
        assert!(!is_truthy(&Value::from("")));
        assert!(is_truthy(&Value::from("0")));
        assert!(is_truthy(&Value::Array(Vec::new())));
    }
}
