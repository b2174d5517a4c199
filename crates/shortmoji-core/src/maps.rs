//! The two normalized lookup tables.
//!
//! Both maps store every entry twice, under the colon-wrapped shortcode and
//! under its bare form, so a lookup never has to normalize its key first.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::shortcode::{bare, ensure_colon};

/// Shortcode to unicode string, e.g. `":smile:"` and `"smile"` to `"😄"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmojiMap(BTreeMap<String, String>);

impl EmojiMap {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Register `key -> value` under both the wrapped and bare key.
    ///
    /// A key that already starts and ends with `:` is used as-is; any other
    /// key is wrapped verbatim, without trimming stray colons.
    pub(crate) fn register(&mut self, key: &str, value: impl Into<String>) {
        let with_colon = if key.starts_with(':') && key.ends_with(':') {
            key.to_string()
        } else {
            format!(":{key}:")
        };
        let value = value.into();
        let _ = self.0.insert(bare(&with_colon).to_string(), value.clone());
        let _ = self.0.insert(with_colon, value);
    }

    /// Raw lookup, returning the stored value even when it is empty.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Lookup that treats an empty value as a miss.
    pub(crate) fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Whether `key` is present in either form it was stored under.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys, counting wrapped and bare forms separately.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All `(key, value)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for EmojiMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.register(key.as_ref(), value);
        }
        map
    }
}

/// Alias shortcode to canonical shortcode, e.g. `":thumbsup:"` and
/// `"thumbsup"` to `":+1:"`.
///
/// Values are always colon-wrapped. Resolution through this map is a single
/// hop: a target is never looked up again as an alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasMap(BTreeMap<String, String>);

impl AliasMap {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Register `alias -> target`, colon-normalizing both sides.
    pub(crate) fn register(&mut self, alias: &str, target: &str) {
        let alias = ensure_colon(alias);
        let target = ensure_colon(target);
        let _ = self.0.insert(bare(&alias).to_string(), target.clone());
        let _ = self.0.insert(alias, target);
    }

    /// Raw lookup, returning the stored value even when it is empty.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Lookup that treats an empty value as a miss.
    pub(crate) fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Whether `key` is present in either form it was stored under.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys, counting wrapped and bare forms separately.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All `(alias, target)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (alias, target) in iter {
            map.register(alias.as_ref(), target.as_ref());
        }
        map
    }
}
