//! Diagnostics with colored terminal output.
//!
//! Nothing in shortmoji is allowed to fail loudly: missing data files,
//! unparsable selectors and absent provisioning sources all degrade to
//! "do nothing". This module is where those degradations are reported, once
//! per unique message, so a document with a thousand text nodes does not
//! print the same bad selector a thousand times.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;
use strum_macros::{AsRefStr, Display};

/// The part of the pipeline a warning originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Component {
    /// Default data loading (`emoji-unicodes.json`, `emoji-aliases.json`).
    Loader,
    /// Skip-selector parsing in the shortcode applier.
    Selector,
    /// Data provisioning (`sync-data`).
    Sync,
    /// HTML tokenizing and tree building.
    Html,
}

/// Set of `[component] message` keys already printed.
static WARNED: Mutex<BTreeSet<String>> = Mutex::new(BTreeSet::new());

fn key(component: Component, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Report a degraded condition (prints once per unique component/message).
///
/// # Example
/// ```
/// use shortmoji_common::{Component, warn_once};
///
/// warn_once(Component::Loader, "emoji-unicodes.json not found, using empty map");
/// ```
pub fn warn_once(component: Component, message: &str) {
    let fresh = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key(component, message));

    if fresh {
        eprintln!("{}", format!("[shortmoji {component}] ⚠ {message}").yellow());
    }
}

/// Whether `warn_once` has already reported this exact message.
#[must_use]
pub fn has_warned(component: Component, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(&key(component, message))
}

/// Forget all recorded warnings, so they print again on next occurrence.
pub fn clear_warnings() {
    WARNED.lock().unwrap_or_else(PoisonError::into_inner).clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        warn_once(Component::Sync, "unit-test: recorded");
        assert!(has_warned(Component::Sync, "unit-test: recorded"));
        assert!(!has_warned(Component::Loader, "unit-test: recorded"));
    }

    #[test]
    fn test_component_display() {
        assert_eq!(Component::Selector.to_string(), "Selector");
        assert_eq!(Component::Html.as_ref(), "Html");
    }
}
