//! CSS selectors for shortmoji.
//!
//! # Scope
//!
//! This crate implements the subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) that
//! `Element.matches()` callers typically hand to a text post-processor:
//! - Type, universal, class, ID and attribute selectors
//! - `:not()` and the structural pseudo-classes
//! - All four combinators
//! - Comma-separated selector lists
//!
//! # Not Yet Implemented
//!
//! - Namespaces
//! - `:is()`, `:where()`, `:has()` and `:nth-*()`
//! - Case-insensitive attribute matching (`[attr=value i]`)

/// Selector parsing and matching.
pub mod selector;

pub use selector::{SelectorError, SelectorList, parse_selector_list};
