//! Common utilities for the shortmoji crates.
//!
//! This crate provides shared infrastructure used by every other crate:
//! - **Warning System** - deduplicated, colored diagnostics on stderr

pub mod warning;

pub use warning::{Component, clear_warnings, has_warned, warn_once};
