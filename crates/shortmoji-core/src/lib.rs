//! Emoji shortcode normalization and substitution for shortmoji.
//!
//! # Scope
//!
//! - **Data Normalizer** ([`normalize`]) - flattens the emoji and alias
//!   document formats into [`EmojiMap`] and [`AliasMap`]
//! - **Default Data Loader** ([`loader`]) - the packaged documents, or a data
//!   directory, with "missing means empty" semantics
//! - **Shortcode Applier** ([`apply`]) - rewrites `:shortcode:` text in a
//!   [`shortmoji_dom::DomTree`] subtree, skipping code and math regions
//! - **Provisioning** ([`sync`]) - copies workspace assets into the data
//!   directory
//!
//! # Example
//!
//! ```
//! use shortmoji_core::{ApplyOptions, apply_emoji_shortcodes, load_default_emoji_map};
//! use shortmoji_dom::NodeId;
//! use shortmoji_html::{parse_fragment, serialize_children};
//!
//! let emoji = load_default_emoji_map();
//! let mut tree = parse_fragment("<p>Hello :smile: world</p>");
//! apply_emoji_shortcodes(&mut tree, NodeId::ROOT, &ApplyOptions::new(&emoji));
//! assert_eq!(serialize_children(&tree, NodeId::ROOT), "<p>Hello 😄 world</p>");
//! ```

/// Shortcode substitution over DOM text.
pub mod apply;
/// Packaged and directory-backed data documents.
pub mod loader;
/// Normalized lookup tables.
pub mod maps;
/// Source document flattening.
pub mod normalize;
/// Shortcode syntax helpers.
pub mod shortcode;
/// Data file provisioning.
pub mod sync;

pub use apply::{ApplyOptions, SkipTag, apply_emoji_shortcodes, replace_shortcodes, resolve_shortcode};
pub use loader::{
    ALIASES_DATA_FILE, DATA_DIR_ENV, DataSource, EMOJI_DATA_FILE, LoadError, load_alias_map,
    load_aliases_data, load_default_alias_map, load_default_aliases_data, load_default_emoji_data,
    load_default_emoji_map, load_emoji_data, load_emoji_map, read_data_file,
};
pub use maps::{AliasMap, EmojiMap};
pub use normalize::{normalize_aliases, normalize_emoji_data};
pub use shortcode::{bare, contains_shortcode, ensure_colon};
pub use sync::{SyncError, SyncOutcome, sync_data};
