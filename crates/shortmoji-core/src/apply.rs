//! `:shortcode:` substitution over the text of a DOM subtree.
//!
//! The applier walks the text nodes under a root with a
//! [`TreeWalker`](shortmoji_dom::TreeWalker), rejects those sitting inside
//! code, math or caller-excluded elements, and rewrites the rest in place.
//! Each node's data is replaced wholesale; node boundaries never change.

use std::borrow::Cow;

use regex::Captures;
use shortmoji_common::{Component, warn_once};
use shortmoji_css::{SelectorList, parse_selector_list};
use shortmoji_dom::{DomTree, ElementData, NodeFilter, NodeId, TreeWalker, WhatToShow};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::maps::{AliasMap, EmojiMap};
use crate::shortcode::{bare, contains_shortcode, ensure_colon, shortcode_regex};

/// Elements whose text is never rewritten, by DOM `tagName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SkipTag {
    /// `<code>`
    Code,
    /// `<pre>`
    Pre,
    /// `<kbd>`
    Kbd,
    /// `<script>`
    Script,
    /// `<style>`
    Style,
}

impl SkipTag {
    /// Whether an uppercased tag name is one of the skipped tags.
    #[must_use]
    pub fn is_skipped(tag_name: &str) -> bool {
        Self::iter().any(|tag| tag.as_ref() == tag_name)
    }
}

/// Class marking a rendered display-math block.
pub const MATH_BLOCK_CLASS: &str = "math-block";

/// Tag name prefix of `MathJax` output elements (`MJX-CONTAINER`, ...).
pub const MATHJAX_TAG_PREFIX: &str = "MJX-";

/// What to substitute with and what to leave alone.
#[derive(Debug, Clone)]
pub struct ApplyOptions<'a> {
    /// Shortcode table. Without one, applying does nothing.
    pub emoji_map: Option<&'a EmojiMap>,
    /// Optional single-hop alias table.
    pub aliases: Option<&'a AliasMap>,
    /// Skip `.math-block` and `MJX-*` elements. Defaults to `true`.
    pub skip_math: bool,
    /// Extra CSS selectors; text under a matching element is skipped.
    pub skip_selectors: Vec<String>,
}

impl Default for ApplyOptions<'_> {
    fn default() -> Self {
        Self {
            emoji_map: None,
            aliases: None,
            skip_math: true,
            skip_selectors: Vec::new(),
        }
    }
}

impl<'a> ApplyOptions<'a> {
    /// Options with the given emoji table and every other field defaulted.
    #[must_use]
    pub fn new(emoji_map: &'a EmojiMap) -> Self {
        Self {
            emoji_map: Some(emoji_map),
            ..Self::default()
        }
    }

    /// Use `aliases` to resolve shortcodes before the emoji lookup.
    #[must_use]
    pub fn with_aliases(mut self, aliases: &'a AliasMap) -> Self {
        self.aliases = Some(aliases);
        self
    }

    /// Turn math-region skipping on or off.
    #[must_use]
    pub fn with_skip_math(mut self, skip_math: bool) -> Self {
        self.skip_math = skip_math;
        self
    }

    /// Add one skip selector.
    #[must_use]
    pub fn with_skip_selector(mut self, selector: impl Into<String>) -> Self {
        self.skip_selectors.push(selector.into());
        self
    }

    /// Add several skip selectors.
    #[must_use]
    pub fn with_skip_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_selectors
            .extend(selectors.into_iter().map(Into::into));
        self
    }
}

/// Replace every known shortcode in the text under `root`.
///
/// Nothing happens when `root` is not a node of `tree` or no emoji table is
/// set. Text is left alone when any element from its parent up to and
/// including `root` is a [`SkipTag`], a math region (with `skip_math`), or
/// matches the skip selectors. Unknown shortcodes stay as written, and a
/// second application changes nothing further.
///
/// # Example
/// ```
/// use shortmoji_core::{ApplyOptions, EmojiMap, apply_emoji_shortcodes};
/// use shortmoji_dom::NodeId;
/// use shortmoji_html::{parse_fragment, serialize_children};
///
/// let emoji: EmojiMap = [("smile", "😄")].into_iter().collect();
/// let mut tree = parse_fragment("<p>Hello :smile: <code>:smile:</code></p>");
/// apply_emoji_shortcodes(&mut tree, NodeId::ROOT, &ApplyOptions::new(&emoji));
/// assert_eq!(
///     serialize_children(&tree, NodeId::ROOT),
///     "<p>Hello 😄 <code>:smile:</code></p>"
/// );
/// ```
pub fn apply_emoji_shortcodes(tree: &mut DomTree, root: NodeId, options: &ApplyOptions<'_>) {
    if !tree.contains(root) {
        return;
    }
    let Some(emoji_map) = options.emoji_map else {
        return;
    };
    let skip_list = compile_skip_selectors(&options.skip_selectors);

    // Collect first: the walker borrows the tree that is mutated below.
    let eligible: Vec<NodeId> = TreeWalker::new(
        &*tree,
        root,
        WhatToShow::TEXT,
        |doc: &DomTree, node: NodeId| {
            if is_excluded(doc, node, root, options.skip_math, skip_list.as_ref()) {
                NodeFilter::Reject
            } else if doc.as_text(node).is_some_and(contains_shortcode) {
                NodeFilter::Accept
            } else {
                NodeFilter::Skip
            }
        },
    )
    .collect();

    for id in eligible {
        let Some(text) = tree.as_text(id) else {
            continue;
        };
        let replaced = match replace_shortcodes(text, emoji_map, options.aliases) {
            Cow::Owned(replaced) => replaced,
            Cow::Borrowed(_) => continue,
        };
        tree.set_text(id, replaced);
    }
}

/// Substitute every shortcode in `text`.
///
/// Borrows `text` back unchanged when nothing was substituted.
#[must_use]
pub fn replace_shortcodes<'t>(
    text: &'t str,
    emoji_map: &EmojiMap,
    aliases: Option<&AliasMap>,
) -> Cow<'t, str> {
    let replaced = shortcode_regex().replace_all(text, |caps: &Captures<'_>| {
        resolve_shortcode(&caps[0], emoji_map, aliases).to_string()
    });
    match replaced {
        Cow::Owned(owned) if owned == text => Cow::Borrowed(text),
        other => other,
    }
}

/// Resolve one matched shortcode to its replacement.
///
/// The alias table is consulted once (wrapped key, then bare key), then the
/// emoji table under the canonical name in both forms and finally under the
/// shortcode as matched. Empty values count as misses. Without a hit the
/// shortcode itself is returned.
#[must_use]
pub fn resolve_shortcode<'a>(
    shortcode: &'a str,
    emoji_map: &'a EmojiMap,
    aliases: Option<&'a AliasMap>,
) -> &'a str {
    let key = ensure_colon(shortcode);
    let canonical = aliases
        .and_then(|aliases| aliases.lookup(&key).or_else(|| aliases.lookup(bare(&key))))
        .unwrap_or(shortcode);
    let canonical_key = ensure_colon(canonical);

    emoji_map
        .lookup(&canonical_key)
        .or_else(|| emoji_map.lookup(bare(&canonical_key)))
        .or_else(|| emoji_map.lookup(shortcode))
        .or_else(|| emoji_map.lookup(bare(shortcode)))
        .unwrap_or(shortcode)
}

/// Join and parse the skip selectors once per application.
fn compile_skip_selectors(selectors: &[String]) -> Option<SelectorList> {
    if selectors.is_empty() {
        return None;
    }
    let joined = selectors.join(",");
    match parse_selector_list(&joined) {
        Ok(list) => Some(list),
        Err(err) => {
            warn_once(
                Component::Selector,
                &format!("ignoring skip selectors {joined:?}: {err}"),
            );
            None
        }
    }
}

/// Walk the element ancestors of `node`, from its parent up to `root`.
fn is_excluded(
    tree: &DomTree,
    node: NodeId,
    root: NodeId,
    skip_math: bool,
    skip_list: Option<&SelectorList>,
) -> bool {
    for ancestor in tree.ancestors(node) {
        if let Some(element) = tree.as_element(ancestor)
            && is_skipped_element(tree, ancestor, element, skip_math, skip_list)
        {
            return true;
        }
        if ancestor == root {
            break;
        }
    }
    false
}

fn is_skipped_element(
    tree: &DomTree,
    id: NodeId,
    element: &ElementData,
    skip_math: bool,
    skip_list: Option<&SelectorList>,
) -> bool {
    let tag_name = element.html_uppercased_name();
    if SkipTag::is_skipped(&tag_name) {
        return true;
    }
    if skip_math && (element.has_class(MATH_BLOCK_CLASS) || tag_name.starts_with(MATHJAX_TAG_PREFIX))
    {
        return true;
    }
    skip_list.is_some_and(|list| list.matches(tree, id))
}
