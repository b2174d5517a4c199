//! CSS Selector matching
//!
//! This module implements selector matching per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/). Parsing lives in
//! [`parser`]; the types here are what it produces.

mod parser;

pub use parser::parse_selector_list;

use shortmoji_dom::{DomTree, ElementData, NodeId, NodeType};
use thiserror::Error;

/// Why a selector string could not be parsed.
///
/// [§ 3.1 Invalid selectors](https://www.w3.org/TR/selectors-4/#invalid)
/// "An invalid selector represents, and therefore matches, nothing."
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The input (or one entry of a list) was empty.
    #[error("empty selector")]
    Empty,
    /// Input ended in the middle of a selector.
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    /// A character that cannot appear at this position.
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Character offset into the selector string.
        offset: usize,
    },
    /// A `>`, `+` or `~` combinator missing a compound on one side.
    #[error("combinator {0:?} is missing an operand")]
    DanglingCombinator(char),
    /// A pseudo-class this matcher does not know.
    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudoClass(String),
    /// A quoted attribute value without its closing quote.
    #[error("unterminated string in attribute selector")]
    UnterminatedString,
}

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `pre`, `code`, `mjx-container`
    Type(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.no-emoji`, `.math-block`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),

    /// [§ 4.3 The Negation Pseudo-class](https://www.w3.org/TR/selectors-4/#negation)
    ///
    /// "The negation pseudo-class, :not(), is a functional pseudo-class taking
    /// a selector list as an argument. It represents an element that is not
    /// represented by its argument."
    Not(SelectorList),

    /// Pseudo-classes describing user interaction (`:hover`, `:focus`, ...)
    /// and all pseudo-elements. Valid syntax, but a static document never
    /// has an element in such a state.
    NeverMatch,
}

/// Structural pseudo-classes per [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    /// `:root`: "an element that is the root of the document"
    Root,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:only-child`
    OnlyChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:empty`: "an element that has no children except, optionally,
    /// document white space characters" (comments are ignored as well).
    Empty,
    /// `:link` / `:any-link`: `<a>` or `<area>` with an `href`.
    Link,
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`
    Exists(String),
    /// `[attr=value]`
    Equals(String, String),
    /// `[attr~=value]`: whitespace-separated word match
    Includes(String, String),
    /// `[attr|=value]`: exact, or prefix followed by `-`
    DashMatch(String, String),
    /// `[attr^=value]`
    PrefixMatch(String, String),
    /// `[attr$=value]`
    SuffixMatch(String, String),
    /// `[attr*=value]`
    SubstringMatch(String, String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The simple selectors that must all match.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`: B is an arbitrary descendant of A.
    Descendant,
    /// `A > B`: B is a direct child of A.
    Child,
    /// `A + B`: B immediately follows A.
    NextSibling,
    /// `A ~ B`: B follows A, not necessarily immediately.
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// Example: `div.note > p code`
/// ```text
/// subject: [code]
/// combinators: [(Descendant, [p]), (Child, [div.note])]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    pub subject: CompoundSelector,

    /// `(combinator, compound)` pairs going left from the subject, so that
    /// matching walks outward from the element being tested.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A list of simple/compound/complex selectors is a comma-separated list
/// ... It represents the union of the elements represented by its members."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    /// The member selectors, in source order.
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// [§ 3 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// True if any member selector matches `node_id`. Non-element nodes
    /// never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        self.selectors
            .iter()
            .any(|selector| selector.matches(tree, node_id))
    }

    /// Number of complex selectors in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Whether the list is empty (never true for a parsed list).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl ComplexSelector {
    /// Match this selector with `node_id` as the subject.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        self.subject.matches(tree, node_id) && self.matches_chain(0, tree, node_id)
    }

    /// Match `combinators[index..]`, where `node_id` already matched the
    /// compound to the right of `combinators[index]`.
    ///
    /// Descendant and subsequent-sibling steps try every candidate, not just
    /// the nearest one, so `.a > .b .c` still matches when the closest `.b`
    /// is not a child of `.a` but a farther one is.
    fn matches_chain(&self, index: usize, tree: &DomTree, node_id: NodeId) -> bool {
        let Some((combinator, compound)) = self.combinators.get(index) else {
            return true;
        };
        let next = |candidate: NodeId| {
            compound.matches(tree, candidate) && self.matches_chain(index + 1, tree, candidate)
        };

        match combinator {
            Combinator::Descendant => tree.ancestors(node_id).any(next),
            Combinator::Child => tree.parent(node_id).is_some_and(next),
            Combinator::NextSibling => previous_element_sibling(tree, node_id).is_some_and(next),
            Combinator::SubsequentSibling => tree
                .preceding_siblings(node_id)
                .filter(|&sibling| tree.as_element(sibling).is_some())
                .any(next),
        }
    }
}

impl CompoundSelector {
    /// True if `node_id` is an element and every simple selector matches it.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        let Some(element) = tree.as_element(node_id) else {
            return false;
        };
        self.simple_selectors
            .iter()
            .all(|simple| simple.matches(tree, node_id, element))
    }
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId, element: &ElementData) -> bool {
        match self {
            // "A type selector written in the style sheet as an identifier represents
            // an element in the document tree with the same qualified name as the identifier."
            // HTML element names are ASCII case-insensitive.
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Universal => true,
            Self::Class(class_name) => element.has_class(class_name),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Attribute(attr_sel) => attr_sel.matches(element),
            Self::PseudoClass(pc) => pc.matches(tree, node_id, element),
            Self::Not(list) => !list.matches(tree, node_id),
            Self::NeverMatch => false,
        }
    }
}

impl AttributeSelector {
    /// [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// "If 'val' is the empty string, it will never represent anything" holds
    /// for `^=`, `$=` and `*=`; `~=` additionally never matches a value
    /// containing whitespace.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Exists(name) => element.has_attribute(name),
            Self::Equals(name, val) => element.get_attribute(name) == Some(val.as_str()),
            Self::Includes(name, val) => {
                !val.is_empty()
                    && !val.contains(|c: char| c.is_ascii_whitespace())
                    && element
                        .get_attribute(name)
                        .is_some_and(|v| v.split_ascii_whitespace().any(|w| w == val))
            }
            Self::DashMatch(name, val) => element.get_attribute(name).is_some_and(|v| {
                v == val || v.strip_prefix(val.as_str()).is_some_and(|rest| rest.starts_with('-'))
            }),
            Self::PrefixMatch(name, val) => {
                !val.is_empty()
                    && element
                        .get_attribute(name)
                        .is_some_and(|v| v.starts_with(val.as_str()))
            }
            Self::SuffixMatch(name, val) => {
                !val.is_empty()
                    && element
                        .get_attribute(name)
                        .is_some_and(|v| v.ends_with(val.as_str()))
            }
            Self::SubstringMatch(name, val) => {
                !val.is_empty()
                    && element
                        .get_attribute(name)
                        .is_some_and(|v| v.contains(val.as_str()))
            }
        }
    }
}

impl PseudoClass {
    /// Match a structural pseudo-class with full DOM tree context.
    #[must_use]
    pub fn matches(self, tree: &DomTree, node_id: NodeId, element: &ElementData) -> bool {
        match self {
            Self::Root => tree.document_element() == Some(node_id),
            Self::FirstChild => previous_element_sibling(tree, node_id).is_none(),
            Self::LastChild => next_element_sibling(tree, node_id).is_none(),
            Self::OnlyChild => {
                previous_element_sibling(tree, node_id).is_none()
                    && next_element_sibling(tree, node_id).is_none()
            }
            Self::FirstOfType => !tree
                .preceding_siblings(node_id)
                .any(|sibling| same_type(tree, sibling, element)),
            Self::LastOfType => {
                let mut following = tree.next_sibling(node_id);
                while let Some(sibling) = following {
                    if same_type(tree, sibling, element) {
                        return false;
                    }
                    following = tree.next_sibling(sibling);
                }
                true
            }
            Self::Empty => tree.children(node_id).iter().all(|&child| {
                match tree.get(child).map(|n| &n.node_type) {
                    Some(NodeType::Comment(_)) => true,
                    Some(NodeType::Text(data)) => data.is_empty(),
                    _ => false,
                }
            }),
            Self::Link => {
                (element.tag_name.eq_ignore_ascii_case("a")
                    || element.tag_name.eq_ignore_ascii_case("area"))
                    && element.has_attribute("href")
            }
        }
    }
}

fn same_type(tree: &DomTree, sibling: NodeId, element: &ElementData) -> bool {
    tree.as_element(sibling)
        .is_some_and(|other| other.tag_name.eq_ignore_ascii_case(&element.tag_name))
}

/// The nearest preceding sibling that is an element (text and comments are skipped).
fn previous_element_sibling(tree: &DomTree, node_id: NodeId) -> Option<NodeId> {
    tree.preceding_siblings(node_id)
        .find(|&sibling| tree.as_element(sibling).is_some())
}

fn next_element_sibling(tree: &DomTree, node_id: NodeId) -> Option<NodeId> {
    let mut current = tree.next_sibling(node_id);
    while let Some(sibling) = current {
        if tree.as_element(sibling).is_some() {
            return Some(sibling);
        }
        current = tree.next_sibling(sibling);
    }
    None
}
