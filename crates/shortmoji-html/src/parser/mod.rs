//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! A fragment tree builder. Rendered Markdown is a sequence of block
//! elements rather than a full document, so there are no insertion modes:
//! nodes are inserted at the current node of a stack of open elements, with
//! the handful of implied end tags that Markdown renderers rely on.

use std::fmt::Write as _;

use shortmoji_common::{Component, warn_once};
use shortmoji_dom::{Attribute, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{HTMLTokenizer, Token};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
///
/// Start tags that "close a p element" if one is in button scope.
const CLOSES_P: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "ul",
];

/// [§ 13.2.4.2 has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// "The stack of open elements is said to have a particular element in scope
/// when it has that element in the specific scope consisting of the
/// following element types: applet, caption, html, table, td, th, marquee,
/// object, template, MathML mi, ..., SVG foreignObject, SVG desc, SVG title"
const DEFAULT_SCOPE: &[&str] = &[
    "applet",
    "caption",
    "html",
    "table",
    "td",
    "th",
    "marquee",
    "object",
    "template",
    "foreignobject",
];

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from a stream of tokens.
pub struct HTMLParser {
    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Stores `NodeId`s into the arena.
    stack_of_open_elements: Vec<NodeId>,

    /// DOM tree with parent/sibling pointers.
    /// `NodeId::ROOT` (index 0) is the Document node.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        // DomTree::new() creates the Document node at NodeId::ROOT
        Self {
            stack_of_open_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
        }
    }

    /// Run the parser and return the DOM tree.
    ///
    /// Top-level nodes of the fragment become children of the Document node.
    #[must_use]
    pub fn run(mut self) -> DomTree {
        let tokens = std::mem::take(&mut self.tokens);
        for token in tokens {
            match token {
                Token::Doctype { name } => {
                    let _ = self.insert(NodeType::DocumentType(name));
                }
                Token::StartTag {
                    name,
                    self_closing,
                    attributes,
                } => self.handle_start_tag(name, self_closing, attributes),
                Token::EndTag { name } => self.handle_end_tag(&name),
                Token::Comment { data } => {
                    let _ = self.insert(NodeType::Comment(data));
                }
                Token::Text { data } => self.insert_text(&data),
                Token::EndOfFile => break,
            }
        }
        self.tree
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    /// With an empty stack, nodes go straight under the Document.
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn tag_name(&self, id: NodeId) -> &str {
        self.tree
            .as_element(id)
            .map_or("", |data| data.tag_name.as_str())
    }

    /// [§ 13.2.6.1 Insert a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    fn insert(&mut self, node_type: NodeType) -> NodeId {
        let parent = self.current_node();
        let id = self.tree.alloc(node_type);
        self.tree.append_child(parent, id);
        id
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data. Otherwise, create
    /// a new Text node whose data is data."
    fn insert_text(&mut self, data: &str) {
        let parent = self.current_node();
        let preceding_text = self
            .tree
            .children(parent)
            .last()
            .and_then(|&last| Some((last, self.tree.as_text(last)?)));

        if let Some((last, existing)) = preceding_text {
            let merged = format!("{existing}{data}");
            self.tree.set_text(last, merged);
        } else {
            let _ = self.insert(NodeType::Text(data.to_string()));
        }
    }

    fn handle_start_tag(
        &mut self,
        name: String,
        self_closing: bool,
        attributes: Vec<Attribute>,
    ) {
        // "If the stack of open elements has a p element in button scope,
        // then close a p element."
        if CLOSES_P.contains(&name.as_str()) && self.has_element_in_scope("p", &["button"]) {
            self.pop_until_popped("p");
        }

        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // "A start tag whose tag name is "li"": close any open li in list
        // item scope. dt/dd close each other the same way.
        match name.as_str() {
            "li" => self.close_implied("li", &["ul", "ol"]),
            "dt" | "dd" => {
                self.close_implied("dt", &[]);
                self.close_implied("dd", &[]);
            }
            "option" if self.tag_name(self.current_node()) == "option" => {
                let _ = self.stack_of_open_elements.pop();
            }
            _ => {}
        }

        let in_foreign_content = matches!(name.as_str(), "svg" | "math")
            || self
                .stack_of_open_elements
                .iter()
                .any(|&id| matches!(self.tag_name(id), "svg" | "math"));
        let is_void = VOID_ELEMENTS.contains(&name.as_str());

        let id = self.insert(NodeType::Element(ElementData::new(name, attributes)));

        // "Acknowledge the token's self-closing flag" only where it means
        // something: void elements and foreign content.
        if !is_void && !(self_closing && in_foreign_content) {
            self.stack_of_open_elements.push(id);
        }
    }

    fn handle_end_tag(&mut self, name: &str) {
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        // "any other end tag": walk down the stack looking for a matching
        // element; pop through it if found, otherwise ignore the token.
        if self
            .stack_of_open_elements
            .iter()
            .any(|&id| self.tag_name(id) == name)
        {
            self.pop_until_popped(name);
        } else {
            warn_once(
                Component::Html,
                &format!("ignoring end tag </{name}> with no matching open element"),
            );
        }
    }

    /// Close an open `tag` unless a boundary element is in the way.
    fn close_implied(&mut self, tag: &str, extra_boundaries: &[&str]) {
        if self.has_element_in_scope(tag, extra_boundaries) {
            self.pop_until_popped(tag);
        }
    }

    /// [§ 13.2.4.2 has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    fn has_element_in_scope(&self, target: &str, extra_boundaries: &[&str]) -> bool {
        for &id in self.stack_of_open_elements.iter().rev() {
            let name = self.tag_name(id);
            if name == target {
                return true;
            }
            if DEFAULT_SCOPE.contains(&name) || extra_boundaries.contains(&name) {
                return false;
            }
        }
        false
    }

    /// "Pop elements from the stack of open elements until an element with
    /// the same tag name has been popped from the stack."
    fn pop_until_popped(&mut self, tag: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.tag_name(id) == tag {
                break;
            }
        }
    }
}

/// Tokenize and tree-build an HTML fragment in one step.
///
/// # Example
/// ```
/// use shortmoji_html::parse_fragment;
///
/// let tree = parse_fragment("<p>Hello :wave:</p>");
/// let p = tree.document_element().unwrap();
/// assert_eq!(tree.text_content(p), "Hello :wave:");
/// ```
#[must_use]
pub fn parse_fragment(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run()
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    format_node(tree, id, 0, &mut out);
    out
}

fn format_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}Document"),
        NodeType::DocumentType(name) => writeln!(out, "{prefix}<!DOCTYPE {name}>"),
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                writeln!(out, "{prefix}<{}>", data.tag_name)
            } else {
                let attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|attr| {
                        if attr.value.is_empty() {
                            attr.name.clone()
                        } else {
                            format!("{}=\"{}\"", attr.name, attr.value)
                        }
                    })
                    .collect();
                writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "))
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
    };
    for &child_id in tree.children(id) {
        format_node(tree, child_id, indent + 1, out);
    }
}

/// Print the subtree at `id` to stdout, as produced by [`format_tree`].
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}
