//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)

use shortmoji_dom::{DomTree, NodeId, NodeType};

use crate::parser::VOID_ELEMENTS;

/// Text inside these elements is written out without escaping.
///
/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element, ... then append the value of current
/// node's data literally."
const RAW_TEXT_PARENTS: &[&str] = &[
    "style",
    "script",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
];

/// Serialize the children of `id`, the equivalent of reading `innerHTML`.
///
/// Serializing the Document node yields the whole fragment.
#[must_use]
pub fn serialize_children(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        write_node(tree, child, &mut out);
    }
    out
}

/// Serialize `id` itself and its subtree, the equivalent of `outerHTML`.
#[must_use]
pub fn serialize_node(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {
            for &child in tree.children(id) {
                write_node(tree, child, out);
            }
        }
        NodeType::Element(data) => {
            out.push('<');
            out.push_str(&data.tag_name);
            for attr in &data.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');

            // "If current node serializes as void, then continue on to the
            // next child node at this point."
            if VOID_ELEMENTS.contains(&data.tag_name.as_str()) {
                return;
            }

            for &child in tree.children(id) {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag_name);
            out.push('>');
        }
        NodeType::Text(data) => {
            let raw = node
                .parent
                .and_then(|parent| tree.as_element(parent))
                .is_some_and(|parent| RAW_TEXT_PARENTS.contains(&parent.tag_name.as_str()));
            if raw {
                out.push_str(data);
            } else {
                escape_into(data, false, out);
            }
        }
        // "the concatenation of "<!--" (U+003C U+0021 U+002D U+002D), the value
        // of current node's data IDL attribute, and the string "-->""
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
        NodeType::DocumentType(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrence of the "&" character by the string "&amp;".
/// Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
/// string "&nbsp;". If the algorithm was invoked in the attribute mode,
/// replace any occurrences of the """ character by the string "&quot;". If
/// the algorithm was not invoked in the attribute mode, replace any
/// occurrences of the "<" character by the string "&lt;", and any
/// occurrences of the ">" character by the string "&gt;"."
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
