//! Tests for DOM tree construction, element data and text mutation.

use shortmoji_dom::{Attribute, DomTree, ElementData, NodeId, NodeKind, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let attrs = attrs
        .iter()
        .map(|(name, value)| Attribute::new(*name, *value))
        .collect();
    tree.alloc(NodeType::Element(ElementData::new(tag, attrs)))
}

fn alloc_text(tree: &mut DomTree, data: &str) -> NodeId {
    tree.alloc(NodeType::Text(data.to_string()))
}

#[test]
fn test_append_child_links_siblings() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div", &[]);
    tree.append_child(NodeId::ROOT, div);

    let a = alloc_text(&mut tree, "a");
    let b = alloc_element(&mut tree, "b", &[]);
    let c = alloc_text(&mut tree, "c");
    tree.append_child(div, a);
    tree.append_child(div, b);
    tree.append_child(div, c);

    assert_eq!(tree.children(div), &[a, b, c]);
    assert_eq!(tree.first_child(div), Some(a));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.parent(b), Some(div));
    assert_eq!(tree.preceding_siblings(c).collect::<Vec<_>>(), vec![b, a]);
}

#[test]
fn test_ancestors_walk_to_document() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html", &[]);
    let body = alloc_element(&mut tree, "body", &[]);
    let text = alloc_text(&mut tree, "hi");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, body);
    tree.append_child(body, text);

    let chain: Vec<NodeId> = tree.ancestors(text).collect();
    assert_eq!(chain, vec![body, html, NodeId::ROOT]);
    assert_eq!(tree.document_element(), Some(html));
}

#[test]
fn test_class_list_and_attributes() {
    let mut tree = DomTree::new();
    let span = alloc_element(
        &mut tree,
        "span",
        &[("class", "  math-block\tinline "), ("id", "eq1")],
    );
    let data = tree.as_element(span).unwrap();

    assert!(data.has_class("math-block"));
    assert!(data.has_class("inline"));
    assert!(!data.has_class("math"));
    assert_eq!(data.classes().count(), 2);
    assert_eq!(data.id(), Some("eq1"));
    assert!(data.has_attribute("class"));
    assert_eq!(data.get_attribute("title"), None);
}

#[test]
fn test_html_uppercased_name() {
    let data = ElementData::new("mjx-container", Vec::new());
    assert_eq!(data.html_uppercased_name(), "MJX-CONTAINER");
}

#[test]
fn test_set_text_replaces_data_only_on_text_nodes() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p", &[]);
    let text = alloc_text(&mut tree, "before");
    tree.append_child(NodeId::ROOT, p);
    tree.append_child(p, text);

    tree.set_text(text, "after".to_string());
    assert_eq!(tree.as_text(text), Some("after"));

    // Elements are left alone.
    tree.set_text(p, "ignored".to_string());
    assert_eq!(tree.get(p).unwrap().node_type.kind(), NodeKind::Element);
    assert_eq!(tree.children(p), &[text]);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p", &[]);
    let hello = alloc_text(&mut tree, "Hello ");
    let em = alloc_element(&mut tree, "em", &[]);
    let world = alloc_text(&mut tree, "world");
    let comment = tree.alloc(NodeType::Comment("note".to_string()));
    tree.append_child(NodeId::ROOT, p);
    tree.append_child(p, hello);
    tree.append_child(p, em);
    tree.append_child(em, world);
    tree.append_child(p, comment);

    assert_eq!(tree.text_content(p), "Hello world");
    assert_eq!(tree.text_content(comment), "note");
    assert_eq!(tree.text_content(NodeId(999)), "");
}

#[test]
fn test_contains_reports_known_ids() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div", &[]);
    assert!(tree.contains(NodeId::ROOT));
    assert!(tree.contains(div));
    assert!(!tree.contains(NodeId(42)));
    assert_eq!(tree.len(), 2);
}
