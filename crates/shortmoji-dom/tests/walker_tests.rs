//! Tests for the generic `TreeWalker`.

use shortmoji_dom::{
    Attribute, DomTree, ElementData, NodeFilter, NodeId, NodeType, TreeWalker, WhatToShow,
};

fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc(NodeType::Element(ElementData::new(tag, Vec::new())));
    tree.append_child(parent, id);
    id
}

fn text(tree: &mut DomTree, parent: NodeId, data: &str) -> NodeId {
    let id = tree.alloc(NodeType::Text(data.to_string()));
    tree.append_child(parent, id);
    id
}

/// `<div>one<p>two<code>three</code></p>four</div><aside>five</aside>`
fn sample() -> (DomTree, NodeId, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div");
    let one = text(&mut tree, div, "one");
    let p = element(&mut tree, div, "p");
    let two = text(&mut tree, p, "two");
    let code = element(&mut tree, p, "code");
    let three = text(&mut tree, code, "three");
    let four = text(&mut tree, div, "four");
    let aside = element(&mut tree, NodeId::ROOT, "aside");
    let five = text(&mut tree, aside, "five");
    (tree, div, vec![one, two, three, four, five])
}

#[test]
fn test_text_nodes_in_document_order() {
    let (tree, div, texts) = sample();
    let walker = TreeWalker::new(&tree, div, WhatToShow::TEXT, |_, _| NodeFilter::Accept);
    let seen: Vec<NodeId> = walker.collect();
    // The walk never leaves the root, so the aside's text is not visited.
    assert_eq!(seen, texts[..4].to_vec());
}

#[test]
fn test_reject_prunes_subtree() {
    let (tree, _, texts) = sample();
    let walker = TreeWalker::new(
        &tree,
        NodeId::ROOT,
        WhatToShow::TEXT.union(WhatToShow::ELEMENT),
        |tree: &DomTree, id| match tree.as_element(id) {
            Some(data) if data.tag_name == "code" => NodeFilter::Reject,
            Some(_) => NodeFilter::Skip,
            None => NodeFilter::Accept,
        },
    );
    let seen: Vec<NodeId> = walker.collect();
    assert_eq!(seen, vec![texts[0], texts[1], texts[3], texts[4]]);
}

#[test]
fn test_elements_only() {
    let (tree, _, _) = sample();
    let tags: Vec<String> = TreeWalker::new(&tree, NodeId::ROOT, WhatToShow::ELEMENT, |_, _| {
        NodeFilter::Accept
    })
    .map(|id| tree.as_element(id).unwrap().tag_name.clone())
    .collect();
    assert_eq!(tags, vec!["div", "p", "code", "aside"]);
}

#[test]
fn test_root_is_never_returned() {
    let mut tree = DomTree::new();
    let lone = text(&mut tree, NodeId::ROOT, "alone");
    let mut walker = TreeWalker::new(&tree, lone, WhatToShow::ALL, |_, _| NodeFilter::Accept);
    assert_eq!(walker.root(), lone);
    assert_eq!(walker.next(), None);
}

#[test]
fn test_exhausted_walker_stays_exhausted() {
    let (tree, div, _) = sample();
    let mut walker = TreeWalker::new(&tree, div, WhatToShow::TEXT, |_, _| NodeFilter::Accept);
    assert_eq!(walker.by_ref().count(), 4);
    assert_eq!(walker.next(), None);
    assert_eq!(walker.next(), None);
}

#[test]
fn test_filter_sees_attributes() {
    let mut tree = DomTree::new();
    let span = tree.alloc(NodeType::Element(ElementData::new(
        "span",
        vec![Attribute::new("class", "no-emoji")],
    )));
    tree.append_child(NodeId::ROOT, span);
    let hidden = text(&mut tree, span, ":smile:");
    let shown = text(&mut tree, NodeId::ROOT, ":smile:");

    let seen: Vec<NodeId> = TreeWalker::new(&tree, NodeId::ROOT, WhatToShow::TEXT, |tree: &DomTree, id| {
        let blocked = tree
            .ancestors(id)
            .filter_map(|a| tree.as_element(a))
            .any(|e| e.has_class("no-emoji"));
        if blocked { NodeFilter::Reject } else { NodeFilter::Accept }
    })
    .collect();
    assert_eq!(seen, vec![shown]);
    assert!(!seen.contains(&hidden));
}
