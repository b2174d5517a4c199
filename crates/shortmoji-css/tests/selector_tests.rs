//! Integration tests for selector list parsing and matching.

use shortmoji_css::selector::{
    AttributeSelector, Combinator, PseudoClass, SelectorError, SimpleSelector,
    parse_selector_list,
};
use shortmoji_dom::{DomTree, NodeId, NodeType};
use shortmoji_html::parse_fragment;

/// Helper to get the first element with the given id attribute (depth-first).
fn by_id(tree: &DomTree, from: NodeId, id: &str) -> NodeId {
    fn search(tree: &DomTree, from: NodeId, id: &str) -> Option<NodeId> {
        if tree.as_element(from).is_some_and(|e| e.id() == Some(id)) {
            return Some(from);
        }
        tree.children(from)
            .iter()
            .find_map(|&child| search(tree, child, id))
    }
    search(tree, from, id).unwrap_or_else(|| panic!("no element with id {id}"))
}

fn matches(selector: &str, html: &str, id: &str) -> bool {
    let tree = parse_fragment(html);
    let target = by_id(&tree, NodeId::ROOT, id);
    parse_selector_list(selector).unwrap().matches(&tree, target)
}

// ========== parsing ==========

#[test]
fn test_parse_class_selector() {
    let list = parse_selector_list(".no-emoji").unwrap();
    assert_eq!(list.len(), 1);
    let selector = &list.selectors[0];
    assert!(selector.combinators.is_empty());
    assert_eq!(
        selector.subject.simple_selectors,
        vec![SimpleSelector::Class("no-emoji".to_string())]
    );
}

#[test]
fn test_parse_list_of_three() {
    let list = parse_selector_list(".a, pre > code ,  #main").unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(
        list.selectors[1].combinators[0].0,
        Combinator::Child,
        "pre > code has a child combinator"
    );
}

#[test]
fn test_parse_combinator_chain_is_right_to_left() {
    let list = parse_selector_list("div.note > p code").unwrap();
    let selector = &list.selectors[0];
    assert_eq!(
        selector.subject.simple_selectors,
        vec![SimpleSelector::Type("code".to_string())]
    );
    assert_eq!(selector.combinators[0].0, Combinator::Descendant);
    assert_eq!(selector.combinators[1].0, Combinator::Child);
    assert_eq!(selector.combinators[1].1.simple_selectors.len(), 2);
}

#[test]
fn test_parse_attribute_operators() {
    let list = parse_selector_list(r#"[data-x], [lang|=en], [href^="https:"], [class~='a']"#).unwrap();
    let attrs: Vec<&SimpleSelector> = list
        .selectors
        .iter()
        .map(|s| &s.subject.simple_selectors[0])
        .collect();
    assert_eq!(
        attrs[0],
        &SimpleSelector::Attribute(AttributeSelector::Exists("data-x".to_string()))
    );
    assert_eq!(
        attrs[1],
        &SimpleSelector::Attribute(AttributeSelector::DashMatch(
            "lang".to_string(),
            "en".to_string()
        ))
    );
    assert_eq!(
        attrs[2],
        &SimpleSelector::Attribute(AttributeSelector::PrefixMatch(
            "href".to_string(),
            "https:".to_string()
        ))
    );
}

#[test]
fn test_parse_pseudo_classes() {
    let list = parse_selector_list("li:first-child, a:hover, p::before").unwrap();
    assert_eq!(
        list.selectors[0].subject.simple_selectors[1],
        SimpleSelector::PseudoClass(PseudoClass::FirstChild)
    );
    assert_eq!(
        list.selectors[1].subject.simple_selectors[1],
        SimpleSelector::NeverMatch
    );
    assert_eq!(
        list.selectors[2].subject.simple_selectors[1],
        SimpleSelector::NeverMatch
    );
}

#[test]
fn test_invalid_selectors_are_errors() {
    assert_eq!(parse_selector_list(""), Err(SelectorError::Empty));
    assert_eq!(parse_selector_list(".a,"), Err(SelectorError::Empty));
    assert_eq!(
        parse_selector_list("div >"),
        Err(SelectorError::DanglingCombinator('>'))
    );
    assert_eq!(
        parse_selector_list("> div"),
        Err(SelectorError::DanglingCombinator('>'))
    );
    assert_eq!(
        parse_selector_list(":bogus"),
        Err(SelectorError::UnsupportedPseudoClass("bogus".to_string()))
    );
    assert_eq!(
        parse_selector_list(r#"[title="open"#),
        Err(SelectorError::UnterminatedString)
    );
    assert!(matches!(
        parse_selector_list("div!"),
        Err(SelectorError::UnexpectedChar { found: '!', .. })
    ));
    assert!(parse_selector_list(":nth-child(2)").is_err());
    assert!(parse_selector_list("..a").is_err());
}

// ========== matching ==========

#[test]
fn test_match_class_and_type() {
    let html = r#"<span id="t" class="note no-emoji">x</span>"#;
    assert!(matches(".no-emoji", html, "t"));
    assert!(matches("SPAN", html, "t"));
    assert!(matches("span.note.no-emoji", html, "t"));
    assert!(!matches("div", html, "t"));
    assert!(!matches(".No-Emoji", html, "t"));
}

#[test]
fn test_match_list_is_union() {
    let html = r#"<p id="t">x</p>"#;
    assert!(matches(".missing, p", html, "t"));
    assert!(!matches(".missing, div", html, "t"));
}

#[test]
fn test_descendant_backtracks_past_nearest_ancestor() {
    let html = r#"<div class="a"><div class="b"><section class="b"><i id="t"></i></section></div></div>"#;
    // The closest `.b` is a <section> whose parent is not `.a`; the outer
    // `.b` is. The selector must still match.
    assert!(matches(".a > .b .c, .a > .b i", html, "t"));
    assert!(!matches(".a > section i", html, "t"));
}

#[test]
fn test_sibling_combinators() {
    let html = r#"<ul><li id="one">1</li> text <li id="two">2</li><li id="three">3</li></ul>"#;
    assert!(matches("#one + li", html, "two"));
    assert!(!matches("#one + li", html, "three"));
    assert!(matches("#one ~ li", html, "three"));
}

#[test]
fn test_structural_pseudo_classes() {
    let html = r#"<ul><li id="a">1</li><li id="b">2</li></ul><p id="e"><!-- c --></p>"#;
    assert!(matches("li:first-child", html, "a"));
    assert!(!matches("li:first-child", html, "b"));
    assert!(matches("li:last-child", html, "b"));
    assert!(matches("li:last-of-type", html, "b"));
    assert!(!matches("li:only-child", html, "a"));
    assert!(matches("p:empty", html, "e"));
}

#[test]
fn test_negation() {
    let html = r#"<span id="t" class="keep">x</span>"#;
    assert!(matches("span:not(.skip)", html, "t"));
    assert!(!matches("span:not(.skip, .keep)", html, "t"));
}

#[test]
fn test_attribute_matching() {
    let html = r#"<a id="t" href="https://example.com" lang="en-GB" data-kind="">x</a>"#;
    assert!(matches("[href]", html, "t"));
    assert!(matches(r#"[href^="https"]"#, html, "t"));
    assert!(matches("[href$='.com']", html, "t"));
    assert!(matches("[href*=example]", html, "t"));
    assert!(matches("[lang|=en]", html, "t"));
    assert!(matches(r#"[data-kind=""]"#, html, "t"));
    assert!(!matches(r#"[href^=""]"#, html, "t"));
    assert!(matches("a:link", html, "t"));
}

#[test]
fn test_non_elements_never_match() {
    let tree = parse_fragment("<p>hello</p>");
    let p = tree.document_element().unwrap();
    let text = tree.children(p)[0];
    assert!(matches!(
        tree.get(text).map(|n| &n.node_type),
        Some(NodeType::Text(_))
    ));
    let list = parse_selector_list("*").unwrap();
    assert!(list.matches(&tree, p));
    assert!(!list.matches(&tree, text));
}
