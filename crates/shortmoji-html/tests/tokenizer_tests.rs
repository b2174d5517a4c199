//! Integration tests for the HTML tokenizer.

use shortmoji_dom::Attribute;
use shortmoji_html::tokenizer::TokenizerState;
use shortmoji_html::{HTMLTokenizer, Token};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

fn text(data: &str) -> Token {
    Token::Text {
        data: data.to_string(),
    }
}

fn start(name: &str, attributes: Vec<Attribute>) -> Token {
    Token::StartTag {
        name: name.to_string(),
        self_closing: false,
        attributes,
    }
}

fn end(name: &str) -> Token {
    Token::EndTag {
        name: name.to_string(),
    }
}

#[test]
fn test_plain_text_is_one_token() {
    assert_eq!(tokenize("Hello :smile:"), vec![text("Hello :smile:"), Token::EndOfFile]);
}

#[test]
fn test_empty_input() {
    assert_eq!(tokenize(""), vec![Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(
        tokens,
        vec![
            Token::Doctype {
                name: "html".to_string()
            },
            Token::EndOfFile
        ]
    );
}

#[test]
fn test_tags_are_lowercased() {
    let tokens = tokenize("<DIV Class=\"x\">a</Div>");
    assert_eq!(
        tokens,
        vec![
            start("div", vec![Attribute::new("class", "x")]),
            text("a"),
            end("div"),
            Token::EndOfFile
        ]
    );
}

#[test]
fn test_attribute_forms() {
    let tokens = tokenize("<input type=checkbox checked data-x='1' title=\"a b\">");
    assert_eq!(
        tokens[0],
        start(
            "input",
            vec![
                Attribute::new("type", "checkbox"),
                Attribute::new("checked", ""),
                Attribute::new("data-x", "1"),
                Attribute::new("title", "a b"),
            ]
        )
    );
}

#[test]
fn test_duplicate_attributes_keep_first() {
    let tokens = tokenize("<p class=a class=b>");
    assert_eq!(tokens[0], start("p", vec![Attribute::new("class", "a")]));
}

#[test]
fn test_self_closing_flag() {
    let tokens = tokenize("<br/><circle r=\"1\" />");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
    assert!(matches!(
        &tokens[1],
        Token::StartTag { name, self_closing: true, attributes } if name == "circle" && attributes.len() == 1
    ));
}

#[test]
fn test_comments() {
    let tokens = tokenize("a<!-- note -->b<!---->c<!-->d");
    assert_eq!(
        tokens,
        vec![
            text("a"),
            Token::Comment {
                data: " note ".to_string()
            },
            text("b"),
            Token::Comment {
                data: String::new()
            },
            text("c"),
            Token::Comment {
                data: String::new()
            },
            text("d"),
            Token::EndOfFile
        ]
    );
}

#[test]
fn test_bogus_comment() {
    let tokens = tokenize("<?xml version=\"1.0\"?>x");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "?xml version=\"1.0\"?".to_string()
        }
    );
    assert_eq!(tokens[1], text("x"));
}

#[test]
fn test_character_references_in_text() {
    let tokens = tokenize("a &amp; b &lt;c&gt; &#x1F604; &copy &unknown;");
    assert_eq!(tokens[0], text("a & b <c> \u{1F604} \u{00A9} &unknown;"));
}

#[test]
fn test_character_references_in_attribute() {
    let tokens = tokenize("<a href=\"?a=1&amp;b=2&copy=3\">");
    assert_eq!(
        tokens[0],
        start("a", vec![Attribute::new("href", "?a=1&b=2&copy=3")])
    );
}

#[test]
fn test_lone_less_than_is_text() {
    assert_eq!(tokenize("1 < 2"), vec![text("1 < 2"), Token::EndOfFile]);
    assert_eq!(tokenize("a <"), vec![text("a <"), Token::EndOfFile]);
}

#[test]
fn test_script_content_is_raw_text() {
    let tokens = tokenize("<script>if (a < b && c) { x = \"</p>\"; }</script>");
    assert_eq!(
        tokens,
        vec![
            start("script", vec![]),
            text("if (a < b && c) { x = \"</p>\"; }"),
            end("script"),
            Token::EndOfFile
        ]
    );
}

#[test]
fn test_style_end_tag_is_case_insensitive() {
    let tokens = tokenize("<style>p{}</STYLE>:x:");
    assert_eq!(tokens[1], text("p{}"));
    assert_eq!(tokens[2], end("style"));
    assert_eq!(tokens[3], text(":x:"));
}

#[test]
fn test_title_decodes_references_but_not_tags() {
    let tokens = tokenize("<title>a &amp; <b></title>");
    assert_eq!(tokens[1], text("a & <b>"));
    assert_eq!(tokens[2], end("title"));
}

#[test]
fn test_unterminated_raw_text_stays_in_state() {
    let mut tokenizer = HTMLTokenizer::new("<textarea>unfinished");
    tokenizer.run();
    assert_eq!(tokenizer.state(), TokenizerState::Rcdata);
    assert_eq!(tokenizer.state().to_string(), "Rcdata");
    let tokens = tokenizer.into_tokens();
    assert_eq!(tokens[1], text("unfinished"));
}

#[test]
fn test_newlines_are_normalized() {
    assert_eq!(tokenize("a\r\nb\rc"), vec![text("a\nb\nc"), Token::EndOfFile]);
}

#[test]
fn test_eof_inside_tag_drops_tag() {
    assert_eq!(tokenize("x<div class="), vec![text("x"), Token::EndOfFile]);
}
