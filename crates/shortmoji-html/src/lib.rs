//! HTML tokenizer, tree builder and serializer for shortmoji.
//!
//! # Scope
//!
//! This crate turns rendered-Markdown HTML into a [`shortmoji_dom::DomTree`]
//! and back:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, tag, attribute, comment and DOCTYPE states
//!   - Numeric and common named character references
//! - **Fragment Tree Builder** - a stack of open elements with void
//!   elements, implied `</p>` and `</li>`, and end-tag recovery
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!
//! # Not Yet Implemented
//!
//! - Insertion modes (no implied `<html>`, `<head>` or `<body>`)
//! - Table, form and template handling
//! - The adoption agency algorithm

/// Fragment tree construction.
pub mod parser;
/// HTML fragment serialization.
pub mod serialize;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, format_tree, parse_fragment, print_tree};
pub use serialize::{serialize_children, serialize_node};
pub use tokenizer::{HTMLTokenizer, Token};
