use shortmoji_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// Consecutive character tokens are coalesced into a single [`Token::Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// DOCTYPE token. Only the name is kept.
    Doctype {
        /// "a name"
        name: String,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// "a tag name", lowercased
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes", duplicates removed
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes on end tags are dropped.
    EndTag {
        /// "a tag name", lowercased
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// A run of character tokens.
    Text {
        /// The characters, with character references already resolved.
        data: String,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}
