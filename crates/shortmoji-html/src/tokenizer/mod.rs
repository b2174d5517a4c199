//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)

mod character_reference;
mod token;
#[allow(clippy::module_inception)]
mod tokenizer;

pub use token::Token;
pub use tokenizer::{HTMLTokenizer, TokenizerState};
