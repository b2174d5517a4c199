//! [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
//!
//! A recursive-descent parser for selector lists:
//!
//! ```text
//! <selector-list>     = <complex-selector>#
//! <complex-selector>  = <compound-selector> [ <combinator>? <compound-selector> ]*
//! <compound-selector> = [ <type-selector>? <subclass-selector>* ]!
//! <combinator>        = '>' | '+' | '~' | <whitespace>
//! ```

use super::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorError,
    SelectorList, SimpleSelector,
};

/// Parse a comma-separated selector list, as accepted by `Element.matches()`.
///
/// # Errors
///
/// Returns a [`SelectorError`] if any member of the list is invalid.
/// [§ 4.1](https://www.w3.org/TR/selectors-4/#grouping): "if just one of
/// these selectors were invalid, the entire selector list would be invalid."
pub fn parse_selector_list(raw: &str) -> Result<SelectorList, SelectorError> {
    let mut parser = SelectorParser::new(raw);
    let list = parser.parse_list()?;
    match parser.peek() {
        None => Ok(list),
        Some(found) => Err(parser.unexpected(found)),
    }
}

struct SelectorParser {
    chars: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    fn new(raw: &str) -> Self {
        Self {
            chars: raw.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    const fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::UnexpectedChar {
            found,
            offset: self.pos,
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), SelectorError> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => {
                self.pos -= 1;
                Err(self.unexpected(c))
            }
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    /// Skip whitespace, reporting whether any was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos != start
    }

    /// Parses members until end of input or an unmatched `)`.
    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = vec![self.parse_complex()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            selectors.push(self.parse_complex()?);
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let _ = self.skip_whitespace();
        if matches!(self.peek(), None | Some(',' | ')')) {
            return Err(SelectorError::Empty);
        }

        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',' | ')') => break,
                Some(c @ ('>' | '+' | '~')) => {
                    self.pos += 1;
                    let _ = self.skip_whitespace();
                    if matches!(self.peek(), None | Some(',' | ')')) {
                        return Err(SelectorError::DanglingCombinator(c));
                    }
                    match c {
                        '>' => Combinator::Child,
                        '+' => Combinator::NextSibling,
                        _ => Combinator::SubsequentSibling,
                    }
                }
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(found) => return Err(self.unexpected(found)),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        // Build the chain right-to-left: for `A > B C` we have compounds
        // [A, B, C] and combinators [Child, Descendant]; the result is
        // subject C with [(Descendant, B), (Child, A)].
        let subject = compounds.pop().ok_or(SelectorError::Empty)?;
        let combinators = combinators.into_iter().rev().zip(compounds.into_iter().rev()).collect();

        Ok(ComplexSelector {
            subject,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut simple_selectors = Vec::new();

        // "<type-selector>?" may only appear first.
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                simple_selectors.push(SimpleSelector::Universal);
            }
            Some(c) if starts_identifier(c, self.peek_at(1)) => {
                let name = self.parse_identifier()?;
                simple_selectors.push(SimpleSelector::Type(name.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            let simple = match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    SimpleSelector::Class(self.parse_identifier()?)
                }
                Some('#') => {
                    self.pos += 1;
                    SimpleSelector::Id(self.parse_name()?)
                }
                Some('[') => {
                    self.pos += 1;
                    SimpleSelector::Attribute(self.parse_attribute()?)
                }
                Some(':') => {
                    self.pos += 1;
                    self.parse_pseudo()?
                }
                _ => break,
            };
            simple_selectors.push(simple);
        }

        if simple_selectors.is_empty() {
            return Err(match self.peek() {
                None => SelectorError::UnexpectedEnd,
                Some(c @ ('>' | '+' | '~')) => SelectorError::DanglingCombinator(c),
                Some(found) => self.unexpected(found),
            });
        }
        Ok(CompoundSelector { simple_selectors })
    }

    /// [§ 4.3.11 consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn parse_identifier(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(c) if starts_identifier(c, self.peek_at(1)) => self.parse_name(),
            Some(found) => Err(self.unexpected(found)),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    /// A run of ident code points (and escapes); may start with a digit.
    fn parse_name(&mut self) -> Result<String, SelectorError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                let escaped = self.bump().ok_or(SelectorError::UnexpectedEnd)?;
                name.push(escaped);
            } else if is_ident_char(c) {
                self.pos += 1;
                name.push(c);
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(match self.peek() {
                Some(found) => self.unexpected(found),
                None => SelectorError::UnexpectedEnd,
            });
        }
        Ok(name)
    }

    /// `[` has been consumed.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        let _ = self.skip_whitespace();
        // HTML attribute names are matched case-insensitively; the parser
        // lowercases them, so lowercase here too.
        let name = self.parse_identifier()?.to_ascii_lowercase();
        let _ = self.skip_whitespace();

        let operator = match self.bump() {
            Some(']') => return Ok(AttributeSelector::Exists(name)),
            Some('=') => '=',
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                self.expect('=')?;
                op
            }
            Some(found) => {
                self.pos -= 1;
                return Err(self.unexpected(found));
            }
            None => return Err(SelectorError::UnexpectedEnd),
        };

        let _ = self.skip_whitespace();
        let value = self.parse_attribute_value()?;
        let _ = self.skip_whitespace();
        self.expect(']')?;

        Ok(match operator {
            '=' => AttributeSelector::Equals(name, value),
            '~' => AttributeSelector::Includes(name, value),
            '|' => AttributeSelector::DashMatch(name, value),
            '^' => AttributeSelector::PrefixMatch(name, value),
            '$' => AttributeSelector::SuffixMatch(name, value),
            _ => AttributeSelector::SubstringMatch(name, value),
        })
    }

    fn parse_attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => return Ok(value),
                        Some('\\') => {
                            value.push(self.bump().ok_or(SelectorError::UnterminatedString)?);
                        }
                        Some(c) => value.push(c),
                        None => return Err(SelectorError::UnterminatedString),
                    }
                }
            }
            _ => self.parse_identifier(),
        }
    }

    /// `:` has been consumed.
    fn parse_pseudo(&mut self) -> Result<SimpleSelector, SelectorError> {
        // [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
        if self.peek() == Some(':') {
            self.pos += 1;
            let _ = self.parse_identifier()?;
            return Ok(SimpleSelector::NeverMatch);
        }

        let name = self.parse_identifier()?.to_ascii_lowercase();

        if self.peek() == Some('(') {
            self.pos += 1;
            if name != "not" {
                return Err(SelectorError::UnsupportedPseudoClass(name));
            }
            let inner = self.parse_list()?;
            let _ = self.skip_whitespace();
            self.expect(')')?;
            return Ok(SimpleSelector::Not(inner));
        }

        let pseudo = match name.as_str() {
            "root" => PseudoClass::Root,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "empty" => PseudoClass::Empty,
            "link" | "any-link" => PseudoClass::Link,
            // User-action and history states, plus the legacy single-colon
            // pseudo-elements.
            "hover" | "active" | "focus" | "focus-visible" | "focus-within" | "visited"
            | "target" | "checked" | "before" | "after" | "first-line" | "first-letter" => {
                return Ok(SimpleSelector::NeverMatch);
            }
            _ => return Err(SelectorError::UnsupportedPseudoClass(name)),
        };
        Ok(SimpleSelector::PseudoClass(pseudo))
    }
}

/// [§ 4.3.8 would start an identifier](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn starts_identifier(first: char, second: Option<char>) -> bool {
    match first {
        '-' => second.is_some_and(|c| is_ident_start_char(c) || c == '-' || c == '\\'),
        '\\' => second.is_some(),
        c => is_ident_start_char(c),
    }
}

/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}
