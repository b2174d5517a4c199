use shortmoji_dom::Attribute;
use strum_macros::Display;

use super::character_reference::{CharacterReference, consume_character_reference};
use super::token::Token;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
/// The less-than-sign and end-tag-name sub-states of RCDATA and RAWTEXT are
/// folded into a lookahead, and comments use a single state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    Rcdata,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RawText,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
}

/// A start or end tag under construction.
#[derive(Debug, Default)]
struct TagInProgress {
    name: String,
    is_end: bool,
    self_closing: bool,
    attributes: Vec<Attribute>,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// This struct maintains the state machine for tokenizing HTML input into tokens.
pub struct HTMLTokenizer {
    state: TokenizerState,
    input: Vec<char>,
    current_pos: usize,
    current_input_character: Option<char>,
    // When true, the next iteration of the main loop will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    reconsume: bool,
    at_eof: bool,
    current_tag: Option<TagInProgress>,
    comment_data: String,
    doctype_data: String,
    pending_text: String,
    token_stream: Vec<Token>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    last_start_tag_name: Option<String>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream):
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines."
    #[must_use]
    pub fn new(input: &str) -> Self {
        // "The initial state is the data state."
        Self {
            state: TokenizerState::Data,
            input: normalize_newlines(input),
            current_pos: 0,
            current_input_character: None,
            reconsume: false,
            at_eof: false,
            current_tag: None,
            comment_data: String::new(),
            doctype_data: String::new(),
            pending_text: String::new(),
            token_stream: Vec::new(),
            last_start_tag_name: None,
        }
    }

    /// The state the machine is currently in.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Run the state machine until the end-of-file token has been emitted.
    pub fn run(&mut self) {
        while !self.at_eof {
            // The markup declaration open state looks ahead instead of
            // consuming a character.
            if self.state == TokenizerState::MarkupDeclarationOpen {
                self.handle_markup_declaration_open_state();
                continue;
            }

            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_input_character = self.consume();
            }

            match self.state {
                TokenizerState::Data => self.handle_data_state(),
                TokenizerState::Rcdata | TokenizerState::RawText => self.handle_text_only_state(),
                TokenizerState::TagOpen => self.handle_tag_open_state(),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
                TokenizerState::TagName => self.handle_tag_name_state(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
                TokenizerState::AttributeName => self.handle_attribute_name_state(),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted_state('"');
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted_state('\'');
                }
                TokenizerState::AttributeValueUnquoted => {
                    self.handle_attribute_value_unquoted_state();
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted_state();
                }
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
                TokenizerState::BogusComment => self.handle_bogus_comment_state(),
                TokenizerState::Comment => self.handle_comment_state(),
                TokenizerState::Doctype => self.handle_doctype_state(),
                TokenizerState::MarkupDeclarationOpen => {}
            }
        }
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after run() to get the tokens for the parser.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    // =========================================================================
    // Text states
    // =========================================================================

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => self.consume_character_reference(false),
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.pending_text.push(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    /// and [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    ///
    /// Only an "appropriate end tag token" leaves these states; any other `<`
    /// is text.
    fn handle_text_only_state(&mut self) {
        match self.current_input_character {
            Some('&') if self.state == TokenizerState::Rcdata => {
                self.consume_character_reference(false);
            }
            Some('<') if self.appropriate_end_tag_follows() => {
                self.switch_to(TokenizerState::TagOpen);
            }
            None => self.emit_eof(),
            Some(c) => self.pending_text.push(c),
        }
    }

    // =========================================================================
    // Tag states
    // =========================================================================

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the
            // empty string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(TagInProgress::default());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - Create a comment token whose data is the
            // empty string. Reconsume in the bogus comment state."
            Some('?') => {
                self.comment_data.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - Emit a U+003C LESS-THAN SIGN character token and an
            // end-of-file token."
            None => {
                self.pending_text.push('<');
                self.emit_eof();
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token.
            // Reconsume in the data state."
            Some(_) => {
                self.pending_text.push('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = Some(TagInProgress {
                    is_end: true,
                    ..TagInProgress::default()
                });
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name
            // parse error. Switch to the data state."
            Some('>') => self.switch_to(TokenizerState::Data),
            None => {
                self.pending_text.push_str("</");
                self.emit_eof();
            }
            Some(_) => {
                self.comment_data.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            // "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
            None => self.emit_eof(),
            // "ASCII upper alpha - Append the lowercase version of the current
            // input character to the current tag token's tag name."
            Some(c) => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.name.push(c.to_ascii_lowercase());
                }
            }
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=) - Start a new attribute in the current tag
            // token. Set that attribute's name to the current input character."
            Some('=') => {
                self.start_attribute("=");
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_attribute("");
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some('\t' | '\n' | '\x0C' | ' ' | '/' | '>') | None => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some(c) => {
                if let Some(attr) = self.current_attribute() {
                    attr.name.push(c.to_ascii_lowercase());
                }
            }
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => self.emit_current_tag(),
            None => self.emit_eof(),
            Some(_) => {
                self.start_attribute("");
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-attribute-value
            // parse error. Switch to the data state. Emit the current tag token."
            Some('>') => self.emit_current_tag(),
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// and [§ 13.2.5.37](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    /// attribute value (quoted) states.
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => self.consume_character_reference(true),
            None => self.emit_eof(),
            Some(c) => self.push_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => self.consume_character_reference(true),
            Some('>') => self.emit_current_tag(),
            None => self.emit_eof(),
            Some(c) => self.push_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => self.emit_current_tag(),
            None => self.emit_eof(),
            // "missing-whitespace-between-attributes parse error. Reconsume in
            // the before attribute name state."
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "Set the self-closing flag of the current tag token. Switch to the
            // data state. Emit the current tag token."
            Some('>') => {
                if let Some(tag) = self.current_tag.as_mut() {
                    tag.self_closing = true;
                }
                self.emit_current_tag();
            }
            None => self.emit_eof(),
            Some(_) => self.reconsume_in(TokenizerState::BeforeAttributeName),
        }
    }

    // =========================================================================
    // Comment and DOCTYPE states
    // =========================================================================

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn handle_markup_declaration_open_state(&mut self) {
        // "Two U+002D HYPHEN-MINUS characters (-) - Consume those two characters,
        // create a comment token whose data is the empty string, and switch to
        // the comment start state."
        if self.next_few_characters_are("--") {
            self.current_pos += 2;
            self.comment_data.clear();

            // [§ 13.2.5.43](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
            // `<!-->` and `<!--->` are abruptly closed empty comments.
            if self.next_few_characters_are(">") {
                self.current_pos += 1;
                self.emit_comment();
            } else if self.next_few_characters_are("->") {
                self.current_pos += 2;
                self.emit_comment();
            } else {
                self.switch_to(TokenizerState::Comment);
            }
        }
        // "ASCII case-insensitive match for the word "DOCTYPE" - Consume those
        // characters and switch to the DOCTYPE state."
        else if self.next_few_characters_are_ignore_case("doctype") {
            self.current_pos += "doctype".len();
            self.doctype_data.clear();
            self.switch_to(TokenizerState::Doctype);
        }
        // "Anything else - This is an incorrectly-opened-comment parse error.
        // Create a comment token whose data is the empty string. Switch to the
        // bogus comment state (don't consume anything in the current state)."
        else {
            self.comment_data.clear();
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('-') if self.next_few_characters_are("->") => {
                self.current_pos += 2;
                self.emit_comment();
            }
            // "EOF - This is an eof-in-comment parse error. Emit the current
            // comment token. Emit an end-of-file token."
            None => {
                self.emit_comment();
                self.emit_eof();
            }
            Some(c) => self.comment_data.push(c),
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.emit_comment(),
            None => {
                self.emit_comment();
                self.emit_eof();
            }
            Some(c) => self.comment_data.push(c),
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    ///
    /// Public and system identifiers are not modelled; everything up to `>`
    /// is collected and the first word becomes the name.
    fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => self.emit_doctype(),
            None => {
                self.emit_doctype();
                self.emit_eof();
            }
            Some(c) => self.doctype_data.push(c),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// "Switch to the X state"
    const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// "Consume the next input character"
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.current_pos).copied();
        if c.is_some() {
            self.current_pos += 1;
        }
        c
    }

    /// "If the next few characters are..."
    fn next_few_characters_are(&self, target: &str) -> bool {
        let mut pos = self.current_pos;
        for expected in target.chars() {
            if self.input.get(pos) != Some(&expected) {
                return false;
            }
            pos += 1;
        }
        true
    }

    /// Case-insensitive lookahead; `target` must be lowercase ASCII.
    fn next_few_characters_are_ignore_case(&self, target: &str) -> bool {
        let mut pos = self.current_pos;
        for expected in target.chars() {
            match self.input.get(pos) {
                Some(c) if c.to_ascii_lowercase() == expected => pos += 1,
                _ => return false,
            }
        }
        true
    }

    /// [§ 13.2.5 appropriate end tag token](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-end-tag-token)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer." Checked by looking past the `<` for `/name` followed by
    /// whitespace, `/` or `>`.
    fn appropriate_end_tag_follows(&self) -> bool {
        let Some(name) = self.last_start_tag_name.as_deref() else {
            return false;
        };
        if self.input.get(self.current_pos) != Some(&'/') {
            return false;
        }
        let mut pos = self.current_pos + 1;
        for expected in name.chars() {
            match self.input.get(pos) {
                Some(c) if c.to_ascii_lowercase() == expected => pos += 1,
                _ => return false,
            }
        }
        matches!(self.input.get(pos), Some(&c) if is_whitespace_char(c) || c == '/' || c == '>')
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// The `&` has been consumed. A resolved reference is appended to the
    /// text or attribute value; otherwise the `&` is kept literally.
    fn consume_character_reference(&mut self, in_attribute: bool) {
        let resolved = consume_character_reference(&self.input[self.current_pos..], in_attribute);
        let text = match resolved {
            Some(CharacterReference { text, consumed }) => {
                self.current_pos += consumed;
                text
            }
            None => "&".to_string(),
        };

        if in_attribute {
            for c in text.chars() {
                self.push_attribute_value(c);
            }
        } else {
            self.pending_text.push_str(&text);
        }
    }

    fn start_attribute(&mut self, name: &str) {
        if let Some(tag) = self.current_tag.as_mut() {
            tag.attributes.push(Attribute::new(name, ""));
        }
    }

    fn current_attribute(&mut self) -> Option<&mut Attribute> {
        self.current_tag.as_mut().and_then(|tag| tag.attributes.last_mut())
    }

    fn push_attribute_value(&mut self, c: char) {
        if let Some(attr) = self.current_attribute() {
            attr.value.push(c);
        }
    }

    /// Character tokens are buffered and emitted as one [`Token::Text`].
    fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let data = std::mem::take(&mut self.pending_text);
            self.token_stream.push(Token::Text { data });
        }
    }

    /// "Emit the current tag token", then switch to the data state, or to
    /// the text-only state the new element requires.
    fn emit_current_tag(&mut self) {
        self.switch_to(TokenizerState::Data);
        let Some(tag) = self.current_tag.take() else {
            return;
        };
        self.flush_text();

        if tag.is_end {
            self.token_stream.push(Token::EndTag { name: tag.name });
            return;
        }

        // "When the user agent leaves the attribute name state ... if there is
        // already an attribute on the token with the exact same name, then this
        // is a duplicate-attribute parse error and the new attribute must be
        // removed from the token."
        let mut attributes: Vec<Attribute> = Vec::with_capacity(tag.attributes.len());
        for attr in tag.attributes {
            if !attributes.iter().any(|seen| seen.name == attr.name) {
                attributes.push(attr);
            }
        }

        // [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
        if let Some(state) = text_only_state_for(&tag.name) {
            self.switch_to(state);
        }
        self.last_start_tag_name = Some(tag.name.clone());
        self.token_stream.push(Token::StartTag {
            name: tag.name,
            self_closing: tag.self_closing,
            attributes,
        });
    }

    fn emit_comment(&mut self) {
        self.flush_text();
        let data = std::mem::take(&mut self.comment_data);
        self.token_stream.push(Token::Comment { data });
        self.switch_to(TokenizerState::Data);
    }

    fn emit_doctype(&mut self) {
        self.flush_text();
        let name = self
            .doctype_data
            .split_ascii_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        self.doctype_data.clear();
        self.token_stream.push(Token::Doctype { name });
        self.switch_to(TokenizerState::Data);
    }

    /// "Emit an end-of-file token." Any tag still under construction is dropped.
    fn emit_eof(&mut self) {
        self.current_tag = None;
        self.flush_text();
        self.token_stream.push(Token::EndOfFile);
        self.at_eof = true;
    }
}

/// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
///
/// Elements whose content the tree builder hands back to the tokenizer as
/// RCDATA or RAWTEXT. Script data is tokenized as RAWTEXT.
fn text_only_state_for(tag_name: &str) -> Option<TokenizerState> {
    match tag_name {
        "title" | "textarea" => Some(TokenizerState::Rcdata),
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
            Some(TokenizerState::RawText)
        }
        _ => None,
    }
}

/// "tab, line feed, form feed, space"
const fn is_whitespace_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | ' ')
}

/// [§ 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
///
/// "To normalize newlines in a string, replace every U+000D CR U+000A LF code
/// point pair with a single U+000A LF code point, and then replace every
/// remaining U+000D CR code point with a U+000A LF code point."
fn normalize_newlines(input: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            let _ = chars.next_if_eq(&'\n');
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}
