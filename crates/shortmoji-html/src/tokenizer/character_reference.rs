//! Character reference resolution for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Rendered Markdown only ever carries a handful of named references, so the
//! table below is a small subset of the full list in § 13.5. Names without
//! a trailing semicolon are the legacy forms the standard still accepts.

/// [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp;", "&"),
    ("amp", "&"),
    ("lt;", "<"),
    ("lt", "<"),
    ("gt;", ">"),
    ("gt", ">"),
    ("quot;", "\""),
    ("quot", "\""),
    ("apos;", "'"),
    ("nbsp;", "\u{00A0}"),
    ("nbsp", "\u{00A0}"),
    ("copy;", "\u{00A9}"),
    ("copy", "\u{00A9}"),
    ("reg;", "\u{00AE}"),
    ("reg", "\u{00AE}"),
    ("trade;", "\u{2122}"),
    ("mdash;", "\u{2014}"),
    ("ndash;", "\u{2013}"),
    ("hellip;", "\u{2026}"),
    ("bull;", "\u{2022}"),
    ("middot;", "\u{00B7}"),
    ("lsquo;", "\u{2018}"),
    ("rsquo;", "\u{2019}"),
    ("ldquo;", "\u{201C}"),
    ("rdquo;", "\u{201D}"),
    ("laquo;", "\u{00AB}"),
    ("raquo;", "\u{00BB}"),
    ("cent;", "\u{00A2}"),
    ("pound;", "\u{00A3}"),
    ("euro;", "\u{20AC}"),
    ("yen;", "\u{00A5}"),
    ("sect;", "\u{00A7}"),
    ("para;", "\u{00B6}"),
    ("deg;", "\u{00B0}"),
    ("plusmn;", "\u{00B1}"),
    ("times;", "\u{00D7}"),
    ("divide;", "\u{00F7}"),
    ("minus;", "\u{2212}"),
    ("ne;", "\u{2260}"),
    ("le;", "\u{2264}"),
    ("ge;", "\u{2265}"),
    ("larr;", "\u{2190}"),
    ("rarr;", "\u{2192}"),
    ("uarr;", "\u{2191}"),
    ("darr;", "\u{2193}"),
    ("hearts;", "\u{2665}"),
    ("check;", "\u{2713}"),
];

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set
/// the character reference code to the number in the second column."
const C1_REPLACEMENTS: &[(u32, char)] = &[
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// A resolved reference and how many characters after the `&` it used.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct CharacterReference {
    pub(super) text: String,
    pub(super) consumed: usize,
}

/// Resolve the character reference starting right after an `&`.
///
/// Returns `None` when the input does not form a reference; the caller then
/// keeps the `&` as a literal character.
pub(super) fn consume_character_reference(
    input: &[char],
    in_attribute: bool,
) -> Option<CharacterReference> {
    match input.first() {
        Some('#') => consume_numeric(input),
        Some(c) if c.is_ascii_alphanumeric() => consume_named(input, in_attribute),
        _ => None,
    }
}

/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
///
/// "Consume the maximum number of characters possible, where the consumed
/// characters are one of the identifiers in the named character references
/// table."
fn consume_named(input: &[char], in_attribute: bool) -> Option<CharacterReference> {
    let (name, text) = NAMED_ENTITIES
        .iter()
        .filter(|(name, _)| starts_with(input, name))
        .max_by_key(|(name, _)| name.len())?;

    let consumed = name.chars().count();

    // "If the character reference was consumed as part of an attribute, and
    // the last character matched is not a U+003B SEMICOLON character (;),
    // and the next input character is either a U+003D EQUALS SIGN character
    // (=) or an ASCII alphanumeric, then, for historical reasons, flush code
    // points consumed as a character reference and switch to the return state."
    if in_attribute
        && !name.ends_with(';')
        && input
            .get(consumed)
            .is_some_and(|&c| c == '=' || c.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(CharacterReference {
        text: (*text).to_string(),
        consumed,
    })
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
fn consume_numeric(input: &[char]) -> Option<CharacterReference> {
    let hex = matches!(input.get(1), Some('x' | 'X'));
    let radix = if hex { 16 } else { 10 };
    let digits_start = if hex { 2 } else { 1 };

    let mut code: u32 = 0;
    let mut index = digits_start;
    while let Some(digit) = input.get(index).and_then(|c| c.to_digit(radix)) {
        // Saturate past the Unicode range; the value only needs to stay invalid.
        code = code.saturating_mul(radix).saturating_add(digit);
        index += 1;
    }

    // "absence-of-digits-in-numeric-character-reference parse error ...
    // flush code points consumed as a character reference."
    if index == digits_start {
        return None;
    }

    // "missing-semicolon-after-character-reference parse error" is recovered
    // from by treating the reference as terminated.
    if input.get(index) == Some(&';') {
        index += 1;
    }

    Some(CharacterReference {
        text: numeric_reference_char(code).to_string(),
        consumed: index,
    })
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
fn numeric_reference_char(code: u32) -> char {
    // "If the number is 0x00 ... greater than 0x10FFFF ... a surrogate, ...
    // set the character reference code to 0xFFFD."
    if code == 0 {
        return '\u{FFFD}';
    }
    if let Some(&(_, replacement)) = C1_REPLACEMENTS.iter().find(|(c1, _)| *c1 == code) {
        return replacement;
    }
    char::from_u32(code).unwrap_or('\u{FFFD}')
}

fn starts_with(input: &[char], prefix: &str) -> bool {
    let mut index = 0;
    for expected in prefix.chars() {
        if input.get(index) != Some(&expected) {
            return false;
        }
        index += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str, in_attribute: bool) -> Option<(String, usize)> {
        let chars: Vec<char> = raw.chars().collect();
        consume_character_reference(&chars, in_attribute).map(|r| (r.text, r.consumed))
    }

    #[test]
    fn test_named_reference_prefers_longest_match() {
        assert_eq!(resolve("amp;rest", false), Some(("&".to_string(), 4)));
        assert_eq!(resolve("ampersand", false), Some(("&".to_string(), 3)));
    }

    #[test]
    fn test_legacy_reference_in_attribute_is_literal() {
        assert_eq!(resolve("amp=1", true), None);
        assert_eq!(resolve("copyright", true), None);
        assert_eq!(resolve("amp;x=1", true), Some(("&".to_string(), 4)));
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(resolve("#65;", false), Some(("A".to_string(), 4)));
        assert_eq!(resolve("#x1F600;", false), Some(("\u{1F600}".to_string(), 8)));
        assert_eq!(resolve("#X41", false), Some(("A".to_string(), 4)));
        assert_eq!(resolve("#0;", false), Some(("\u{FFFD}".to_string(), 3)));
        assert_eq!(resolve("#xD800;", false), Some(("\u{FFFD}".to_string(), 7)));
        assert_eq!(resolve("#x110000;", false), Some(("\u{FFFD}".to_string(), 9)));
        assert_eq!(resolve("#x99;", false), Some(("\u{2122}".to_string(), 5)));
    }

    #[test]
    fn test_not_a_reference() {
        assert_eq!(resolve("#;", false), None);
        assert_eq!(resolve("#x;", false), None);
        assert_eq!(resolve("unknown;", false), None);
        assert_eq!(resolve(" ", false), None);
        assert_eq!(resolve("", false), None);
    }
}
