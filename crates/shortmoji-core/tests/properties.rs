//! Property tests for normalization and substitution.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use serde_json::{Map, Value};
use shortmoji_core::{
    DataSource, ensure_colon, load_alias_map, load_emoji_map, normalize_emoji_data,
    replace_shortcodes,
};

const PIECES: [&str; 9] = [
    ":smile:",
    ":",
    "smile",
    " ",
    ":+1:",
    ":unknown_x:",
    "::",
    "a",
    "\u{1F604}",
];

fn build_text(picks: Vec<u8>) -> String {
    picks
        .into_iter()
        .map(|pick| PIECES[usize::from(pick) % PIECES.len()])
        .collect()
}

#[quickcheck]
fn prop_word_keys_register_both_forms(mut key: String) -> TestResult {
    key.retain(|c| c.is_ascii_alphanumeric() || c == '_');
    if key.is_empty() {
        return TestResult::discard();
    }
    let mut data = Map::new();
    let _ = data.insert(key.clone(), Value::String("x".to_string()));
    let map = normalize_emoji_data(&Value::Object(data));
    TestResult::from_bool(
        map.len() == 2 && map.get(&key) == Some("x") && map.get(&ensure_colon(&key)) == Some("x"),
    )
}

#[quickcheck]
fn prop_substitution_is_idempotent(picks: Vec<u8>) -> bool {
    let emoji = load_emoji_map(&DataSource::Bundled);
    let aliases = load_alias_map(&DataSource::Bundled);
    let text = build_text(picks);
    let once = replace_shortcodes(&text, &emoji, Some(&aliases)).into_owned();
    let twice = replace_shortcodes(&once, &emoji, Some(&aliases));
    twice == once
}

#[quickcheck]
fn prop_unknown_shortcodes_survive(n: u32, prefix: u8) -> bool {
    let emoji = load_emoji_map(&DataSource::Bundled);
    let text = format!("{} :zz_unknown_{n}: end", build_text(vec![prefix]));
    let replaced = replace_shortcodes(&text, &emoji, None);
    replaced.contains(&format!(":zz_unknown_{n}:"))
}
