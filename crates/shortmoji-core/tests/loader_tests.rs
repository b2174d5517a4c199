//! Integration tests for the packaged and directory-backed data loaders.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use shortmoji_core::{
    ALIASES_DATA_FILE, DataSource, EMOJI_DATA_FILE, LoadError, load_alias_map,
    load_aliases_data, load_emoji_data, load_emoji_map, read_data_file,
};
use tempfile::TempDir;

#[test]
fn test_bundled_emoji_data() {
    let map = load_emoji_map(&DataSource::Bundled);
    assert_eq!(map.get(":smile:"), Some("\u{1F604}"));
    assert_eq!(map.get("smile"), Some("\u{1F604}"));
    assert_eq!(map.get("+1"), Some("\u{1F44D}"));
    assert_eq!(map.get("heart"), Some("\u{2764}\u{FE0F}"));
    assert_eq!(map.get("us"), Some("\u{1F1FA}\u{1F1F8}"));
}

#[test]
fn test_bundled_alias_data() {
    let aliases = load_alias_map(&DataSource::Bundled);
    assert_eq!(aliases.get(":thumbsup:"), Some(":+1:"));
    assert_eq!(aliases.get("thumbsup"), Some(":+1:"));
    assert_eq!(aliases.get("uk"), Some(":gb:"));
}

#[test]
fn test_bundled_documents_are_objects() {
    assert!(load_emoji_data(&DataSource::Bundled).is_object());
    assert!(load_aliases_data(&DataSource::Bundled).is_object());
}

#[test]
fn test_data_source_from_env_value() {
    assert_eq!(DataSource::from_env_value(None), DataSource::Bundled);
    assert_eq!(
        DataSource::from_env_value(Some(OsString::new())),
        DataSource::Bundled
    );
    assert_eq!(
        DataSource::from_env_value(Some(OsString::from("/srv/emoji"))),
        DataSource::Directory(PathBuf::from("/srv/emoji"))
    );
}

#[test]
fn test_directory_source() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(EMOJI_DATA_FILE),
        r#"{"wave": "👋", ":ok:": "👌"}"#,
    )
    .unwrap();
    fs::write(dir.path().join(ALIASES_DATA_FILE), r#"{"hi": "wave"}"#).unwrap();

    let source = DataSource::Directory(dir.path().to_path_buf());
    let map = load_emoji_map(&source);
    assert_eq!(map.get("wave"), Some("👋"));
    assert_eq!(map.get(":ok:"), Some("👌"));
    assert!(!map.contains_key("smile"));

    let aliases = load_alias_map(&source);
    assert_eq!(aliases.get(":hi:"), Some(":wave:"));
}

#[test]
fn test_missing_directory_loads_empty() {
    let dir = TempDir::new().unwrap();
    let source = DataSource::Directory(dir.path().join("nowhere"));
    assert_eq!(load_emoji_data(&source), json!({}));
    assert_eq!(load_aliases_data(&source), json!({}));
    assert!(load_emoji_map(&source).is_empty());
}

#[test]
fn test_malformed_document_loads_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(EMOJI_DATA_FILE), "{not json").unwrap();
    let source = DataSource::Directory(dir.path().to_path_buf());
    assert_eq!(load_emoji_data(&source), json!({}));
}

#[test]
fn test_read_data_file_errors() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.json");
    let err = read_data_file(&missing).unwrap_err();
    assert!(matches!(&err, LoadError::Io { path, .. } if *path == missing));
    assert!(err.to_string().starts_with("cannot read "));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "[1, 2").unwrap();
    let err = read_data_file(&broken).unwrap_err();
    assert!(matches!(&err, LoadError::Json { path, .. } if *path == broken));
    assert!(err.to_string().starts_with("cannot parse "));
}

#[test]
fn test_read_data_file_any_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("list.json");
    fs::write(&path, r#"[{"shortcode": "x", "emoji": "y"}]"#).unwrap();
    assert_eq!(
        read_data_file(&path).unwrap(),
        json!([{"shortcode": "x", "emoji": "y"}])
    );
}

#[test]
fn test_explicit_directory_wins_over_env_value() {
    let env = Some(OsString::from("/from/env"));
    assert_eq!(
        DataSource::with_override(Some(Path::new("/from/flag")), env.clone()),
        DataSource::Directory(PathBuf::from("/from/flag"))
    );
    assert_eq!(
        DataSource::with_override(None, env),
        DataSource::Directory(PathBuf::from("/from/env"))
    );
    assert_eq!(DataSource::with_override(None, None), DataSource::Bundled);
}
