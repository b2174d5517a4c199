//! Default emoji and alias data.
//!
//! The packaged documents are compiled into the crate. A data directory can
//! stand in for them, chosen with [`DATA_DIR_ENV`] or by passing a
//! [`DataSource::Directory`] explicitly. Loading never fails from the
//! caller's point of view: a missing or malformed document is reported once
//! and treated as an empty one.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use shortmoji_common::{Component, warn_once};
use thiserror::Error;

use crate::maps::{AliasMap, EmojiMap};
use crate::normalize::{normalize_aliases, normalize_emoji_data};

/// File name of the emoji table.
pub const EMOJI_DATA_FILE: &str = "emoji-unicodes.json";

/// File name of the alias table.
pub const ALIASES_DATA_FILE: &str = "emoji-aliases.json";

/// Environment variable naming a directory to load data files from.
pub const DATA_DIR_ENV: &str = "SHORTMOJI_DATA_DIR";

const BUNDLED_EMOJI_DATA: &str = include_str!("../data/emoji-unicodes.json");
const BUNDLED_ALIASES_DATA: &str = include_str!("../data/emoji-aliases.json");

/// Where data documents are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DataSource {
    /// The documents compiled into this crate.
    #[default]
    Bundled,
    /// `emoji-unicodes.json` and `emoji-aliases.json` inside a directory.
    Directory(PathBuf),
}

impl DataSource {
    /// [`DataSource::Directory`] if [`DATA_DIR_ENV`] is set and non-empty,
    /// otherwise [`DataSource::Bundled`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(DATA_DIR_ENV))
    }

    /// The choice [`DataSource::from_env`] makes for a given variable value.
    #[must_use]
    pub fn from_env_value(value: Option<OsString>) -> Self {
        match value {
            Some(dir) if !dir.is_empty() => Self::Directory(PathBuf::from(dir)),
            _ => Self::Bundled,
        }
    }

    /// An explicit directory if given, otherwise the choice for the
    /// [`DATA_DIR_ENV`] value.
    #[must_use]
    pub fn with_override(dir: Option<&Path>, env_value: Option<OsString>) -> Self {
        dir.map_or_else(
            || Self::from_env_value(env_value),
            |dir| Self::Directory(dir.to_path_buf()),
        )
    }
}

/// Failure to read one data document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The contents are not JSON.
    #[error("cannot parse {}: {source}", path.display())]
    Json {
        /// The document that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Read and parse one JSON document.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Json`] if it is not valid JSON.
pub fn read_data_file(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_document(source: &DataSource, file_name: &str) -> Result<Value, LoadError> {
    match source {
        DataSource::Bundled => {
            let text = if file_name == EMOJI_DATA_FILE {
                BUNDLED_EMOJI_DATA
            } else {
                BUNDLED_ALIASES_DATA
            };
            serde_json::from_str(text).map_err(|source| LoadError::Json {
                path: PathBuf::from(file_name),
                source,
            })
        }
        DataSource::Directory(dir) => read_data_file(&dir.join(file_name)),
    }
}

fn load_or_empty(source: &DataSource, file_name: &str) -> Value {
    read_document(source, file_name).unwrap_or_else(|err| {
        warn_once(Component::Loader, &format!("{err}; using empty data"));
        Value::Object(Map::new())
    })
}

/// The raw emoji document from `source`, or `{}` if it cannot be loaded.
#[must_use]
pub fn load_emoji_data(source: &DataSource) -> Value {
    load_or_empty(source, EMOJI_DATA_FILE)
}

/// The raw alias document from `source`, or `{}` if it cannot be loaded.
#[must_use]
pub fn load_aliases_data(source: &DataSource) -> Value {
    load_or_empty(source, ALIASES_DATA_FILE)
}

/// The packaged emoji document (see [`DataSource::from_env`]).
#[must_use]
pub fn load_default_emoji_data() -> Value {
    load_emoji_data(&DataSource::from_env())
}

/// The packaged alias document (see [`DataSource::from_env`]).
#[must_use]
pub fn load_default_aliases_data() -> Value {
    load_aliases_data(&DataSource::from_env())
}

/// Normalized emoji table from `source`.
#[must_use]
pub fn load_emoji_map(source: &DataSource) -> EmojiMap {
    normalize_emoji_data(&load_emoji_data(source))
}

/// Normalized alias table from `source`.
#[must_use]
pub fn load_alias_map(source: &DataSource) -> AliasMap {
    normalize_aliases(&load_aliases_data(source))
}

/// The packaged emoji document, normalized.
#[must_use]
pub fn load_default_emoji_map() -> EmojiMap {
    normalize_emoji_data(&load_default_emoji_data())
}

/// The packaged alias document, normalized.
#[must_use]
pub fn load_default_alias_map() -> AliasMap {
    normalize_aliases(&load_default_aliases_data())
}
