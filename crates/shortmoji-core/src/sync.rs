//! Provisioning of the packaged data files.
//!
//! Copies `assets/emoji-unicodes.json` and `assets/emoji-aliases.json` from
//! a workspace root into a data directory, normally this crate's `data/`.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::loader::{ALIASES_DATA_FILE, EMOJI_DATA_FILE};

/// Directory under the workspace root holding the source assets.
pub const ASSETS_DIR: &str = "assets";

/// What happened to one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The asset was copied. Paths are relative to the workspace root where
    /// possible.
    Copied {
        /// Source asset.
        from: PathBuf,
        /// Written copy.
        to: PathBuf,
    },
    /// The asset could not be read or written and was left out.
    Skipped {
        /// Source asset that was missing.
        source: PathBuf,
    },
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copied { from, to } => {
                write!(f, "Synced {} -> {}", from.display(), to.display())
            }
            Self::Skipped { source } => write!(f, "Skip missing {}", source.display()),
        }
    }
}

/// A failure that stops provisioning altogether.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The destination directory could not be created.
    #[error("cannot create data directory {}: {source}", path.display())]
    CreateDir {
        /// The directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Copy both data assets from `workspace_root/assets` into `dest_dir`.
///
/// A missing asset is recorded as [`SyncOutcome::Skipped`] and the run
/// continues; outcomes come back in the order the assets were processed.
///
/// # Errors
///
/// Returns [`SyncError::CreateDir`] if `dest_dir` cannot be created.
pub fn sync_data(workspace_root: &Path, dest_dir: &Path) -> Result<Vec<SyncOutcome>, SyncError> {
    fs::create_dir_all(dest_dir).map_err(|source| SyncError::CreateDir {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let assets = workspace_root.join(ASSETS_DIR);
    Ok([EMOJI_DATA_FILE, ALIASES_DATA_FILE]
        .into_iter()
        .map(|name| copy_if_exists(workspace_root, &assets.join(name), &dest_dir.join(name)))
        .collect())
}

fn copy_if_exists(workspace_root: &Path, src: &Path, dest: &Path) -> SyncOutcome {
    let copied = fs::read(src).and_then(|data| {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, data)
    });

    match copied {
        Ok(()) => SyncOutcome::Copied {
            from: relative_to(workspace_root, src),
            to: relative_to(workspace_root, dest),
        },
        Err(_) => SyncOutcome::Skipped {
            source: src.to_path_buf(),
        },
    }
}

fn relative_to(base: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}
