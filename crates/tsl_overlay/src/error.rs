//! Error types for override resolution and hide/unhide renames.
//!
//! Resolution itself never fails: unreadable files and directories are skipped
//! with a warning. These errors come from the rename operations in
//! [`hidden`](crate::hidden).

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (rename, metadata).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A mod directory is missing or not a directory.
    #[error("Invalid override source: {0}")]
    InvalidSource(Utf8PathBuf),

    /// The path has no file name to add or strip the hidden suffix on.
    #[error("Cannot toggle hidden state of {0}")]
    NotHideable(Utf8PathBuf),

    /// Renaming would overwrite an existing file.
    #[error("Rename target already exists: {0}")]
    TargetExists(Utf8PathBuf),
}
