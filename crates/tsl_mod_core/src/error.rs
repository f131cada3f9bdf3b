//! Error types shared by the core helpers.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (reading a mod list, a screenshot, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A tree path was empty, absolute, or contained `.`/`..` segments.
    #[error("Invalid tree path: '{0}'")]
    InvalidPath(String),

    /// The node passed to a tree operation was detached or is the wrong kind.
    #[error("Invalid tree node: {0}")]
    InvalidNode(String),

    /// An entry with the same (case-insensitive) name already exists.
    #[error("Entry already exists: '{0}'")]
    AlreadyExists(String),

    /// A directory cannot be moved into itself or one of its descendants.
    #[error("Cannot move '{from}' into '{to}'")]
    InvalidMove { from: String, to: String },

    /// A `modlist.txt` line could not be understood.
    #[error("Invalid mod list {path}: {message}")]
    InvalidModList { path: Utf8PathBuf, message: String },
}
