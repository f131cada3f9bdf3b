use std::io;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, fixing or installing a mod layout.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Selection {index} is out of range ({len} options)")]
    SelectionOutOfRange { index: usize, len: usize },

    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    #[error("Archive entry escapes the install directory: '{0}'")]
    UnsafeEntryPath(String),

    #[error(transparent)]
    Core(#[from] tsl_mod_core::Error),
}
