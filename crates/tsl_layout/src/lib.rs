//! Layout checking and normalization of KotOR II mod archives.
//!
//! Mods are distributed in every imaginable shape: wrapped in an extra folder,
//! as loose files, as TSLPatcher bundles, or already in the game's layout. This
//! crate loads an archive (or an extracted directory) into a
//! [`FileTree`](tsl_mod_core::FileTree), classifies it with [`classify`], and
//! rewrites fixable layouts with [`fix`] before the result is written to the
//! mod's install directory.
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use tsl_layout::{fix, FixOutcome, ModArchive};
//!
//! # fn main() -> tsl_layout::Result<()> {
//! let mut archive = ModArchive::open(Utf8Path::new("HiResTextures.zip"))?;
//! let mut tree = archive.to_tree()?;
//! match fix(&mut tree, None)? {
//!     FixOutcome::ChoiceRequired(request) => {
//!         println!("{}", request.prompt());
//!         for option in &request.options {
//!             println!("  {option}");
//!         }
//!     }
//!     _ => {
//!         archive.install(&tree, Utf8Path::new("mods/HiResTextures"))?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod checker;
pub mod error;
pub mod fixer;

pub use archive::{install_tree, load_directory, safe_join, write_tree, ModArchive};
pub use checker::{
    classify, is_ignored, Verdict, DIALOG_TABLE_NAME, IGNORED_EXTENSIONS, PATCH_BUNDLE_NAME,
    RESTRICTED_DIRS,
};
pub use error::{Error, Result};
pub use fixer::{cleanup_root, fix, ChoiceKind, ChoiceRequest, FixAction, FixOutcome};
