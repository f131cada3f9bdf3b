//! Layered override resolver for KotOR II: The Sith Lords mods.
//!
//! Every active mod contributes an `override` folder, layered on top of the
//! game's own `Override` directory. This crate answers which file the game will
//! actually load for each texture path, which textures clash across formats
//! (`tpc` + `txi`, `tpc` + `tga`, ...), and which files have been hidden with
//! the `.mohidden` suffix. It can also hide and unhide files.
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8PathBuf;
//! use tsl_overlay::{discover_sources, OverrideResolver, OverrideSource};
//!
//! let game_dir = Utf8PathBuf::from("C:/Games/KotOR2");
//! let mods = vec![
//!     Utf8PathBuf::from("C:/MO2/mods/High Priority"),
//!     Utf8PathBuf::from("C:/MO2/mods/Low Priority"),
//! ];
//!
//! let listing = OverrideResolver::new(OverrideSource::game_override(&game_dir))
//!     .with_sources(discover_sources(&mods))
//!     .resolve();
//!
//! for row in listing.rows() {
//!     println!("{:2} {} ({})", row.marker(), row.rel_path, row.source);
//! }
//! println!("{}", listing.summary());
//! ```

pub mod error;
pub mod hidden;
pub mod listing;
pub mod resolver;
pub mod source;
pub mod utils;

pub use error::{Error, Result};
pub use hidden::{hide, toggle_hidden, unhide, unhide_all, RenameOutcome};
pub use listing::{format_size, ConflictSeverity, ListingRow, ListingSummary, TextureListing};
pub use resolver::OverrideResolver;
pub use source::{discover_sources, OverrideSource, GAME_OVERRIDE_LABEL};
pub use utils::{HIDDEN_SUFFIX, TEXTURE_EXTENSIONS};
