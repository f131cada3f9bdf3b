//! Core shared logic for KotOR II: The Sith Lords mod management.
//!
//! This crate provides the vocabulary shared by the layout checker
//! (`tsl_layout`), the override resolver (`tsl_overlay`) and the `tsl-mod` CLI:
//!
//! - **Canonical folders**: the ten top-level game directories and the file
//!   extensions each one accepts ([`CanonicalFolder`])
//! - **Virtual file trees**: an arena-backed tree used to inspect and rewrite
//!   mod archives before installation ([`FileTree`])
//! - **Save thumbnails**: a decoder for the uncompressed TGA screenshots stored
//!   in save directories ([`decode_tga`])
//! - **Game paths and mod lists**: validation of the game directory and
//!   reading of MO2-style `modlist.txt` profiles

pub mod error;
pub mod file_tree;
pub mod folders;
mod game_path;
pub mod mod_list;
pub mod thumbnail;

pub use error::{Error, Result};
pub use file_tree::{FileEntry, FileSource, FileTree, InsertPolicy, NodeId};
pub use folders::{extension_of, CanonicalFolder};
pub use game_path::{find_dir_case_insensitive, folder_path, is_valid_game_dir, GAME_BINARY};
pub use mod_list::{ModList, ModListEntry, ModState};
pub use thumbnail::{decode_tga, find_save_screenshot, load_save_screenshot, PixelFormat, Thumbnail};
