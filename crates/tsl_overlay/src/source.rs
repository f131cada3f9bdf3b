//! Override directories contributing to the merged listing.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tsl_mod_core::{find_dir_case_insensitive, folder_path, CanonicalFolder};

use crate::error::{Error, Result};

/// Label of the game's own `Override` directory.
pub const GAME_OVERRIDE_LABEL: &str = "Game Override";

const MOD_LABEL_PREFIX: &str = "Mod: ";

/// A labelled directory whose files take part in override resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideSource {
    /// Shown in listings (`Mod: <name>` or `Game Override`).
    pub label: String,
    /// Directory scanned recursively.
    pub root: Utf8PathBuf,
}

impl OverrideSource {
    pub fn new(label: impl Into<String>, root: Utf8PathBuf) -> Self {
        Self {
            label: label.into(),
            root,
        }
    }

    /// The `override` folder of an installed mod, found case-insensitively.
    ///
    /// Returns `Ok(None)` when the mod ships no override folder.
    pub fn from_mod_dir(mod_dir: &Utf8Path) -> Result<Option<Self>> {
        if !mod_dir.is_dir() {
            return Err(Error::InvalidSource(mod_dir.to_path_buf()));
        }
        let name = mod_dir.file_name().unwrap_or(mod_dir.as_str());
        Ok(
            find_dir_case_insensitive(mod_dir, CanonicalFolder::Override.name())
                .map(|root| Self::new(format!("{MOD_LABEL_PREFIX}{name}"), root)),
        )
    }

    /// The `Override` folder of a game installation.
    pub fn game_override(game_dir: &Utf8Path) -> Self {
        Self::new(
            GAME_OVERRIDE_LABEL,
            folder_path(game_dir, CanonicalFolder::Override),
        )
    }

    /// The mod name for mod sources, the label otherwise.
    pub fn display_name(&self) -> &str {
        self.label
            .strip_prefix(MOD_LABEL_PREFIX)
            .unwrap_or(&self.label)
    }
}

/// Override sources of the given mod directories, keeping their order.
///
/// Mods without an override folder are skipped; unreadable mod directories are
/// skipped with a warning.
pub fn discover_sources(mod_dirs: &[Utf8PathBuf]) -> Vec<OverrideSource> {
    mod_dirs
        .iter()
        .filter_map(|dir| match OverrideSource::from_mod_dir(dir) {
            Ok(Some(source)) => Some(source),
            Ok(None) => {
                tracing::debug!("Mod {} has no override folder", dir);
                None
            }
            Err(e) => {
                tracing::warn!("Skipping mod directory: {}", e);
                None
            }
        })
        .collect()
}
