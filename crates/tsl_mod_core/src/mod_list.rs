//! Reading of MO2-style `modlist.txt` profiles.
//!
//! Each non-comment line names one mod, prefixed by its state: `+` enabled,
//! `-` disabled, `*` unmanaged (a game DLC or foreign file the manager does not
//! own). The first line is the highest-priority mod. Names ending in
//! `_separator` are visual separators, not mods.

use crate::error::{Error, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::fs;

const SEPARATOR_SUFFIX: &str = "_separator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModState {
    Enabled,
    Disabled,
    Unmanaged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModListEntry {
    pub name: String,
    pub state: ModState,
}

impl ModListEntry {
    pub fn is_separator(&self) -> bool {
        self.name.ends_with(SEPARATOR_SUFFIX)
    }
}

/// A parsed mod list, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModList {
    entries: Vec<ModListEntry>,
}

impl ModList {
    pub fn read(path: &Utf8Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(path, &contents)
    }

    /// Parse `contents`; `path` is only used in error messages.
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (index, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let invalid = |message: String| Error::InvalidModList {
                path: path.to_path_buf(),
                message: format!("line {}: {}", index + 1, message),
            };

            let mut chars = line.chars();
            let state = match chars.next() {
                Some('+') => ModState::Enabled,
                Some('-') => ModState::Disabled,
                Some('*') => ModState::Unmanaged,
                _ => return Err(invalid(format!("missing state prefix in '{}'", line))),
            };
            let name = chars.as_str().trim();
            if name.is_empty() {
                return Err(invalid("empty mod name".to_string()));
            }

            entries.push(ModListEntry {
                name: name.to_string(),
                state,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ModListEntry] {
        &self.entries
    }

    /// Names of enabled mods (separators excluded), highest priority first.
    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.state == ModState::Enabled && !entry.is_separator())
            .map(|entry| entry.name.as_str())
    }

    /// Directories of the active mods under `mods_dir`, highest priority first.
    ///
    /// Entries that are not a plain folder name, and mods whose directory is
    /// missing, are skipped with a warning.
    pub fn active_mod_dirs(&self, mods_dir: &Utf8Path) -> Vec<Utf8PathBuf> {
        self.active()
            .filter_map(|name| {
                if !is_folder_name(name) {
                    tracing::warn!("Skipping mod list entry '{}': not a folder name", name);
                    return None;
                }
                let dir = mods_dir.join(name);
                if dir.is_dir() {
                    Some(dir)
                } else {
                    tracing::warn!("Active mod '{}' has no directory at {}", name, dir);
                    None
                }
            })
            .collect()
    }
}

fn is_folder_name(name: &str) -> bool {
    let mut components = Utf8Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Utf8Component::Normal(_)), None)
    ) && !name.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
# This file was automatically generated by Mod Organizer.
+High Priority
-Disabled Mod
+Textures_separator
*DLC: Something

+Low Priority
";

    #[test]
    fn test_parse_states_and_order() {
        let list = ModList::parse(Utf8Path::new("modlist.txt"), SAMPLE).unwrap();
        let states: Vec<_> = list.entries().iter().map(|e| e.state).collect();
        assert_eq!(
            states,
            vec![
                ModState::Enabled,
                ModState::Disabled,
                ModState::Enabled,
                ModState::Unmanaged,
                ModState::Enabled
            ]
        );
        assert!(list.entries()[2].is_separator());
    }

    #[test]
    fn test_active_skips_disabled_and_separators() {
        let list = ModList::parse(Utf8Path::new("modlist.txt"), SAMPLE).unwrap();
        let active: Vec<_> = list.active().collect();
        assert_eq!(active, vec!["High Priority", "Low Priority"]);
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        let err = ModList::parse(Utf8Path::new("modlist.txt"), "+ok\nbroken\n").unwrap_err();
        match err {
            Error::InvalidModList { message, .. } => assert!(message.starts_with("line 2")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(ModList::parse(Utf8Path::new("modlist.txt"), "+   \n").is_err());
    }

    #[test]
    fn test_active_mod_dirs_skips_missing() {
        let dir = tempdir().unwrap();
        let mods = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::create_dir(mods.join("Present")).unwrap();

        let list = ModList::parse(Utf8Path::new("modlist.txt"), "+Missing\n+Present\n").unwrap();
        assert_eq!(list.active_mod_dirs(&mods), vec![mods.join("Present")]);
    }

    #[test]
    fn test_active_mod_dirs_skips_paths() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let mods = root.join("a/mods");
        fs::create_dir_all(mods.join("a/b")).unwrap();
        fs::create_dir_all(root.join("x")).unwrap();
        fs::create_dir(mods.join("Good")).unwrap();

        let list =
            ModList::parse(Utf8Path::new("modlist.txt"), "+../../x\n+a/b\n+..\n+Good\n").unwrap();
        assert_eq!(list.active_mod_dirs(&mods), vec![mods.join("Good")]);
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("modlist.txt")).unwrap();
        fs::write(&path, SAMPLE).unwrap();
        assert_eq!(ModList::read(&path).unwrap().entries().len(), 5);
        assert!(ModList::read(&path.with_file_name("missing.txt")).is_err());
    }
}
