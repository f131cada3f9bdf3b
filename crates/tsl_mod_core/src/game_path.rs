//! KotOR II installation path validation utilities.

use crate::folders::CanonicalFolder;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Executable that marks a game installation directory.
pub const GAME_BINARY: &str = "swkotor2.exe";

/// Validates if a directory holds a KotOR II installation.
///
/// The executable name is matched case-insensitively.
pub fn is_valid_game_dir(path: &Utf8Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    let Ok(entries) = fs::read_dir(path) else {
        return false;
    };
    entries.flatten().any(|entry| {
        entry.file_type().is_ok_and(|t| t.is_file())
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(GAME_BINARY))
    })
}

/// Find a direct sub-directory of `parent` named `name`, ignoring case.
///
/// An exact spelling match is preferred when several variants exist.
pub fn find_dir_case_insensitive(parent: &Utf8Path, name: &str) -> Option<Utf8PathBuf> {
    let exact = parent.join(name);
    if exact.is_dir() {
        return Some(exact);
    }

    let entries = fs::read_dir(parent).ok()?;
    let mut matches: Vec<Utf8PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
        .filter(|path| {
            path.file_name()
                .is_some_and(|file_name| file_name.eq_ignore_ascii_case(name))
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}

/// Path of a canonical folder inside the game directory.
///
/// Returns the existing directory when one is present under any spelling,
/// otherwise the retail spelling (which may not exist yet).
pub fn folder_path(game_dir: &Utf8Path, folder: CanonicalFolder) -> Utf8PathBuf {
    find_dir_case_insensitive(game_dir, folder.name())
        .unwrap_or_else(|| game_dir.join(folder.display_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    #[test]
    fn test_is_valid_game_dir() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path());
        assert!(!is_valid_game_dir(&root));

        fs::write(root.join("SWKOTOR2.EXE"), b"").unwrap();
        assert!(is_valid_game_dir(&root));
        assert!(!is_valid_game_dir(&root.join("missing")));
    }

    #[test]
    fn test_find_dir_case_insensitive() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path());
        fs::create_dir(root.join("OVERRIDE")).unwrap();
        fs::write(root.join("modules"), b"not a dir").unwrap();

        let found = find_dir_case_insensitive(&root, "override").unwrap();
        assert_eq!(found.file_name(), Some("OVERRIDE"));
        assert!(find_dir_case_insensitive(&root, "modules").is_none());
    }

    #[test]
    fn test_folder_path_falls_back_to_retail_spelling() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path());
        fs::create_dir(root.join("streammusic")).unwrap();

        assert_eq!(
            folder_path(&root, CanonicalFolder::StreamMusic),
            root.join("streammusic")
        );
        assert_eq!(
            folder_path(&root, CanonicalFolder::Override),
            root.join("Override")
        );
    }
}
