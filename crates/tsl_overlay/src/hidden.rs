//! Hiding and unhiding files by renaming them.
//!
//! A hidden file keeps its name with [`HIDDEN_SUFFIX`] appended, which the game
//! ignores and the resolver lists separately. Renames never overwrite: if the
//! target name is taken the rename is refused.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{Error, Result};
use crate::listing::TextureListing;
use crate::utils::{strip_hidden_suffix, HIDDEN_SUFFIX};

/// Whether a file name carries the hidden suffix.
pub fn is_hidden_name(file_name: &str) -> bool {
    strip_hidden_suffix(file_name).is_some()
}

/// The path the file would have after toggling its hidden state.
pub fn toggled_path(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::NotHideable(path.to_path_buf()))?;
    let new_name = match strip_hidden_suffix(file_name) {
        Some(stem) => stem.to_string(),
        None => format!("{file_name}{HIDDEN_SUFFIX}"),
    };
    Ok(path.with_file_name(new_name))
}

/// Add or remove the hidden suffix on a single file. Returns the new path.
pub fn toggle_hidden(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let target = toggled_path(path)?;
    if !path.is_file() {
        return Err(Error::NotHideable(path.to_path_buf()));
    }
    if target.exists() {
        return Err(Error::TargetExists(target));
    }
    std::fs::rename(path, &target)?;
    tracing::info!("Renamed {} -> {}", path, target);
    Ok(target)
}

/// Hide a file; a file that is already hidden is left alone.
pub fn hide(path: &Utf8Path) -> Result<Utf8PathBuf> {
    match path.file_name() {
        Some(name) if is_hidden_name(name) => Ok(path.to_path_buf()),
        _ => toggle_hidden(path),
    }
}

/// Unhide a file; a file that is not hidden is left alone.
pub fn unhide(path: &Utf8Path) -> Result<Utf8PathBuf> {
    match path.file_name() {
        Some(name) if is_hidden_name(name) => toggle_hidden(path),
        _ => Ok(path.to_path_buf()),
    }
}

/// Result of one rename in a batch.
#[derive(Debug)]
pub struct RenameOutcome {
    pub path: Utf8PathBuf,
    pub result: Result<Utf8PathBuf>,
}

impl RenameOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Unhide every hidden row of a listing.
///
/// Each file is renamed independently; failures are logged and reported in the
/// returned outcomes without stopping the batch.
pub fn unhide_all(listing: &TextureListing) -> Vec<RenameOutcome> {
    listing
        .hidden()
        .map(|row| {
            let result = unhide(&row.path);
            if let Err(e) = &result {
                tracing::warn!("Failed to unhide {}: {}", row.path, e);
            }
            RenameOutcome {
                path: row.path.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OverrideResolver, OverrideSource};
    use std::fs;
    use tempfile::tempdir;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    #[test]
    fn test_toggled_path() {
        assert_eq!(
            toggled_path(Utf8Path::new("o/a.tga")).unwrap(),
            Utf8PathBuf::from("o/a.tga.mohidden")
        );
        assert_eq!(
            toggled_path(Utf8Path::new("o/a.tga.mohidden")).unwrap(),
            Utf8PathBuf::from("o/a.tga")
        );
        assert!(toggled_path(Utf8Path::new("/")).is_err());
    }

    #[test]
    fn test_toggle_round_trip() {
        let dir = tempdir().unwrap();
        let file = utf8(dir.path()).join("a.tpc");
        fs::write(&file, b"x").unwrap();

        let hidden = toggle_hidden(&file).unwrap();
        assert!(hidden.exists() && !file.exists());
        assert_eq!(toggle_hidden(&hidden).unwrap(), file);
        assert!(file.exists());
    }

    #[test]
    fn test_toggle_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path());
        fs::write(root.join("a.tga"), b"new").unwrap();
        fs::write(root.join("a.tga.mohidden"), b"old").unwrap();

        let err = toggle_hidden(&root.join("a.tga")).unwrap_err();
        assert!(matches!(err, Error::TargetExists(_)));
        assert_eq!(fs::read(root.join("a.tga.mohidden")).unwrap(), b"old");
    }

    #[test]
    fn test_toggle_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(toggle_hidden(&utf8(dir.path()).join("missing.tga")).is_err());
    }

    #[test]
    fn test_hide_and_unhide_are_idempotent() {
        let dir = tempdir().unwrap();
        let file = utf8(dir.path()).join("a.dds");
        fs::write(&file, b"x").unwrap();

        let hidden = hide(&file).unwrap();
        assert_eq!(hide(&hidden).unwrap(), hidden);
        assert_eq!(unhide(&hidden).unwrap(), file);
        assert_eq!(unhide(&file).unwrap(), file);
    }

    #[test]
    fn test_unhide_all_continues_past_failures() {
        let dir = tempdir().unwrap();
        let root = utf8(dir.path());
        fs::write(root.join("a.tga.mohidden"), b"a").unwrap();
        fs::write(root.join("b.tga.mohidden"), b"b").unwrap();
        fs::write(root.join("b.tga"), b"visible").unwrap();
        fs::write(root.join("c.tpc.mohidden"), b"c").unwrap();

        let listing = OverrideResolver::new(OverrideSource::new("Game Override", root.clone()))
            .resolve();
        let outcomes = unhide_all(&listing);

        assert_eq!(outcomes.len(), 3);
        let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_ok()).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].path.as_str().ends_with("b.tga.mohidden"));
        assert!(root.join("a.tga").exists());
        assert!(root.join("c.tpc").exists());

        let after = OverrideResolver::new(OverrideSource::new("Game Override", root)).resolve();
        assert_eq!(after.summary().hidden, 1);
    }
}
