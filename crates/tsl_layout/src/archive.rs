use std::fs::{self, File};
use std::io::{Read, Seek};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tsl_mod_core::{FileEntry, FileSource, FileTree, InsertPolicy};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// A mod distributed as a `.zip` archive.
///
/// Entries are read lazily: [`ModArchive::to_tree`] only records entry indices,
/// the bytes are read when the tree is installed.
pub struct ModArchive<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl ModArchive<File> {
    pub fn open(path: &Utf8Path) -> Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> ModArchive<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Check that no entry would be written outside the install directory.
    pub fn validate(&mut self) -> Result<()> {
        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i)?;
            if file.enclosed_name().is_none() {
                return Err(Error::UnsafeEntryPath(file.name().to_string()));
            }
        }
        Ok(())
    }

    /// Build a virtual tree of the archive contents.
    pub fn to_tree(&mut self) -> Result<FileTree> {
        self.validate()?;

        let mut tree = FileTree::new();
        let root = tree.root();
        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i)?;
            let name = file.name().replace('\\', "/");
            if name.trim_matches('/').is_empty() {
                continue;
            }

            if file.is_dir() {
                tree.add_directory(root, &name)?;
            } else {
                let entry = FileEntry::in_archive(i, file.size(), None);
                if tree.resolve(&name).is_some() {
                    tracing::warn!("Archive entry '{}' shadows an earlier entry", name);
                }
                tree.add_file(root, &name, entry, InsertPolicy::Replace)?;
            }
        }

        tracing::debug!("Loaded {} archive entries", self.archive.len());
        Ok(tree)
    }

    pub fn read_entry(&mut self, index: usize) -> Result<Vec<u8>> {
        let mut file = self.archive.by_index(index)?;
        // The declared size is untrusted; let the buffer grow as data arrives.
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Write `tree` (built by [`ModArchive::to_tree`]) into `target`.
    pub fn install(&mut self, tree: &FileTree, target: &Utf8Path) -> Result<usize> {
        write_tree(tree, target, |index| self.read_entry(index))
    }
}

/// Build a virtual tree of an extracted mod directory.
///
/// Non-UTF-8 paths are skipped with a warning.
pub fn load_directory(dir: &Utf8Path) -> Result<FileTree> {
    if !dir.is_dir() {
        return Err(Error::InvalidTree(format!("{} is not a directory", dir)));
    }

    let mut tree = FileTree::new();
    let root = tree.root();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let path = match Utf8PathBuf::from_path_buf(entry.path().to_path_buf()) {
            Ok(p) => p,
            Err(p) => {
                tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                continue;
            }
        };
        let Ok(rel) = path.strip_prefix(dir) else {
            continue;
        };

        if entry.file_type().is_dir() {
            tree.add_directory(root, rel.as_str())?;
        } else if entry.file_type().is_file() {
            let metadata = entry.metadata().map_err(|e| Error::Io(e.into()))?;
            let file = FileEntry::on_disk(path.clone(), metadata.len(), metadata.modified().ok());
            tree.add_file(root, rel.as_str(), file, InsertPolicy::Replace)?;
        }
    }
    Ok(tree)
}

/// Write a tree whose files live on disk or in memory into `target`.
pub fn install_tree(tree: &FileTree, target: &Utf8Path) -> Result<usize> {
    write_tree(tree, target, |index| {
        Err(Error::InvalidTree(format!(
            "archive entry #{} referenced without an archive",
            index
        )))
    })
}

/// Write every directory and file of `tree` below `target`, overwriting
/// existing files. Returns the number of files written.
///
/// `read_archive_entry` supplies the bytes of [`FileSource::Archive`] entries.
pub fn write_tree<F>(tree: &FileTree, target: &Utf8Path, mut read_archive_entry: F) -> Result<usize>
where
    F: FnMut(usize) -> Result<Vec<u8>>,
{
    fs::create_dir_all(target)?;

    for dir in tree.descendant_dirs(tree.root()) {
        fs::create_dir_all(safe_join(target, &tree.path(dir))?)?;
    }

    let mut written = 0;
    for id in tree.descendant_files(tree.root()) {
        let Some(file) = tree.file(id) else {
            continue;
        };
        let dest = safe_join(target, &tree.path(id))?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        match &file.source {
            FileSource::Empty => fs::write(&dest, b"")?,
            FileSource::Memory(bytes) => fs::write(&dest, bytes)?,
            FileSource::Disk(path) => {
                fs::copy(path, &dest)?;
            }
            FileSource::Archive(index) => fs::write(&dest, read_archive_entry(*index)?)?,
        }
        written += 1;
    }

    tracing::info!("Installed {} files into {}", written, target);
    Ok(written)
}

/// Join a relative path onto `target`, rejecting anything that could escape it.
pub fn safe_join(target: &Utf8Path, rel: &str) -> Result<Utf8PathBuf> {
    let rel_path = Utf8Path::new(rel);
    let safe = rel_path
        .components()
        .all(|component| matches!(component, Utf8Component::Normal(_)));
    if !safe || rel.contains(':') {
        return Err(Error::UnsafeEntryPath(rel.to_string()));
    }
    Ok(target.join(rel_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fix, FixOutcome};
    use std::io::{Cursor, Write};
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn create_test_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    #[test]
    fn test_zip_to_tree() {
        let data = create_test_zip(&[
            ("My Mod/", b""),
            ("My Mod/a.tga", b"tga"),
            ("My Mod/readme.txt", b"hello"),
        ]);
        let mut archive = ModArchive::new(Cursor::new(data)).unwrap();
        let tree = archive.to_tree().unwrap();

        let file = tree.resolve("my mod/a.tga").unwrap();
        let entry = tree.file(file).unwrap();
        assert_eq!(entry.size, 3);
        assert!(matches!(entry.source, FileSource::Archive(_)));
    }

    #[test]
    fn test_fix_and_install_from_zip() {
        let data = create_test_zip(&[("My Mod/a.tga", b"tga"), ("My Mod/readme.txt", b"hello")]);
        let mut archive = ModArchive::new(Cursor::new(data)).unwrap();
        let mut tree = archive.to_tree().unwrap();
        assert!(matches!(fix(&mut tree, None).unwrap(), FixOutcome::Fixed(_)));

        let out = tempdir().unwrap();
        let target = utf8(out.path());
        let written = archive.install(&tree, &target).unwrap();

        assert_eq!(written, 1);
        assert_eq!(fs::read(target.join("override/a.tga")).unwrap(), b"tga");
        assert!(!target.join("My Mod").exists());
    }

    #[test]
    fn test_validate_rejects_escaping_entries() {
        let data = create_test_zip(&[("../evil.tga", b"x")]);
        let mut archive = ModArchive::new(Cursor::new(data)).unwrap();
        assert!(matches!(
            archive.validate(),
            Err(Error::UnsafeEntryPath(_))
        ));
        assert!(archive.to_tree().is_err());
    }

    #[test]
    fn test_load_directory_and_install() {
        let src = tempdir().unwrap();
        let src_root = utf8(src.path());
        fs::create_dir_all(src_root.join("Override")).unwrap();
        fs::write(src_root.join("Override/a.tpc"), b"tpc").unwrap();
        fs::write(src_root.join("b.2da"), b"2da").unwrap();

        let tree = load_directory(&src_root).unwrap();
        let entry = tree.file(tree.resolve("override/a.tpc").unwrap()).unwrap();
        assert_eq!(entry.size, 3);
        assert!(entry.modified.is_some());

        let out = tempdir().unwrap();
        let target = utf8(out.path());
        assert_eq!(install_tree(&tree, &target).unwrap(), 2);
        assert_eq!(fs::read(target.join("Override/a.tpc")).unwrap(), b"tpc");
        assert_eq!(fs::read(target.join("b.2da")).unwrap(), b"2da");
    }

    #[test]
    fn test_install_tree_rejects_archive_sources_without_archive() {
        let mut tree = FileTree::new();
        let root = tree.root();
        tree.add_file(
            root,
            "override/a.tga",
            FileEntry::in_archive(0, 1, None),
            InsertPolicy::FailIfExists,
        )
        .unwrap();

        let out = tempdir().unwrap();
        assert!(install_tree(&tree, &utf8(out.path())).is_err());
    }

    #[test]
    fn test_safe_join() {
        let base = Utf8Path::new("/mods/x");
        assert!(safe_join(base, "override/a.tga").is_ok());
        assert!(safe_join(base, "C:/evil").is_err());
        assert!(safe_join(base, "/abs").is_err());
    }
}
