//! Arena-backed virtual file tree.
//!
//! A [`FileTree`] models the contents of a mod archive (or an extracted mod
//! directory) before it is installed. The layout checker inspects and rewrites
//! it in place; the installer then writes the result to disk.
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. Detaching a node
//! unlinks it from its parent but keeps it in the arena, so ids held by the
//! caller never dangle. Names are case-preserving and matched
//! case-insensitively; siblings iterate directories first, then by lowercase
//! name, so every walk over a tree is deterministic.
//!
//! Operations that mutate while walking should snapshot the child list first:
//!
//! ```
//! use tsl_mod_core::{FileTree, InsertPolicy};
//!
//! # fn main() -> tsl_mod_core::Result<()> {
//! let mut tree = FileTree::from_paths(["MyMod/a.tga", "MyMod/b.txi"])?;
//! let wrapper = tree.find(tree.root(), "mymod").unwrap();
//! for child in tree.children(wrapper).to_vec() {
//!     let dest = format!("override/{}", tree.name(child));
//!     tree.move_to(child, &dest, InsertPolicy::Replace)?;
//! }
//! assert!(tree.resolve("Override/A.TGA").is_some());
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use camino::Utf8PathBuf;
use std::time::SystemTime;

/// Handle to a node inside a [`FileTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Where the bytes of a file node can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Placeholder with no content (used by tests and synthetic trees).
    Empty,
    /// Content held in memory.
    Memory(Vec<u8>),
    /// A file on the local filesystem.
    Disk(Utf8PathBuf),
    /// Entry index inside the archive the tree was loaded from.
    Archive(usize),
}

/// Metadata and content location of a file node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub source: FileSource,
}

impl FileEntry {
    pub fn empty() -> Self {
        Self {
            size: 0,
            modified: None,
            source: FileSource::Empty,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            size: bytes.len() as u64,
            modified: None,
            source: FileSource::Memory(bytes),
        }
    }

    pub fn on_disk(path: Utf8PathBuf, size: u64, modified: Option<SystemTime>) -> Self {
        Self {
            size,
            modified,
            source: FileSource::Disk(path),
        }
    }

    pub fn in_archive(index: usize, size: u64, modified: Option<SystemTime>) -> Self {
        Self {
            size,
            modified,
            source: FileSource::Archive(index),
        }
    }
}

/// What to do when a move or insert hits an existing sibling with the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPolicy {
    /// Leave the tree unchanged and return [`Error::AlreadyExists`].
    #[default]
    FailIfExists,
    /// Detach the existing entry and put the new one in its place.
    Replace,
    /// Merge directories recursively; files inside still replace.
    Merge,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Directory(Vec<NodeId>),
    File(FileEntry),
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

const ROOT: NodeId = NodeId(0);

/// A virtual directory tree with a single unnamed root directory.
#[derive(Debug, Clone)]
pub struct FileTree {
    nodes: Vec<Node>,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    /// Create a tree containing only the root directory.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: String::new(),
                parent: None,
                kind: NodeKind::Directory(Vec::new()),
            }],
        }
    }

    /// Build a tree from slash-separated paths.
    ///
    /// Every path creates an empty file, except paths ending in `/`, which
    /// create (possibly empty) directories.
    pub fn from_paths<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for path in paths {
            let path = path.as_ref();
            if path.ends_with('/') || path.ends_with('\\') {
                tree.add_directory(ROOT, path)?;
            } else {
                tree.add_file(ROOT, path, FileEntry::empty(), InsertPolicy::Replace)?;
            }
        }
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Name of the node (empty for the root).
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Parent directory, or `None` for the root and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn is_dir(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Directory(_))
    }

    pub fn is_file(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::File(_))
    }

    pub fn file(&self, id: NodeId) -> Option<&FileEntry> {
        match &self.nodes[id.0].kind {
            NodeKind::File(entry) => Some(entry),
            NodeKind::Directory(_) => None,
        }
    }

    /// Children of a directory in iteration order; empty for files.
    ///
    /// Call `.to_vec()` before mutating the tree while walking the result.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].kind {
            NodeKind::Directory(children) => children,
            NodeKind::File(_) => &[],
        }
    }

    /// Whether the node is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == ROOT {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.children(ROOT).is_empty()
    }

    /// Direct child of `dir` named `name`, ignoring case.
    pub fn find(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        let wanted = name.to_lowercase();
        self.children(dir)
            .iter()
            .copied()
            .find(|child| self.nodes[child.0].name.to_lowercase() == wanted)
    }

    /// Look up a slash-separated path from the root, ignoring case.
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        let segments = split_path(path).ok()?;
        segments
            .iter()
            .try_fold(ROOT, |current, segment| self.find(current, segment))
    }

    /// Slash-separated path of the node relative to the root.
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while current != ROOT {
            segments.push(self.nodes[current.0].name.as_str());
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        segments.reverse();
        segments.join("/")
    }

    /// All directories below `id`, parents before their children.
    pub fn descendant_dirs(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out, true);
        out
    }

    /// All files below `id`, in walk order.
    pub fn descendant_files(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out, false);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>, dirs: bool) {
        for &child in self.children(id) {
            if self.is_dir(child) {
                if dirs {
                    out.push(child);
                }
                self.collect_descendants(child, out, dirs);
            } else if !dirs {
                out.push(child);
            }
        }
    }

    /// Create (or reuse) the directory at `path` below `parent`, including
    /// intermediate directories.
    pub fn add_directory(&mut self, parent: NodeId, path: &str) -> Result<NodeId> {
        self.ensure_directory(parent)?;
        let segments = split_path(path)?;
        let mut current = parent;
        for segment in segments {
            current = match self.find(current, &segment) {
                Some(existing) if self.is_dir(existing) => existing,
                Some(_) => return Err(Error::AlreadyExists(self.join(current, &segment))),
                None => self.create(current, segment, NodeKind::Directory(Vec::new())),
            };
        }
        Ok(current)
    }

    /// Add a file at `path` below `parent`, creating intermediate directories.
    ///
    /// An existing file at the same path is handled according to `policy`
    /// ([`InsertPolicy::Merge`] behaves like `Replace` for files). A directory
    /// in the way is always an error.
    pub fn add_file(
        &mut self,
        parent: NodeId,
        path: &str,
        entry: FileEntry,
        policy: InsertPolicy,
    ) -> Result<NodeId> {
        let mut segments = split_path(path)?;
        let file_name = segments.pop().ok_or_else(|| Error::InvalidPath(path.to_string()))?;
        let dir = if segments.is_empty() {
            self.ensure_directory(parent)?;
            parent
        } else {
            self.add_directory(parent, &segments.join("/"))?
        };

        if let Some(existing) = self.find(dir, &file_name) {
            if self.is_dir(existing) || policy == InsertPolicy::FailIfExists {
                return Err(Error::AlreadyExists(self.join(dir, &file_name)));
            }
            self.unlink(existing);
        }
        Ok(self.create(dir, file_name, NodeKind::File(entry)))
    }

    /// Unlink a node from its parent. Detaching an already detached node is a no-op.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if id == ROOT {
            return Err(Error::InvalidNode("the root cannot be detached".to_string()));
        }
        self.unlink(id);
        Ok(())
    }

    /// Move `id` to the slash-separated `dest` path (relative to the root).
    ///
    /// The last segment of `dest` becomes the node's new name; intermediate
    /// directories are created. Returns the node that now lives at `dest`,
    /// which is the existing directory when two directories were merged.
    pub fn move_to(&mut self, id: NodeId, dest: &str, policy: InsertPolicy) -> Result<NodeId> {
        if id == ROOT || !self.is_attached(id) {
            return Err(Error::InvalidNode(format!(
                "cannot move '{}': node is the root or detached",
                self.path(id)
            )));
        }

        let mut segments = split_path(dest)?;
        let new_name = segments.pop().ok_or_else(|| Error::InvalidPath(dest.to_string()))?;
        let dest_parent_path = segments.join("/");
        let dest_path = if dest_parent_path.is_empty() {
            new_name.clone()
        } else {
            format!("{}/{}", dest_parent_path, new_name)
        };

        let src_path = self.path(id).to_lowercase();
        let dest_lower = dest_path.to_lowercase();
        let dest_parent_lower = dest_parent_path.to_lowercase();

        if src_path == dest_lower {
            // Same node, possibly a different spelling.
            self.rename(id, new_name);
            return Ok(id);
        }
        if self.is_dir(id)
            && (dest_parent_lower == src_path || dest_parent_lower.starts_with(&format!("{}/", src_path)))
        {
            return Err(Error::InvalidMove {
                from: self.path(id),
                to: dest_path,
            });
        }

        let dest_parent = if dest_parent_path.is_empty() {
            ROOT
        } else {
            self.add_directory(ROOT, &dest_parent_path)?
        };

        if let Some(existing) = self.find(dest_parent, &new_name) {
            match policy {
                InsertPolicy::FailIfExists => return Err(Error::AlreadyExists(dest_path)),
                InsertPolicy::Merge if self.is_dir(id) && self.is_dir(existing) => {
                    for child in self.children(id).to_vec() {
                        let child_dest = format!("{}/{}", dest_path, self.name(child));
                        self.move_to(child, &child_dest, InsertPolicy::Merge)?;
                    }
                    self.unlink(id);
                    return Ok(existing);
                }
                InsertPolicy::Merge | InsertPolicy::Replace => self.unlink(existing),
            }
        }

        self.unlink(id);
        self.nodes[id.0].name = new_name;
        self.attach(dest_parent, id);
        Ok(id)
    }

    fn ensure_directory(&self, id: NodeId) -> Result<()> {
        if self.is_dir(id) {
            Ok(())
        } else {
            Err(Error::InvalidNode(format!("'{}' is not a directory", self.path(id))))
        }
    }

    fn join(&self, dir: NodeId, name: &str) -> String {
        let base = self.path(dir);
        if base.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", base, name)
        }
    }

    fn create(&mut self, parent: NodeId, name: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            parent: None,
            kind,
        });
        self.attach(parent, id);
        id
    }

    fn rename(&mut self, id: NodeId, name: String) {
        let parent = self.nodes[id.0].parent;
        self.unlink(id);
        self.nodes[id.0].name = name;
        if let Some(parent) = parent {
            self.attach(parent, id);
        }
    }

    fn attach(&mut self, parent: NodeId, id: NodeId) {
        let key = self.sort_key(id);
        let position = self
            .children(parent)
            .iter()
            .position(|&sibling| self.sort_key(sibling) > key);
        if let NodeKind::Directory(children) = &mut self.nodes[parent.0].kind {
            match position {
                Some(index) => children.insert(index, id),
                None => children.push(id),
            }
        }
        self.nodes[id.0].parent = Some(parent);
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return;
        };
        if let NodeKind::Directory(children) = &mut self.nodes[parent.0].kind {
            children.retain(|&child| child != id);
        }
    }

    fn sort_key(&self, id: NodeId) -> (bool, String) {
        (self.is_file(id), self.nodes[id.0].name.to_lowercase())
    }
}

/// Split a tree path on `/` or `\`, rejecting empty, `.` and `..` segments.
fn split_path(path: &str) -> Result<Vec<String>> {
    let segments: Vec<String> = path
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if segments.is_empty() || segments.iter().any(|s| s == "." || s == "..") {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &FileTree, dir: NodeId) -> Vec<String> {
        tree.children(dir)
            .iter()
            .map(|&c| tree.name(c).to_string())
            .collect()
    }

    #[test]
    fn test_from_paths_builds_nested_dirs() {
        let tree = FileTree::from_paths(["a/b/c.tga", "a/d/", "e.txt"]).unwrap();
        let a = tree.find(tree.root(), "A").unwrap();
        assert!(tree.is_dir(a));
        assert_eq!(names(&tree, a), vec!["b", "d"]);
        assert!(tree.is_file(tree.resolve("a/b/c.tga").unwrap()));
        assert!(tree.children(tree.resolve("a/d").unwrap()).is_empty());
    }

    #[test]
    fn test_children_sorted_dirs_first_then_name() {
        let tree = FileTree::from_paths(["zeta.tga", "Beta/", "alpha.tga", "Gamma/"]).unwrap();
        assert_eq!(
            names(&tree, tree.root()),
            vec!["Beta", "Gamma", "alpha.tga", "zeta.tga"]
        );
    }

    #[test]
    fn test_path_and_resolve_are_case_insensitive() {
        let tree = FileTree::from_paths(["Override/Foo.TGA"]).unwrap();
        let id = tree.resolve("override/foo.tga").unwrap();
        assert_eq!(tree.path(id), "Override/Foo.TGA");
        assert!(tree.resolve("override/missing.tga").is_none());
    }

    #[test]
    fn test_add_file_policy() {
        let mut tree = FileTree::from_paths(["a.tga"]).unwrap();
        let root = tree.root();
        let err = tree
            .add_file(root, "A.TGA", FileEntry::empty(), InsertPolicy::FailIfExists)
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        tree.add_file(
            root,
            "A.TGA",
            FileEntry::from_bytes(vec![1, 2, 3]),
            InsertPolicy::Replace,
        )
        .unwrap();
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.file(tree.resolve("a.tga").unwrap()).unwrap().size, 3);
    }

    #[test]
    fn test_add_directory_over_file_fails() {
        let mut tree = FileTree::from_paths(["override"]).unwrap();
        let root = tree.root();
        assert!(tree.add_directory(root, "override").is_err());
    }

    #[test]
    fn test_detach_keeps_id_valid() {
        let mut tree = FileTree::from_paths(["mod/a.tga"]).unwrap();
        let file = tree.resolve("mod/a.tga").unwrap();
        let dir = tree.resolve("mod").unwrap();
        tree.detach(dir).unwrap();
        assert!(tree.is_empty());
        assert!(!tree.is_attached(file));
        assert_eq!(tree.name(file), "a.tga");
        assert!(tree.detach(tree.root()).is_err());
    }

    #[test]
    fn test_move_file_creates_parents() {
        let mut tree = FileTree::from_paths(["mod/a.tga"]).unwrap();
        let file = tree.resolve("mod/a.tga").unwrap();
        let moved = tree
            .move_to(file, "override/a.tga", InsertPolicy::FailIfExists)
            .unwrap();
        assert_eq!(moved, file);
        assert_eq!(tree.path(file), "override/a.tga");
        assert!(tree.children(tree.resolve("mod").unwrap()).is_empty());
    }

    #[test]
    fn test_move_directory_renames() {
        let mut tree = FileTree::from_paths(["Wrapper/Sub/a.tga"]).unwrap();
        let sub = tree.resolve("wrapper/sub").unwrap();
        tree.move_to(sub, "tslpatchdata", InsertPolicy::FailIfExists)
            .unwrap();
        assert!(tree.resolve("tslpatchdata/a.tga").is_some());
        assert!(tree.resolve("wrapper/sub").is_none());
    }

    #[test]
    fn test_move_onto_itself_only_renames() {
        let mut tree = FileTree::from_paths(["Override/a.tga"]).unwrap();
        let dir = tree.resolve("override").unwrap();
        let result = tree
            .move_to(dir, "override", InsertPolicy::FailIfExists)
            .unwrap();
        assert_eq!(result, dir);
        assert_eq!(tree.name(dir), "override");
        assert!(tree.resolve("override/a.tga").is_some());
    }

    #[test]
    fn test_move_into_descendant_fails() {
        let mut tree = FileTree::from_paths(["a/b/c.tga"]).unwrap();
        let a = tree.resolve("a").unwrap();
        let err = tree.move_to(a, "a/b/a", InsertPolicy::Merge).unwrap_err();
        assert!(matches!(err, Error::InvalidMove { .. }));
        assert!(tree.resolve("a/b/c.tga").is_some());
    }

    #[test]
    fn test_move_merge_directories() {
        let mut tree =
            FileTree::from_paths(["override/a.tga", "mod/override/a.tga", "mod/override/b.tga"])
                .unwrap();
        let nested = tree.resolve("mod/override").unwrap();
        let existing = tree.resolve("override").unwrap();

        let result = tree.move_to(nested, "override", InsertPolicy::Merge).unwrap();

        assert_eq!(result, existing);
        assert_eq!(names(&tree, existing), vec!["a.tga", "b.tga"]);
        assert!(tree.children(tree.resolve("mod").unwrap()).is_empty());
    }

    #[test]
    fn test_move_fail_if_exists_leaves_tree() {
        let mut tree = FileTree::from_paths(["override/a.tga", "a.tga"]).unwrap();
        let loose = tree.resolve("a.tga").unwrap();
        assert!(tree
            .move_to(loose, "override/a.tga", InsertPolicy::FailIfExists)
            .is_err());
        assert!(tree.is_attached(loose));
        assert_eq!(tree.path(loose), "a.tga");
    }

    #[test]
    fn test_descendants_walk_order() {
        let tree = FileTree::from_paths(["b/x.tga", "a/c/y.tga", "z.tga"]).unwrap();
        let dirs: Vec<_> = tree
            .descendant_dirs(tree.root())
            .into_iter()
            .map(|d| tree.path(d))
            .collect();
        assert_eq!(dirs, vec!["a", "a/c", "b"]);
        let files: Vec<_> = tree
            .descendant_files(tree.root())
            .into_iter()
            .map(|f| tree.path(f))
            .collect();
        assert_eq!(files, vec!["a/c/y.tga", "b/x.tga", "z.tga"]);
    }

    #[test]
    fn test_invalid_paths() {
        let mut tree = FileTree::new();
        let root = tree.root();
        assert!(tree.add_directory(root, "").is_err());
        assert!(tree.add_directory(root, "a/../b").is_err());
        assert!(tree.resolve("").is_none());
    }
}
