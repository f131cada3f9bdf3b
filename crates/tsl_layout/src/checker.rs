//! Layout classification.
//!
//! [`classify`] decides whether a mod tree can be installed as-is, can be
//! rewritten into the canonical layout by [`fix`](crate::fix), or must be
//! rejected. It never mutates the tree.

use std::fmt;

use tsl_mod_core::{extension_of, CanonicalFolder, FileTree, NodeId};

/// Directory name of a TSLPatcher bundle.
pub const PATCH_BUNDLE_NAME: &str = "tslpatchdata";

/// The game's dialogue table, valid on its own at the root of a mod.
pub const DIALOG_TABLE_NAME: &str = "dialog.tlk";

/// Directory names a mod must never ship.
pub const RESTRICTED_DIRS: &[&str] = &["data"];

/// Documentation and metadata extensions that never count as mod files.
pub const IGNORED_EXTENSIONS: &[&str] = &[
    "txt", "pdf", "png", "jpg", "jpeg", "bmp", "gif", "md", "rtf", "doc", "docx", "ini", "html",
    "url", "log", "bak", "xml", "docx#",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Already in a canonical layout.
    Valid,
    /// Can be rewritten into a canonical layout.
    Fixable,
    /// No safe rewrite exists.
    Invalid,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Valid => "valid",
            Verdict::Fixable => "fixable",
            Verdict::Invalid => "invalid",
        })
    }
}

/// Whether a file name carries a documentation/metadata extension.
///
/// Files without an extension are not ignored.
pub fn is_ignored(file_name: &str) -> bool {
    extension_of(file_name).is_some_and(|ext| IGNORED_EXTENSIONS.contains(&ext.as_str()))
}

pub(crate) fn is_canonical(name: &str) -> bool {
    CanonicalFolder::from_name(name).is_some()
}

pub(crate) fn is_restricted(name: &str) -> bool {
    RESTRICTED_DIRS
        .iter()
        .any(|restricted| restricted.eq_ignore_ascii_case(name))
}

pub(crate) fn is_patch_bundle(name: &str) -> bool {
    name.eq_ignore_ascii_case(PATCH_BUNDLE_NAME)
}

/// Whether `dir` directly holds at least one file that is not ignored.
pub(crate) fn has_mod_files(tree: &FileTree, dir: NodeId) -> bool {
    tree.children(dir)
        .iter()
        .any(|&child| tree.is_file(child) && !is_ignored(tree.name(child)))
}

fn has_any_file(tree: &FileTree, dir: NodeId) -> bool {
    tree.children(dir).iter().any(|&child| tree.is_file(child))
}

/// Whether any ancestor of `id` (below the root) is a canonical folder.
fn nested_under_canonical(tree: &FileTree, id: NodeId) -> bool {
    let mut current = tree.parent(id);
    while let Some(parent) = current {
        if parent == tree.root() {
            return false;
        }
        if is_canonical(tree.name(parent)) {
            return true;
        }
        current = tree.parent(parent);
    }
    false
}

/// Every TSLPatcher bundle directory in the tree, in walk order.
pub(crate) fn find_patch_bundles(tree: &FileTree) -> Vec<NodeId> {
    tree.descendant_dirs(tree.root())
        .into_iter()
        .filter(|&dir| is_patch_bundle(tree.name(dir)))
        .collect()
}

/// Classify a mod tree. Rules are checked in priority order; the first match wins.
pub fn classify(tree: &FileTree) -> Verdict {
    let root = tree.root();
    let all_dirs = tree.descendant_dirs(root);

    if all_dirs.iter().any(|&dir| is_patch_bundle(tree.name(dir))) {
        tracing::debug!("Found a {} bundle", PATCH_BUNDLE_NAME);
        return Verdict::Fixable;
    }

    if let Some(&dir) = all_dirs.iter().find(|&&dir| is_restricted(tree.name(dir))) {
        tracing::debug!("Restricted directory '{}' present", tree.path(dir));
        return Verdict::Invalid;
    }

    for &entry in tree.children(root) {
        if !tree.is_dir(entry) || is_canonical(tree.name(entry)) {
            continue;
        }
        if has_mod_files(tree, entry) {
            tracing::debug!("Root folder '{}' wraps mod files", tree.name(entry));
            return Verdict::Fixable;
        }
        let double_wrapped = tree.children(entry).iter().any(|&child| {
            tree.is_dir(child) && is_canonical(tree.name(child)) && has_any_file(tree, child)
        });
        if double_wrapped {
            tracing::debug!("Root folder '{}' wraps a game folder", tree.name(entry));
            return Verdict::Fixable;
        }
    }

    let stray = all_dirs.iter().find(|&&dir| {
        !is_canonical(tree.name(dir))
            && !nested_under_canonical(tree, dir)
            && has_mod_files(tree, dir)
    });
    if let Some(&dir) = stray {
        tracing::debug!("Folder '{}' holds mod files outside a game folder", tree.path(dir));
        return Verdict::Fixable;
    }

    let root_entries = tree.children(root);
    if root_entries
        .iter()
        .any(|&entry| tree.is_dir(entry) && is_canonical(tree.name(entry)))
    {
        return Verdict::Valid;
    }

    if root_entries
        .iter()
        .any(|&entry| tree.is_file(entry) && CanonicalFolder::accepted_anywhere(tree.name(entry)))
    {
        tracing::debug!("Loose game files at the root");
        return Verdict::Fixable;
    }

    if root_entries
        .iter()
        .any(|&entry| tree.is_file(entry) && tree.name(entry).eq_ignore_ascii_case(DIALOG_TABLE_NAME))
    {
        return Verdict::Valid;
    }

    Verdict::Invalid
}
