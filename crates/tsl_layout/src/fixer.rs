//! Rewriting fixable trees into the canonical layout.
//!
//! When more than one equally plausible rewrite exists, [`fix`] does not pick
//! one. It returns [`FixOutcome::ChoiceRequired`] and leaves the tree untouched;
//! the caller asks the user and calls [`fix`] again with the chosen index.

use tsl_mod_core::{CanonicalFolder, FileTree, InsertPolicy, NodeId};

use crate::checker::{
    classify, find_patch_bundles, has_mod_files, is_canonical, is_ignored, is_patch_bundle,
    Verdict, PATCH_BUNDLE_NAME,
};
use crate::error::{Error, Result};

const OVERRIDE: &str = "override";

/// What kind of decision a [`ChoiceRequest`] asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    /// Several `tslpatchdata` bundles; options are the paths of their parent folders.
    PatchBundle,
    /// Several folders hold mod files; options are the folder paths.
    ModFolder,
}

/// A list of options the user must pick from before the tree can be fixed.
///
/// Options are tree paths. Answer with the index of the chosen option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRequest {
    pub kind: ChoiceKind,
    pub options: Vec<String>,
}

impl ChoiceRequest {
    pub fn prompt(&self) -> &'static str {
        match self.kind {
            ChoiceKind::PatchBundle => {
                "Multiple TSLPatcher folders found. Choose which one to keep:"
            }
            ChoiceKind::ModFolder => "Multiple folders contain mod files. Choose the correct one:",
        }
    }
}

/// The rewrite that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixAction {
    /// A patch bundle became the only top-level entry.
    PatchBundle,
    /// A folder was moved to become a top-level game folder.
    PromotedFolder,
    /// The files of the single root folder were moved into `override`.
    Flattened,
    /// Loose root files were moved into `override`.
    LooseFiles,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// The tree was already valid and was not touched.
    AlreadyValid,
    /// The tree is invalid and was not touched.
    NotFixable,
    /// The tree was rewritten.
    Fixed(FixAction),
    /// A selection is needed; the tree was not touched.
    ChoiceRequired(ChoiceRequest),
    /// No rewrite rule applied; the tree was not touched.
    NoChange,
}

/// Rewrite a fixable tree in place.
///
/// `selection` is an index into the options of a previously returned
/// [`ChoiceRequest`]; it is ignored when no choice is needed. An out-of-range
/// selection is an error and leaves the tree untouched.
pub fn fix(tree: &mut FileTree, selection: Option<usize>) -> Result<FixOutcome> {
    match classify(tree) {
        Verdict::Valid => return Ok(FixOutcome::AlreadyValid),
        Verdict::Invalid => return Ok(FixOutcome::NotFixable),
        Verdict::Fixable => {}
    }
    let root = tree.root();

    let bundles = find_patch_bundles(tree);
    if !bundles.is_empty() {
        let bundle = match (bundles.len(), selection) {
            (1, _) => bundles[0],
            (len, None) => {
                let options = bundles.iter().map(|&b| bundle_label(tree, b)).collect();
                return Ok(choice(ChoiceKind::PatchBundle, options, len));
            }
            (len, Some(index)) => *bundles
                .get(index)
                .ok_or(Error::SelectionOutOfRange { index, len })?,
        };
        tracing::info!("Keeping patch bundle '{}'", tree.path(bundle));
        let kept = tree.move_to(bundle, PATCH_BUNDLE_NAME, InsertPolicy::Replace)?;
        detach_top_level_except(tree, kept)?;
        return Ok(FixOutcome::Fixed(FixAction::PatchBundle));
    }

    let candidates: Vec<NodeId> = tree
        .descendant_dirs(root)
        .into_iter()
        .filter(|&dir| has_mod_files(tree, dir))
        .collect();

    if candidates.len() > 1 {
        let Some(index) = selection else {
            let options = candidates
                .iter()
                .map(|&c| tree.path(c))
                .collect();
            return Ok(choice(ChoiceKind::ModFolder, options, candidates.len()));
        };
        let chosen = *candidates.get(index).ok_or(Error::SelectionOutOfRange {
            index,
            len: candidates.len(),
        })?;
        tracing::info!("Using '{}' as the override folder", tree.path(chosen));
        let kept = tree.move_to(chosen, OVERRIDE, InsertPolicy::Replace)?;
        detach_top_level_except(tree, kept)?;
        return Ok(FixOutcome::Fixed(FixAction::PromotedFolder));
    }

    let root_dirs: Vec<NodeId> = tree
        .children(root)
        .iter()
        .copied()
        .filter(|&entry| tree.is_dir(entry))
        .collect();

    let loose: Vec<NodeId> = tree
        .children(root)
        .iter()
        .copied()
        .filter(|&entry| tree.is_file(entry) && !is_ignored(tree.name(entry)))
        .collect();

    match candidates.first() {
        Some(&sole) if tree.parent(sole) != Some(root) => {
            // A lone folder buried deeper (e.g. `MyMod/Override`). Flattening the
            // root folder would drop it, so it is promoted instead; a game folder
            // keeps its own name.
            let dest = CanonicalFolder::from_name(tree.name(sole))
                .map(|folder| folder.name())
                .unwrap_or(OVERRIDE);
            tracing::info!("Promoting nested folder '{}' to '{}'", tree.path(sole), dest);
            let kept = tree.move_to(sole, dest, InsertPolicy::Replace)?;
            detach_top_level_except(tree, kept)?;
            return Ok(FixOutcome::Fixed(FixAction::PromotedFolder));
        }
        Some(&sole) => {
            flatten_into_override(tree, sole)?;
            return Ok(FixOutcome::Fixed(FixAction::Flattened));
        }
        // Loose game files win over a root folder with nothing to flatten.
        None if root_dirs.len() == 1 && loose.is_empty() => {
            flatten_into_override(tree, root_dirs[0])?;
            return Ok(FixOutcome::Fixed(FixAction::Flattened));
        }
        None => {}
    }

    if !loose.is_empty() {
        tree.add_directory(root, OVERRIDE)?;
        for file in loose {
            let dest = format!("{}/{}", OVERRIDE, tree.name(file));
            tree.move_to(file, &dest, InsertPolicy::Replace)?;
        }
        cleanup_root(tree)?;
        tracing::info!("Moved loose files into {}", OVERRIDE);
        return Ok(FixOutcome::Fixed(FixAction::LooseFiles));
    }

    tracing::debug!("No layout fix applies");
    Ok(FixOutcome::NoChange)
}

/// Remove top-level entries that are not game folders or a patch bundle, and
/// everything inside `override` the game would not load from there.
///
/// Subfolders of `override` are removed with their contents.
pub fn cleanup_root(tree: &mut FileTree) -> Result<()> {
    let root = tree.root();
    for entry in tree.children(root).to_vec() {
        let name = tree.name(entry);
        if !is_canonical(name) && !is_patch_bundle(name) {
            tracing::debug!("Removing stray top-level entry '{}'", name);
            tree.detach(entry)?;
        }
    }

    let Some(override_dir) = tree.find(root, OVERRIDE).filter(|&id| tree.is_dir(id)) else {
        return Ok(());
    };
    for child in tree.children(override_dir).to_vec() {
        let name = tree.name(child);
        let remove = tree.is_dir(child)
            || is_ignored(name)
            || !CanonicalFolder::Override.accepts(name);
        if remove {
            tracing::debug!("Removing '{}' from {}", tree.path(child), OVERRIDE);
            tree.detach(child)?;
        }
    }
    Ok(())
}

fn flatten_into_override(tree: &mut FileTree, dir: NodeId) -> Result<()> {
    tracing::info!("Flattening '{}' into {}", tree.path(dir), OVERRIDE);
    let root = tree.root();
    tree.add_directory(root, OVERRIDE)?;
    for child in tree.children(dir).to_vec() {
        if tree.is_file(child) {
            let dest = format!("{}/{}", OVERRIDE, tree.name(child));
            tree.move_to(child, &dest, InsertPolicy::Replace)?;
        }
    }
    cleanup_root(tree)
}

fn detach_top_level_except(tree: &mut FileTree, keep: NodeId) -> Result<()> {
    let root = tree.root();
    for entry in tree.children(root).to_vec() {
        if entry != keep {
            tree.detach(entry)?;
        }
    }
    Ok(())
}

fn bundle_label(tree: &FileTree, bundle: NodeId) -> String {
    match tree.parent(bundle) {
        Some(parent) if parent != tree.root() => tree.path(parent),
        _ => tree.path(bundle),
    }
}

fn choice(kind: ChoiceKind, options: Vec<String>, len: usize) -> FixOutcome {
    tracing::debug!(?kind, len, "Layout fix needs a selection");
    FixOutcome::ChoiceRequired(ChoiceRequest { kind, options })
}
