//! Layered override resolution.
//!
//! The game loads loose textures from a single `Override` directory. With a mod
//! manager, every active mod contributes its own `override` folder on top of
//! the game's, and the highest-priority mod wins for any given path.
//!
//! # Algorithm
//!
//! 1. Walk every source in priority order (highest first), then the base.
//!    Only texture files (`tga`, `tpc`, `txi`, `dds`) are considered, judged by
//!    the extension left after stripping the hidden suffix.
//! 2. Files ending in `.mohidden` are recorded as hidden rows under their
//!    un-suffixed path. They never compete for a path.
//! 3. Other files fold by case-insensitive relative path; the first claim wins
//!    and later claims are dropped.
//! 4. Winners are grouped by relative path without extension. Groups with more
//!    than one extension are flagged with a [`ConflictSeverity`].
//!
//! Resolution only reads the filesystem and builds its result from scratch on
//! every call, so it can be re-run at any time to pick up renames.

use std::collections::{BTreeMap, BTreeSet};

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::listing::{ConflictSeverity, ListingRow, TextureListing};
use crate::source::OverrideSource;
use crate::utils::{base_key, fold_key, strip_hidden_suffix, texture_extension};

/// A texture file found while walking a source.
struct ScannedFile {
    rel_path: String,
    extension: String,
    path: Utf8PathBuf,
    size: u64,
    modified: Option<DateTime<Utc>>,
    hidden: bool,
}

/// Resolves which source provides each texture path.
///
/// Create a resolver with [`new`](Self::new), set the active mod sources with
/// [`set_sources`](Self::set_sources), then call [`resolve`](Self::resolve) as
/// often as needed.
pub struct OverrideResolver {
    base: OverrideSource,
    sources: Vec<OverrideSource>,
}

impl OverrideResolver {
    /// Create a resolver over the given base directory (normally the game's `Override`).
    pub fn new(base: OverrideSource) -> Self {
        Self {
            base,
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<OverrideSource>) -> Self {
        self.sources = sources;
        self
    }

    /// Set the mod sources, highest priority first.
    pub fn set_sources(&mut self, sources: Vec<OverrideSource>) {
        self.sources = sources;
    }

    /// Build the merged listing from the current state of the filesystem.
    pub fn resolve(&self) -> TextureListing {
        let mut winners: BTreeMap<String, (String, ScannedFile)> = BTreeMap::new();
        let mut hidden_rows = Vec::new();
        let mut shadowed = 0usize;

        for source in self.sources.iter().chain(std::iter::once(&self.base)) {
            for file in scan_source(source) {
                if file.hidden {
                    hidden_rows.push(to_row(&source.label, file, None));
                    continue;
                }
                let key = fold_key(&file.rel_path);
                if let Some((owner, _)) = winners.get(&key) {
                    tracing::debug!(
                        "'{}' from {} is shadowed by {}",
                        file.rel_path,
                        source.label,
                        owner
                    );
                    shadowed += 1;
                    continue;
                }
                winners.insert(key, (source.label.clone(), file));
            }
        }

        let mut groups: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (key, (_, file)) in &winners {
            groups
                .entry(base_key(key))
                .or_default()
                .insert(file.extension.as_str());
        }
        let severities: BTreeMap<String, ConflictSeverity> = groups
            .into_iter()
            .filter_map(|(base, extensions)| {
                ConflictSeverity::from_extensions(extensions).map(|s| (base.to_string(), s))
            })
            .collect();

        let mut rows: Vec<ListingRow> = winners
            .into_iter()
            .map(|(key, (label, file))| {
                let conflict = severities.get(base_key(&key)).copied();
                to_row(&label, file, conflict)
            })
            .collect();
        rows.extend(hidden_rows);

        tracing::debug!(
            rows = rows.len(),
            conflicts = severities.len(),
            shadowed,
            "Resolved texture overrides"
        );
        TextureListing::new(rows, shadowed)
    }
}

fn to_row(label: &str, file: ScannedFile, conflict: Option<ConflictSeverity>) -> ListingRow {
    ListingRow {
        rel_path: file.rel_path,
        source: label.to_string(),
        conflict,
        hidden: file.hidden,
        size: file.size,
        modified: file.modified,
        path: file.path,
    }
}

/// Walk a source and collect its texture files in file-name order.
///
/// Unreadable entries are skipped with a warning; a missing root yields nothing.
fn scan_source(source: &OverrideSource) -> Vec<ScannedFile> {
    if !source.root.is_dir() {
        tracing::debug!("Override source {} does not exist: {}", source.label, source.root);
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&source.root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", source.label, e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = match Utf8PathBuf::from_path_buf(entry.path().to_path_buf()) {
            Ok(p) => p,
            Err(p) => {
                tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                continue;
            }
        };
        let Ok(rel) = path.strip_prefix(&source.root) else {
            continue;
        };
        let Some(file_name) = rel.file_name() else {
            continue;
        };

        let (target_name, hidden) = match strip_hidden_suffix(file_name) {
            Some(stem) => (stem, true),
            None => (file_name, false),
        };
        let Some(extension) = texture_extension(target_name) else {
            continue;
        };

        let rel_path = match rel.parent().filter(|p| !p.as_str().is_empty()) {
            Some(parent) => format!("{}/{}", parent.as_str().replace('\\', "/"), target_name),
            None => target_name.to_string(),
        };

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path, e);
                continue;
            }
        };

        files.push(ScannedFile {
            rel_path,
            extension,
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            path,
            hidden,
        });
    }
    files
}
