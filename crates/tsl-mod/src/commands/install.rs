use std::fs::{self, File};

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::config;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use colored::Colorize;
use inquire::list_option::ListOption;
use inquire::Select;
use miette::{IntoDiagnostic, Result};
use tsl_layout::{fix, load_directory, safe_join, ChoiceRequest, FixAction, FixOutcome, ModArchive};
use tsl_mod_core::FileTree;

pub struct InstallModArgs {
    pub path: String,
    pub name: Option<String>,
    pub force: bool,
}

/// Where the files of a loaded mod come from.
pub(crate) enum ModInput {
    Archive(ModArchive<File>),
    Directory,
}

/// A mod archive or extracted folder loaded into a virtual tree.
pub(crate) struct LoadedMod {
    pub input: ModInput,
    pub tree: FileTree,
}

impl LoadedMod {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if path.is_dir() {
            let tree = load_directory(path).map_err(CliError::from)?;
            return Ok(Self {
                input: ModInput::Directory,
                tree,
            });
        }
        if !path.is_file() {
            return Err(CliError::file_not_found(path).into());
        }

        let mut archive = ModArchive::open(path).map_err(CliError::from)?;
        let tree = archive.to_tree().map_err(CliError::from)?;
        Ok(Self {
            input: ModInput::Archive(archive),
            tree,
        })
    }

    fn install(&mut self, target: &Utf8Path) -> Result<usize> {
        let written = match &mut self.input {
            ModInput::Archive(archive) => archive.install(&self.tree, target),
            ModInput::Directory => tsl_layout::install_tree(&self.tree, target),
        };
        Ok(written.map_err(CliError::from)?)
    }
}

pub(crate) fn describe_action(action: FixAction) -> &'static str {
    match action {
        FixAction::PatchBundle => "kept the TSLPatcher folder",
        FixAction::PromotedFolder => "moved the mod folder to the top level",
        FixAction::Flattened => "moved the files of the wrapping folder into override",
        FixAction::LooseFiles => "moved loose files into override",
    }
}

fn prompt_choice(request: &ChoiceRequest) -> Result<usize> {
    let answer = Select::new(request.prompt(), request.options.clone())
        .raw_prompt()
        .into_diagnostic()?;
    choice_index(request, answer)
}

/// The index of the picked option. Labels are not matched, so equal labels stay distinct.
fn choice_index(request: &ChoiceRequest, answer: ListOption<String>) -> Result<usize> {
    if answer.index < request.options.len() {
        Ok(answer.index)
    } else {
        Err(miette::miette!("Unknown selection '{}'", answer.value))
    }
}

/// Normalize the tree, asking the user whenever the layout is ambiguous.
fn normalize(tree: &mut FileTree, source: &Utf8Path) -> Result<FixOutcome> {
    let mut selection = None;
    loop {
        match fix(tree, selection).map_err(CliError::from)? {
            FixOutcome::ChoiceRequired(request) => {
                selection = Some(prompt_choice(&request)?);
            }
            FixOutcome::NotFixable => {
                return Err(CliError::InvalidModLayout {
                    path: source.to_path_buf(),
                }
                .into());
            }
            outcome => return Ok(outcome),
        }
    }
}

fn default_mod_name(path: &Utf8Path) -> Result<String> {
    let name = if path.is_dir() {
        path.file_name()
    } else {
        path.file_stem()
    };
    name.map(str::to_string)
        .ok_or_else(|| miette::miette!("Cannot derive a mod name from '{}', pass --name", path))
}

/// Resolve the install folder for `name`, refusing names and sources that would
/// let a reinstall delete something outside the new copy.
fn prepare_target(mods_dir: &Utf8Path, name: &str, source: &Utf8Path, force: bool) -> Result<Utf8PathBuf> {
    let mut components = Utf8Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Utf8Component::Normal(_)), None)
    );
    if !single || name.contains(':') {
        return Err(CliError::InvalidModName {
            name: name.to_string(),
        }
        .into());
    }
    let target = safe_join(mods_dir, name).map_err(CliError::from)?;
    if !target.exists() {
        return Ok(target);
    }
    if !force {
        return Err(CliError::ModAlreadyInstalled {
            name: name.to_string(),
            path: target,
        }
        .into());
    }

    if let (Ok(source_real), Ok(target_real)) = (source.canonicalize_utf8(), target.canonicalize_utf8()) {
        if source_real.starts_with(&target_real) {
            return Err(CliError::SourceInsideTarget {
                name: name.to_string(),
                source_path: source.to_path_buf(),
            }
            .into());
        }
    }
    Ok(target)
}

/// Install into a sibling staging folder, then swap it with `target`.
///
/// An existing install is only removed once the new copy is complete.
fn replace_dir(loaded: &mut LoadedMod, target: &Utf8Path) -> Result<usize> {
    let (parent, name) = match (target.parent(), target.file_name()) {
        (Some(parent), Some(name)) => (parent, name),
        _ => return Err(miette::miette!("Cannot install into '{}'", target)),
    };
    let staging = parent.join(format!(".{}.installing", name));
    let backup = parent.join(format!(".{}.old", name));

    // Leftovers of an interrupted run.
    if backup.exists() && !target.exists() {
        fs::rename(&backup, target).into_diagnostic()?;
    }
    for stale in [&staging, &backup] {
        if stale.exists() {
            fs::remove_dir_all(stale).into_diagnostic()?;
        }
    }

    fs::create_dir_all(&staging).into_diagnostic()?;
    let written = match loaded.install(&staging) {
        Ok(written) => written,
        Err(e) => {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }
    };

    let replaced = target.exists();
    if replaced {
        tracing::info!("Replacing existing mod at {}", target);
        if let Err(e) = fs::rename(target, &backup) {
            let _ = fs::remove_dir_all(&staging);
            return Err(CliError::from(e).into());
        }
    }
    if let Err(e) = fs::rename(&staging, target) {
        if replaced {
            let _ = fs::rename(&backup, target);
        }
        let _ = fs::remove_dir_all(&staging);
        return Err(CliError::from(e).into());
    }
    if replaced {
        if let Err(e) = fs::remove_dir_all(&backup) {
            tracing::warn!("Failed to remove old install at {}: {}", backup, e);
        }
    }
    Ok(written)
}

pub fn install_mod(args: InstallModArgs) -> Result<()> {
    let cfg = config::load_config();
    let mods_dir = cfg.mods_dir()?.clone();
    let source = Utf8PathBuf::from(&args.path);

    let name = match args.name {
        Some(name) => name,
        None => default_mod_name(&source)?,
    };
    let target = prepare_target(&mods_dir, &name, &source, args.force)?;

    let mut loaded = LoadedMod::load(&source)?;
    let outcome = normalize(&mut loaded.tree, &source)?;
    match outcome {
        FixOutcome::Fixed(action) => println_pad!(
            "{} {}",
            "🔧 Layout fixed:".bright_yellow(),
            describe_action(action)
        ),
        FixOutcome::AlreadyValid => {
            println_pad!("{}", "✓ Layout already valid".bright_green())
        }
        _ => {}
    }

    let written = replace_dir(&mut loaded, &target)?;

    println_pad!(
        "{} {} {}",
        "📦 Installed".bright_green().bold(),
        name.bright_cyan().bold(),
        format!("({} files)", written).dimmed()
    );
    println_pad!("{} {}", "📁 Location:".bright_blue(), target);
    Ok(())
}
