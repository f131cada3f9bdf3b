use crate::errors::CliError;
use crate::println_pad;
use crate::utils::{build_resolver, config};
use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use miette::Result;
use tsl_overlay::{hide, unhide, unhide_all, TextureListing};

pub struct ToggleArgs {
    /// A file path, or a path relative to an override folder.
    pub target: String,
}

#[derive(Clone, Copy)]
enum Toggle {
    Hide,
    Unhide,
}

/// Find the file a target refers to: an existing path, else a listing row.
fn locate(target: &str, toggle: Toggle) -> Result<Utf8PathBuf> {
    let path = Utf8Path::new(target);
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let listing = build_resolver(&config::load_config())?.resolve();
    find_in_listing(&listing, target, toggle).ok_or_else(|| CliError::texture_not_found(target).into())
}

fn find_in_listing(listing: &TextureListing, target: &str, toggle: Toggle) -> Option<Utf8PathBuf> {
    match toggle {
        Toggle::Hide => listing.winner(target).map(|row| row.path.clone()),
        Toggle::Unhide => {
            let wanted = target.replace('\\', "/");
            listing
                .hidden()
                .find(|row| row.rel_path.eq_ignore_ascii_case(&wanted))
                .map(|row| row.path.clone())
        }
    }
}

fn run(args: ToggleArgs, toggle: Toggle) -> Result<()> {
    let path = locate(&args.target, toggle)?;
    let renamed = match toggle {
        Toggle::Hide => hide(&path),
        Toggle::Unhide => unhide(&path),
    }
    .map_err(CliError::from)?;

    if renamed == path {
        println_pad!("{} {}", "• Unchanged:".bright_yellow(), path);
    } else {
        println_pad!("{} {} -> {}", "✓".bright_green(), path, renamed.as_str().bright_green());
    }
    Ok(())
}

pub fn hide_texture(args: ToggleArgs) -> Result<()> {
    run(args, Toggle::Hide)
}

pub fn unhide_texture(args: ToggleArgs) -> Result<()> {
    run(args, Toggle::Unhide)
}

/// Unhide every hidden texture, reporting each file.
pub fn unhide_all_textures() -> Result<()> {
    let listing = build_resolver(&config::load_config())?.resolve();
    let outcomes = unhide_all(&listing);
    if outcomes.is_empty() {
        println_pad!("{}", "No hidden textures".dimmed());
        return Ok(());
    }

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(path) => println_pad!("{} {}", "✓".bright_green(), path),
            Err(e) => {
                failed += 1;
                println_pad!("{} {} {}", "✗".bright_red(), outcome.path, format!("({})", e).dimmed());
            }
        }
    }

    if failed > 0 {
        return Err(CliError::UnhideFailed {
            failed,
            total: outcomes.len(),
        }
        .into());
    }
    println_pad!(
        "\n{}",
        format!("✓ Unhid {} files", outcomes.len()).bright_green().bold()
    );
    Ok(())
}
