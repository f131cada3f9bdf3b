use crate::errors::CliError;
use crate::utils::config::{self, AppConfig};
use camino::{Utf8Path, Utf8PathBuf};
use colored::Colorize;
use miette::Result;
use tsl_mod_core::{is_valid_game_dir, ModList, GAME_BINARY};

fn update_config(update: impl FnOnce(&mut AppConfig)) -> Result<()> {
    let mut cfg = config::load_config();
    update(&mut cfg);
    config::save_config(&cfg).map_err(|e| miette::miette!("Failed to save config: {}", e))
}

/// Print a config path entry with status indicator
fn print_path_config(name: &str, path: Option<&Utf8PathBuf>, validator: impl Fn(&Utf8Path) -> bool) {
    match path {
        Some(p) => {
            let status = if validator(p.as_path()) {
                "✓".bright_green()
            } else {
                "✗".bright_red()
            };
            println!("  {} {} {}", format!("{}:", name).bright_white(), p, status);
        }
        None => {
            println!(
                "  {} {}",
                format!("{}:", name).bright_white(),
                "(not set)".bright_yellow()
            );
        }
    }
}

fn print_saved(label: &str, path: &Utf8Path) {
    println!("{}", format!("✓ {} set successfully!", label).bright_green().bold());
    println!();
    println!(
        "  {} {}",
        "Path:".bright_white().bold(),
        path.as_str().bright_green()
    );
}

pub fn show_config() -> Result<()> {
    let cfg = config::load_config();
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    println!();
    println!("  {} {}", "config_file:".bright_white(), config_path);

    print_path_config("game_path", cfg.game_path.as_ref(), is_valid_game_dir);
    print_path_config("mods_dir", cfg.mods_dir.as_ref(), |p| p.is_dir());
    print_path_config("modlist_path", cfg.modlist_path.as_ref(), |p| p.is_file());

    println!();
    Ok(())
}

pub fn set_game_path(path: String) -> Result<()> {
    let mut path = Utf8PathBuf::from(&path);
    // Accept the executable itself as well as its folder.
    if path
        .file_name()
        .is_some_and(|name| name.eq_ignore_ascii_case(GAME_BINARY))
    {
        if let Some(parent) = path.parent() {
            path = parent.to_path_buf();
        }
    }

    if !is_valid_game_dir(&path) {
        eprintln!(
            "  {}",
            format!("The path must point to the folder containing {}.", GAME_BINARY)
                .bright_yellow()
        );
        eprintln!(
            "  {}",
            "Example: C:\\Program Files (x86)\\Steam\\steamapps\\common\\Knights of the Old Republic II"
                .bright_yellow()
        );
        eprintln!();
        return Err(CliError::InvalidGamePath { path }.into());
    }

    update_config(|cfg| cfg.game_path = Some(path.clone()))?;
    print_saved("Game path", &path);
    Ok(())
}

pub fn set_mods_dir(path: String) -> Result<()> {
    let path = Utf8PathBuf::from(&path);
    if !path.is_dir() {
        return Err(CliError::directory_not_found(path).into());
    }

    update_config(|cfg| cfg.mods_dir = Some(path.clone()))?;
    print_saved("Mods directory", &path);
    Ok(())
}

pub fn set_modlist(path: String) -> Result<()> {
    let path = Utf8PathBuf::from(&path);
    if !path.is_file() {
        return Err(CliError::file_not_found(path).into());
    }
    let mod_list = ModList::read(&path).map_err(CliError::from)?;

    update_config(|cfg| cfg.modlist_path = Some(path.clone()))?;
    print_saved("Mod list", &path);
    println!(
        "  {} {} of {} entries",
        "Active mods:".bright_white().bold(),
        mod_list.active().count(),
        mod_list.entries().len()
    );
    Ok(())
}

pub fn reset_config() -> Result<()> {
    let config_path = config::default_config_path()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    config::save_config(&AppConfig::default())
        .map_err(|e| miette::miette!("Failed to reset config: {}", e))?;

    println!(
        "{}",
        "✓ Configuration reset to defaults".bright_green().bold()
    );
    println!();
    println!("  {} {}", "Config file:".bright_white().bold(), config_path);
    println!();
    println!(
        "  {}",
        "Run 'tsl-mod config set-game-path <dir>' to point at your KotOR II installation"
            .bright_cyan()
    );

    Ok(())
}
