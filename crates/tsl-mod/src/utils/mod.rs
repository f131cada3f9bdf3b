use camino::Utf8PathBuf;
use miette::Result;
use tsl_mod_core::{is_valid_game_dir, ModList};
use tsl_overlay::{discover_sources, OverrideResolver, OverrideSource};

use crate::errors::CliError;
use config::AppConfig;

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Builds the resolver for the configured game and active mod list.
///
/// Without a mod list only the game's own override folder is listed.
pub fn build_resolver(cfg: &AppConfig) -> Result<OverrideResolver> {
    let game_path = cfg.game_path()?;
    if !is_valid_game_dir(game_path) {
        return Err(CliError::InvalidGamePath {
            path: game_path.clone(),
        }
        .into());
    }

    let mut resolver = OverrideResolver::new(OverrideSource::game_override(game_path));
    match &cfg.modlist_path {
        Some(modlist_path) => {
            let mods_dir = cfg.mods_dir()?;
            let mod_list = ModList::read(modlist_path).map_err(CliError::from)?;
            let mod_dirs: Vec<Utf8PathBuf> = mod_list.active_mod_dirs(mods_dir);
            resolver.set_sources(discover_sources(&mod_dirs));
        }
        None => tracing::warn!("No mod list configured, listing the game override only"),
    }
    Ok(resolver)
}
