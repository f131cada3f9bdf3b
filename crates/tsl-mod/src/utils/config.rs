//! Application configuration stored next to the executable.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;

use crate::errors::CliError;

/// Application-wide configuration stored in config.toml.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding swkotor2.exe.
    pub game_path: Option<Utf8PathBuf>,
    /// Directory with one sub-directory per installed mod.
    pub mods_dir: Option<Utf8PathBuf>,
    /// Mod list deciding which mods are active and in which order.
    pub modlist_path: Option<Utf8PathBuf>,
}

impl AppConfig {
    pub fn game_path(&self) -> Result<&Utf8PathBuf, CliError> {
        self.game_path.as_ref().ok_or(CliError::GamePathNotSet)
    }

    pub fn mods_dir(&self) -> Result<&Utf8PathBuf, CliError> {
        self.mods_dir.as_ref().ok_or(CliError::ModsDirNotSet)
    }
}

/// Returns the directory where the current executable resides.
pub fn install_dir() -> Option<Utf8PathBuf> {
    let exe = env::current_exe().ok()?;
    let parent = exe.parent()?;
    Utf8PathBuf::from_path_buf(parent.to_path_buf()).ok()
}

/// Returns the default configuration file path (config.toml).
pub fn default_config_path() -> Option<Utf8PathBuf> {
    install_dir().map(|dir| dir.join("config.toml"))
}

/// Parses a config file, falling back to defaults on invalid TOML.
pub fn parse_config(content: &str) -> AppConfig {
    toml::from_str(content).unwrap_or_else(|e| {
        tracing::warn!("Ignoring unparsable config: {}", e);
        AppConfig::default()
    })
}

/// Loads the application configuration from config.toml.
/// Returns default configuration if file doesn't exist or cannot be parsed.
pub fn load_config() -> AppConfig {
    default_config_path()
        .and_then(|path| fs::read_to_string(path).ok())
        .map(|content| parse_config(&content))
        .unwrap_or_default()
}

/// Saves the application configuration to config.toml.
pub fn save_config(cfg: &AppConfig) -> io::Result<()> {
    let path = default_config_path().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not determine config path")
    })?;
    let content = toml::to_string_pretty(cfg).map_err(io::Error::other)?;
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let cfg = parse_config(
            r#"
game_path = "C:/Games/KotOR2"
mods_dir = "C:/MO2/mods"
"#,
        );
        assert_eq!(cfg.game_path, Some(Utf8PathBuf::from("C:/Games/KotOR2")));
        assert_eq!(cfg.mods_dir, Some(Utf8PathBuf::from("C:/MO2/mods")));
        assert_eq!(cfg.modlist_path, None);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        assert_eq!(parse_config("game_path = ["), AppConfig::default());
        assert!(matches!(
            AppConfig::default().game_path(),
            Err(CliError::GamePathNotSet)
        ));
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let cfg = AppConfig {
            modlist_path: Some(Utf8PathBuf::from("profiles/Default/modlist.txt")),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("modlist_path = \"profiles/Default/modlist.txt\""));
        assert_eq!(parse_config(&text), cfg);
    }
}
