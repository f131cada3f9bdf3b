use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Game path is not configured")]
    #[diagnostic(
        code(config::game_path_missing),
        help("Run 'tsl-mod config set-game-path <dir>' with the folder that contains swkotor2.exe")
    )]
    GamePathNotSet,

    #[error("Mods directory is not configured")]
    #[diagnostic(
        code(config::mods_dir_missing),
        help("Run 'tsl-mod config set-mods-dir <dir>' with the folder your mod manager installs mods into")
    )]
    ModsDirNotSet,

    #[error("Invalid game path: {path}")]
    #[diagnostic(
        code(config::invalid_game_path),
        help("The folder must contain swkotor2.exe")
    )]
    InvalidGamePath { path: Utf8PathBuf },

    #[error("Directory not found: {path}")]
    #[diagnostic(
        code(file::directory_not_found),
        help("Make sure the directory exists and the path is correct")
    )]
    DirectoryNotFound { path: Utf8PathBuf },

    #[error("File not found: {path}")]
    #[diagnostic(
        code(file::not_found),
        help("Make sure the file exists and the path is correct")
    )]
    FileNotFound { path: Utf8PathBuf },

    #[error("'{path}' does not look like a KotOR II mod")]
    #[diagnostic(
        code(layout::invalid),
        help("The archive has no game folders, no TSLPatcher data and no loose mod files. It may need a manual install.")
    )]
    InvalidModLayout { path: Utf8PathBuf },

    #[error("A mod named '{name}' is already installed")]
    #[diagnostic(
        code(install::already_installed),
        help("Pass --force to overwrite it or --name to install under another name")
    )]
    ModAlreadyInstalled { name: String, path: Utf8PathBuf },

    #[error("Invalid mod name '{name}'")]
    #[diagnostic(
        code(install::invalid_name),
        help("The name must be a single folder name, without path separators, '.' or '..'")
    )]
    InvalidModName { name: String },

    #[error("Cannot reinstall '{name}' from inside its own folder: {source_path}")]
    #[diagnostic(
        code(install::source_inside_target),
        help("Copy the mod somewhere else first, or install it under another --name")
    )]
    SourceInsideTarget { name: String, source_path: Utf8PathBuf },

    #[error("No texture matches '{query}'")]
    #[diagnostic(
        code(textures::not_found),
        help("Use a path relative to an override folder, as printed by 'tsl-mod textures'")
    )]
    TextureNotFound { query: String },

    #[error("Not an uncompressed 24/32-bit TGA image: {path}")]
    #[diagnostic(code(thumbnail::unsupported))]
    UnsupportedImage { path: Utf8PathBuf },

    #[error("No screenshot found in {path}")]
    #[diagnostic(
        code(thumbnail::missing),
        help("Save folders keep their screenshot in Screen.tga")
    )]
    ScreenshotNotFound { path: Utf8PathBuf },

    #[error("{failed} of {total} files could not be unhidden")]
    #[diagnostic(
        code(hidden::unhide_failed),
        help("A visible file with the same name already exists; hide or remove it first")
    )]
    UnhideFailed { failed: usize, total: usize },

    #[error(transparent)]
    #[diagnostic(code(layout::error))]
    Layout(#[from] tsl_layout::Error),

    #[error(transparent)]
    #[diagnostic(code(overlay::error))]
    Overlay(#[from] tsl_overlay::Error),

    #[error(transparent)]
    #[diagnostic(code(core::error))]
    Core(#[from] tsl_mod_core::Error),

    #[error("IO operation failed")]
    #[diagnostic(code(io::operation_failed))]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn directory_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::DirectoryNotFound { path: path.into() }
    }

    pub fn file_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn texture_not_found(query: impl Into<String>) -> Self {
        Self::TextureNotFound {
            query: query.into(),
        }
    }
}
