use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    check_mod, export_thumbnail, hide_texture, install_mod, list_textures, unhide_all_textures,
    unhide_texture, CheckModArgs, InstallModArgs, TexturesArgs, ThumbnailArgs, ToggleArgs,
};
use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod errors;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show or change the tool configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Check whether a mod archive or folder has an installable layout
    Check {
        /// The path to the mod archive (.zip) or extracted folder
        path: String,
    },
    /// Normalize a mod and install it into the mods directory
    Install {
        /// The path to the mod archive (.zip) or extracted folder
        path: String,

        /// The folder name to install the mod under
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an installed mod with the same name
        #[arg(long)]
        force: bool,
    },
    /// List texture overrides of the game and the active mods
    Textures {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,

        /// Only show textures that clash with another extension
        #[arg(long)]
        conflicts_only: bool,
    },
    /// Hide a texture so the game no longer loads it
    Hide {
        /// A file path, or a path relative to an override folder
        target: String,
    },
    /// Restore a hidden texture
    Unhide {
        /// A file path, or a path relative to an override folder
        target: String,
    },
    /// Restore every hidden texture
    UnhideAll,
    /// Convert a TGA image or save screenshot to PNG
    Thumbnail {
        /// The path to a .tga file or a save folder
        path: String,

        /// The PNG file to write
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Set the KotOR II installation folder
    SetGamePath { path: String },
    /// Set the folder installed mods live in
    SetModsDir { path: String },
    /// Set the mod list file deciding mod priority
    SetModlist { path: String },
    /// Reset the configuration to defaults
    Reset,
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(args.verbose);

    match args.command {
        Commands::Config { action } => match action {
            ConfigCommands::Show => commands::config::show_config(),
            ConfigCommands::SetGamePath { path } => commands::config::set_game_path(path),
            ConfigCommands::SetModsDir { path } => commands::config::set_mods_dir(path),
            ConfigCommands::SetModlist { path } => commands::config::set_modlist(path),
            ConfigCommands::Reset => commands::config::reset_config(),
        },
        Commands::Check { path } => check_mod(CheckModArgs { path }),
        Commands::Install { path, name, force } => install_mod(InstallModArgs { path, name, force }),
        Commands::Textures {
            json,
            conflicts_only,
        } => list_textures(TexturesArgs {
            json,
            conflicts_only,
        }),
        Commands::Hide { target } => hide_texture(ToggleArgs { target }),
        Commands::Unhide { target } => unhide_texture(ToggleArgs { target }),
        Commands::UnhideAll => unhide_all_textures(),
        Commands::Thumbnail { path, output } => export_thumbnail(ThumbnailArgs { path, output }),
    }
}
