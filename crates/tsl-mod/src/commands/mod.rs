mod check;
pub mod config;
mod hidden;
mod install;
mod textures;
mod thumbnail;

pub use check::*;
pub use hidden::*;
pub use install::{install_mod, InstallModArgs};
pub use textures::*;
pub use thumbnail::*;
