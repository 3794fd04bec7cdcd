mod config;
mod error;
mod manifest;
mod project;
mod state;

pub const DEFAULT_STATE_DIR: &str = ".conver";
pub const STATE_FILE_NAME: &str = "state.toml";

pub use config::{ConverConfig, parse_config};
pub use error::ProjectError;
pub use project::{CargoProject, ProjectKind, ProjectPackage, discover_project};
pub use state::StateFile;

pub type Result<T> = std::result::Result<T, ProjectError>;
