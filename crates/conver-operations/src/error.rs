use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] conver_core::CoreError),

    #[error(transparent)]
    Git(#[from] conver_git::GitError),

    #[error(transparent)]
    Project(#[from] conver_project::ProjectError),

    #[error(transparent)]
    Manifest(#[from] conver_manifest::ManifestError),

    #[error(transparent)]
    Plan(#[from] conver_engine::PlanError),

    #[error("version calculation failed")]
    Version(#[from] conver_version::VersionError),

    #[error("project is not initialized (no state file at '{path}'); run `cargo conver init`")]
    NotInitialized { path: PathBuf },

    #[error("project is already initialized (state file exists at '{path}')")]
    AlreadyInitialized { path: PathBuf },

    #[error("revision '{revision}' does not exist")]
    UnknownRevision { revision: String },

    #[error("no packages found in project at '{0}'")]
    EmptyProject(PathBuf),

    #[error("unknown package '{name}' (available: {available})")]
    UnknownPackage { name: String, available: String },

    #[error("no packages selected")]
    NoPackagesSelected,

    #[error("{reason}")]
    InteractionRequired { reason: &'static str },

    #[error("interactive prompt failed")]
    Prompt(#[source] std::io::Error),

    #[error("packages are already in pre-release: {}", packages.join(", "))]
    AlreadyInPreRelease { packages: Vec<String> },

    #[error("packages are not in pre-release: {}", packages.join(", "))]
    NotInPreRelease { packages: Vec<String> },
}

pub type Result<T> = std::result::Result<T, OperationError>;
