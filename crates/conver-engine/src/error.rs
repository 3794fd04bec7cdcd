use conver_core::CoreError;
use conver_version::VersionError;
use semver::Version;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(
        "package '{package}' is at pre-release version {version} but no original stable version was recorded"
    )]
    MissingPreReleaseOrigin { package: String, version: Version },

    #[error("major version bumps are prevented, but planned for: {}", packages.join(", "))]
    MajorBumpPrevented { packages: Vec<String> },

    #[error("bump propagation did not settle after {passes} passes")]
    PropagationDiverged { passes: usize },

    #[error("invalid input pattern '{pattern}'")]
    InvalidInputPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Version(#[from] VersionError),
}

pub type Result<T> = std::result::Result<T, PlanError>;
