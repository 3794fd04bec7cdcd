use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid version '{input}'")]
    InvalidVersion {
        input: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid pre-release identifier '{id}'")]
    InvalidPreReleaseId {
        id: String,
        #[source]
        source: semver::Error,
    },
}

pub type Result<T> = std::result::Result<T, VersionError>;
