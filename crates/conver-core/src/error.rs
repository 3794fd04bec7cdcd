use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("package '{0}' is defined more than once in the workspace")]
    DuplicatePackage(String),

    #[error("invalid package pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
