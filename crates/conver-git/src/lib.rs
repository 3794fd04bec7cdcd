//! Read-only access to the git history that drives version planning.

mod error;
mod repository;
mod types;

pub use error::GitError;
pub use repository::Repository;
pub use types::{CommitRecord, FileChange, FileStatus};

pub type Result<T> = std::result::Result<T, GitError>;
