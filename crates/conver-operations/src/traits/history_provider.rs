use std::path::Path;

use conver_core::Commit;

use crate::Result;

/// Read-only access to the version control history of a project.
pub trait HistoryProvider: Send + Sync {
    /// Commits reachable from HEAD but not from `base`, newest first, with
    /// absolute file paths. Without a base the whole history is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or `base` does not
    /// resolve.
    fn commits_since(&self, project_root: &Path, base: Option<&str>) -> Result<Vec<Commit>>;

    /// Returns `None` for a repository without commits.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn head_sha(&self, project_root: &Path) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or HEAD is detached.
    fn current_branch(&self, project_root: &Path) -> Result<String>;

    /// Resolves a revision such as `HEAD~1` to a commit sha, or `None` if it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn resolve(&self, project_root: &Path, revision: &str) -> Result<Option<String>>;
}
