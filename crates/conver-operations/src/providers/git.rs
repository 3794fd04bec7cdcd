use std::path::Path;

use conver_core::{Commit, FileChange, FileChangeKind};
use conver_git::{CommitRecord, FileStatus, GitError, Repository};

use crate::Result;
use crate::traits::HistoryProvider;

pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryProvider for Git2Provider {
    fn commits_since(&self, project_root: &Path, base: Option<&str>) -> Result<Vec<Commit>> {
        let repo = Repository::open(project_root)?;
        let records = repo.commits_since(base)?;
        tracing::debug!(commits = records.len(), base, "read commit history");

        Ok(records
            .iter()
            .map(|record| commit_from_record(record, repo.root()))
            .collect())
    }

    fn head_sha(&self, project_root: &Path) -> Result<Option<String>> {
        let repo = Repository::open(project_root)?;
        match repo.head_sha() {
            Ok(sha) => Ok(Some(sha)),
            Err(GitError::NoCommits) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn current_branch(&self, project_root: &Path) -> Result<String> {
        let repo = Repository::open(project_root)?;
        Ok(repo.current_branch()?)
    }

    fn resolve(&self, project_root: &Path, revision: &str) -> Result<Option<String>> {
        let repo = Repository::open(project_root)?;
        match repo.resolve(revision) {
            Ok(sha) => Ok(Some(sha)),
            Err(GitError::RefNotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Converts a git commit into the engine's commit model.
///
/// The type comes from the conventional-commit header; a header that does not
/// parse leaves it unset. Paths are joined to `repo_root`, and a rename is
/// reported as a deletion of the old path plus an addition of the new one.
#[must_use]
pub fn commit_from_record(record: &CommitRecord, repo_root: &Path) -> Commit {
    let header = record.header().to_string();
    let commit_type = git_conventional::Commit::parse(&header)
        .ok()
        .map(|parsed| parsed.type_().to_string());

    let mut diff = Vec::with_capacity(record.changes.len());
    for change in &record.changes {
        let path = repo_root.join(&change.path);
        match change.status {
            FileStatus::Added => diff.push(FileChange::new(FileChangeKind::Added, path)),
            FileStatus::Modified => diff.push(FileChange::new(FileChangeKind::Modified, path)),
            FileStatus::Deleted => diff.push(FileChange::new(FileChangeKind::Deleted, path)),
            FileStatus::Renamed => {
                if let Some(old_path) = &change.old_path {
                    diff.push(FileChange::new(
                        FileChangeKind::Deleted,
                        repo_root.join(old_path),
                    ));
                }
                diff.push(FileChange::new(FileChangeKind::Added, path));
            }
        }
    }

    Commit {
        hash: record.sha.clone(),
        commit_type,
        header,
        diff,
    }
}
