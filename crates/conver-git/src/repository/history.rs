use std::path::PathBuf;

use crate::{CommitRecord, FileChange, FileStatus, GitError, Result};

use super::Repository;

impl Repository {
    /// Commits reachable from HEAD but not from `base`, newest first.
    ///
    /// Without a base the whole history is returned. A repository without
    /// commits has an empty history.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if `base` cannot be resolved.
    pub fn commits_since(&self, base: Option<&str>) -> Result<Vec<CommitRecord>> {
        if self.head_commit()?.is_none() {
            return Ok(Vec::new());
        }

        let mut walk = self.inner.revwalk()?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        walk.push_head()?;

        if let Some(refspec) = base {
            let object = self
                .inner
                .revparse_single(refspec)
                .map_err(|_| GitError::RefNotFound {
                    refspec: refspec.to_string(),
                })?;
            walk.hide(object.peel_to_commit()?.id())?;
        }

        let mut records = Vec::new();
        for oid in walk {
            let commit = self.inner.find_commit(oid?)?;
            records.push(CommitRecord {
                sha: commit.id().to_string(),
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
                changes: self.first_parent_changes(&commit)?,
            });
        }

        Ok(records)
    }

    /// Files changed by `commit` relative to its first parent. Root commits
    /// report no changes.
    fn first_parent_changes(&self, commit: &git2::Commit<'_>) -> Result<Vec<FileChange>> {
        if commit.parent_count() == 0 {
            return Ok(Vec::new());
        }

        let parent_tree = commit.parent(0)?.tree()?;
        let tree = commit.tree()?;
        let mut diff = self
            .inner
            .diff_tree_to_tree(Some(&parent_tree), Some(&tree), None)?;

        let mut find_opts = git2::DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let status = match delta.status() {
                git2::Delta::Added | git2::Delta::Copied => FileStatus::Added,
                git2::Delta::Deleted => FileStatus::Deleted,
                git2::Delta::Modified | git2::Delta::Typechange => FileStatus::Modified,
                git2::Delta::Renamed => FileStatus::Renamed,
                _ => continue,
            };

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(PathBuf::from)
                .ok_or(GitError::MissingDeltaPath)?;

            let mut change = FileChange::new(path, status);
            if status == FileStatus::Renamed {
                if let Some(old_path) = delta.old_file().path() {
                    change = change.with_old_path(old_path.to_path_buf());
                }
            }
            changes.push(change);
        }

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::super::tests::{commit_files, setup_test_repo};
    use crate::{FileStatus, GitError};

    #[test]
    fn history_since_base_is_newest_first() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let base = repo.head_sha()?;
        commit_files(&repo, "fix: first", &[("a.txt", "1")], &[])?;
        commit_files(&repo, "feat: second", &[("b.txt", "2")], &[])?;

        let history = repo.commits_since(Some(&base))?;

        let headers: Vec<_> = history.iter().map(|c| c.header()).collect();
        assert_eq!(headers, ["feat: second", "fix: first"]);
        Ok(())
    }

    #[test]
    fn history_without_base_includes_root() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        commit_files(&repo, "fix: first", &[("a.txt", "1")], &[])?;

        let history = repo.commits_since(None)?;

        assert_eq!(history.len(), 2);
        assert_eq!(history[1].header(), "Initial commit");
        assert!(history[1].changes.is_empty());
        Ok(())
    }

    #[test]
    fn changes_are_relative_to_first_parent() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        commit_files(&repo, "chore: seed", &[("keep.txt", "k"), ("old.txt", "o")], &[])?;
        let base = repo.head_sha()?;
        commit_files(
            &repo,
            "fix: edit",
            &[("keep.txt", "changed"), ("crates/a/new.rs", "n")],
            &["old.txt"],
        )?;

        let history = repo.commits_since(Some(&base))?;

        let mut changes: Vec<_> = history[0]
            .changes
            .iter()
            .map(|c| (c.path.clone(), c.status))
            .collect();
        changes.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            changes,
            [
                (PathBuf::from("crates/a/new.rs"), FileStatus::Added),
                (PathBuf::from("keep.txt"), FileStatus::Modified),
                (PathBuf::from("old.txt"), FileStatus::Deleted),
            ]
        );
        Ok(())
    }

    #[test]
    fn renames_keep_old_path() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let content = "a reasonably long line of content so rename detection has material";
        commit_files(&repo, "chore: add", &[("original.txt", content)], &[])?;
        commit_files(&repo, "refactor: move", &[("renamed.txt", content)], &["original.txt"])?;

        let history = repo.commits_since(Some("HEAD~1"))?;

        let change = &history[0].changes[0];
        assert_eq!(change.status, FileStatus::Renamed);
        assert_eq!(change.path, PathBuf::from("renamed.txt"));
        assert_eq!(change.old_path, Some(PathBuf::from("original.txt")));
        Ok(())
    }

    #[test]
    fn unknown_base_is_an_error() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        let result = repo.commits_since(Some("does-not-exist"));

        assert!(matches!(result, Err(GitError::RefNotFound { .. })));
        Ok(())
    }

    #[test]
    fn empty_repository_has_empty_history() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        git2::Repository::init(dir.path())?;
        let repo = super::Repository::open(dir.path())?;

        assert!(repo.commits_since(None)?.is_empty());
        Ok(())
    }
}
