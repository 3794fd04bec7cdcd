use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD is not on a branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head()?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// # Errors
    ///
    /// Returns [`GitError::NoCommits`] for a repository without commits.
    pub fn head_sha(&self) -> Result<String> {
        self.head_commit()?
            .map(|commit| commit.id().to_string())
            .ok_or(GitError::NoCommits)
    }

    /// Resolves a revision such as `HEAD~1` to a commit sha.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the revision does not name a commit.
    pub fn resolve(&self, refspec: &str) -> Result<String> {
        let not_found = || GitError::RefNotFound {
            refspec: refspec.to_string(),
        };

        let object = self.inner.revparse_single(refspec).map_err(|_| not_found())?;
        let commit = object.peel_to_commit().map_err(|_| not_found())?;
        Ok(commit.id().to_string())
    }

    pub(crate) fn head_commit(&self) -> Result<Option<git2::Commit<'_>>> {
        match self.inner.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{commit_files, setup_test_repo};
    use crate::GitError;

    #[test]
    fn current_branch_on_main() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let branch = repo.current_branch()?;
        assert!(branch == "main" || branch == "master");
        Ok(())
    }

    #[test]
    fn head_sha_matches_last_commit() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let sha = commit_files(&repo, "feat: add", &[("a.txt", "a")], &[])?;

        assert_eq!(repo.head_sha()?, sha);
        Ok(())
    }

    #[test]
    fn resolve_parent_revision() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let first = repo.head_sha()?;
        commit_files(&repo, "fix: change", &[("a.txt", "a")], &[])?;

        assert_eq!(repo.resolve("HEAD~1")?, first);
        Ok(())
    }

    #[test]
    fn resolve_past_root_fails() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        let result = repo.resolve("HEAD~1");

        assert!(matches!(result, Err(GitError::RefNotFound { refspec }) if refspec == "HEAD~1"));
        Ok(())
    }

    #[test]
    fn empty_repository_has_no_head() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        git2::Repository::init(dir.path())?;
        let repo = super::Repository::open(dir.path())?;

        assert!(matches!(repo.head_sha(), Err(GitError::NoCommits)));
        Ok(())
    }
}
