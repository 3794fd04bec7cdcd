use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeKind {
    Added,
    Modified,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub kind: FileChangeKind,
    pub path: PathBuf,
}

impl FileChange {
    #[must_use]
    pub fn new(kind: FileChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// A commit reduced to what versioning needs: its conventional type and the
/// files it touched relative to its first parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    /// `None` when the header is not a conventional commit.
    pub commit_type: Option<String>,
    pub header: String,
    pub diff: Vec<FileChange>,
}

impl Commit {
    #[must_use]
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}
