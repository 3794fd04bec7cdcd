use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// A changed path, relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub status: FileStatus,
    pub old_path: Option<PathBuf>,
}

impl FileChange {
    #[must_use]
    pub fn new(path: PathBuf, status: FileStatus) -> Self {
        Self {
            path,
            status,
            old_path: None,
        }
    }

    #[must_use]
    pub fn with_old_path(mut self, old_path: PathBuf) -> Self {
        self.old_path = Some(old_path);
        self
    }
}

/// A commit with the files it changed relative to its first parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub message: String,
    pub changes: Vec<FileChange>,
}

impl CommitRecord {
    #[must_use]
    pub fn header(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}
