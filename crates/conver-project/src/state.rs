use std::path::{Path, PathBuf};

use conver_core::StickyState;

use crate::config::ConverConfig;
use crate::error::ProjectError;

/// Location of the sticky state file.
/// File: `<state-dir>/state.toml`
/// Format:
/// ```toml
/// base = "3f2a9c1"
/// branch = "main"
///
/// [promotions]
/// my-crate = "major"
///
/// [pre-releases]
/// my-crate = "1.2.3"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn for_project(root: &Path, config: &ConverConfig) -> Self {
        Self::new(root.join(config.state_dir()).join(crate::STATE_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Returns `None` when the project has not been initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<StickyState>, ProjectError> {
        if !self.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| ProjectError::StateRead {
                path: self.path.clone(),
                source,
            })?;
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ProjectError::StateParse {
                path: self.path.clone(),
                source,
            })
    }

    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized or written.
    pub fn save(&self, state: &StickyState) -> Result<(), ProjectError> {
        let content = toml::to_string(state)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ProjectError::StateWrite {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| ProjectError::StateWrite {
            path: self.path.clone(),
            source,
        })
    }
}
