use std::path::Path;

use conver_core::StickyState;
use conver_project::StateFile;

use crate::Result;
use crate::traits::StateIO;

pub struct FileSystemStateIO;

impl FileSystemStateIO {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemStateIO {
    fn default() -> Self {
        Self::new()
    }
}

impl StateIO for FileSystemStateIO {
    fn load_state(&self, path: &Path) -> Result<Option<StickyState>> {
        Ok(StateFile::new(path).load()?)
    }

    fn save_state(&self, path: &Path, state: &StickyState) -> Result<()> {
        Ok(StateFile::new(path).save(state)?)
    }
}
