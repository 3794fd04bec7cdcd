use std::path::Path;

use conver_project::{CargoProject, ConverConfig, discover_project, parse_config};

use crate::Result;
use crate::traits::ProjectProvider;

pub struct FileSystemProjectProvider;

impl FileSystemProjectProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemProjectProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectProvider for FileSystemProjectProvider {
    fn discover_project(&self, start_path: &Path) -> Result<CargoProject> {
        Ok(discover_project(start_path)?)
    }

    fn load_config(&self, project: &CargoProject) -> Result<ConverConfig> {
        Ok(parse_config(project)?)
    }
}
