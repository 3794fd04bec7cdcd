use std::path::Path;

use conver_project::{CargoProject, ConverConfig};

use crate::Result;

pub trait ProjectProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no project can be found from the given path.
    fn discover_project(&self, start_path: &Path) -> Result<CargoProject>;

    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or cannot be read.
    fn load_config(&self, project: &CargoProject) -> Result<ConverConfig>;
}
