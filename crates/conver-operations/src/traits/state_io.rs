use std::path::Path;

use conver_core::StickyState;

use crate::Result;

/// Persists the sticky state between runs.
pub trait StateIO: Send + Sync {
    /// Returns `Ok(None)` if the state file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load_state(&self, path: &Path) -> Result<Option<StickyState>>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save_state(&self, path: &Path, state: &StickyState) -> Result<()>;
}
