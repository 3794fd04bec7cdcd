use conver_core::Bump;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSelection {
    Selected(Vec<String>),
    Cancelled,
}

/// Prompts used when a command is missing input. Implementations that
/// cannot prompt return `OperationError::InteractionRequired`.
pub trait InteractionProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn select_packages(&self, prompt: &str, available: &[String]) -> Result<PackageSelection>;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn select_bump(&self) -> Result<Option<Bump>>;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn input_text(&self, prompt: &str, default: Option<&str>) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}
