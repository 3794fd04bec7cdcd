use regex::Regex;

use crate::error::{CoreError, Result};

/// Package name pattern where `*` stands for one or more characters.
#[derive(Debug, Clone)]
pub struct PackagePattern {
    source: String,
    regex: Regex,
}

impl PackagePattern {
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPattern` if the translated expression is
    /// rejected by the regex engine.
    pub fn new(pattern: &str) -> Result<Self> {
        let expression = format!("^{}$", regex::escape(pattern).replace(r"\*", ".+"));
        let regex = Regex::new(&expression).map_err(|source| CoreError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// # Errors
    ///
    /// Returns the first pattern that fails to compile.
    pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Self>> {
        patterns.iter().map(|p| Self::new(p.as_ref())).collect()
    }

    #[must_use]
    pub fn any_matches(patterns: &[Self], name: &str) -> bool {
        patterns.iter().any(|p| p.matches(name))
    }
}
