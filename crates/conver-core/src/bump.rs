use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Severity of a version increment.
///
/// Variants are ordered so that `max` picks the most severe bump, which is
/// what every propagation rule relies on.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
    #[default]
    #[value(skip)]
    None,
    Patch,
    Minor,
    Major,
}

impl Bump {
    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }

    /// Parses the lowercase names used in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "patch" => Some(Self::Patch),
            "minor" => Some(Self::Minor),
            "major" => Some(Self::Major),
            _ => None,
        }
    }
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
