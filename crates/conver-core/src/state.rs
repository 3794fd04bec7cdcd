use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::Bump;

/// State that survives between runs: the history baseline, manual
/// promotions, and the stable versions packages left when entering
/// pre-release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StickyState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub promotions: IndexMap<String, Bump>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub pre_releases: IndexMap<String, Version>,
}

impl StickyState {
    #[must_use]
    pub fn promotion(&self, package: &str) -> Bump {
        self.promotions.get(package).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn pre_release_origin(&self, package: &str) -> Option<&Version> {
        self.pre_releases.get(package)
    }

    pub fn set_promotion(&mut self, package: impl Into<String>, bump: Bump) {
        let package = package.into();
        if bump.is_none() {
            self.promotions.shift_remove(&package);
        } else {
            self.promotions.insert(package, bump);
        }
    }

    pub fn record_pre_release(&mut self, package: impl Into<String>, origin: Version) {
        self.pre_releases.insert(package.into(), origin);
    }

    pub fn clear_pre_release(&mut self, package: &str) -> Option<Version> {
        self.pre_releases.shift_remove(package)
    }
}
