use semver::Version;
use serde::Serialize;

use crate::Bump;

/// One planned version change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionUpdate {
    pub name: String,
    pub old_version: Version,
    pub new_version: Version,
    pub bump: Bump,
}

impl VersionUpdate {
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.old_version != self.new_version
    }
}
