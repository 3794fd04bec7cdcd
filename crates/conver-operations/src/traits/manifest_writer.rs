use std::path::PathBuf;

use conver_core::VersionUpdate;
use conver_manifest::{DependencyEdit, RangePolicy};

use crate::Result;

/// Everything needed to apply a plan to the manifests of a project.
#[derive(Debug, Clone)]
pub struct ManifestWriteRequest<'a> {
    /// Each updated package with its manifest path.
    pub targets: Vec<(PathBuf, &'a VersionUpdate)>,
    /// Manifests scanned for dependency requirements on updated packages.
    pub dependents: Vec<PathBuf>,
    pub update_dependencies: bool,
    pub policy: RangePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestWriteReport {
    pub written: Vec<PathBuf>,
    /// Packages whose `version.workspace = true` was replaced by a literal.
    pub inherited_replaced: Vec<String>,
    pub dependency_edits: Vec<(PathBuf, DependencyEdit)>,
}

pub trait ManifestWriter: Send + Sync {
    /// Writes all version and requirement changes as one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest cannot be read, parsed or written. When
    /// a write fails, manifests already written are restored.
    fn apply(&self, request: &ManifestWriteRequest<'_>) -> Result<ManifestWriteReport>;
}
