use conver_manifest::{ManifestBatch, VersionWrite};
use tracing::debug;

use crate::Result;
use crate::traits::{ManifestWriteReport, ManifestWriteRequest, ManifestWriter};

pub struct FileSystemManifestWriter;

impl FileSystemManifestWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemManifestWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestWriter for FileSystemManifestWriter {
    fn apply(&self, request: &ManifestWriteRequest<'_>) -> Result<ManifestWriteReport> {
        let mut batch = ManifestBatch::new();
        let mut report = ManifestWriteReport::default();

        for (manifest_path, update) in &request.targets {
            let write = batch
                .document(manifest_path)?
                .set_version(&update.new_version)?;
            if write == VersionWrite::ReplacedInherited {
                report.inherited_replaced.push(update.name.clone());
            }
        }

        if request.update_dependencies {
            for manifest_path in &request.dependents {
                let document = batch.document(manifest_path)?;
                for (_, update) in &request.targets {
                    for edit in
                        document.update_dependency(&update.name, &update.new_version, request.policy)
                    {
                        debug!(
                            manifest = %manifest_path.display(),
                            dependency = %update.name,
                            outcome = ?edit.outcome,
                            "dependency requirement"
                        );
                        report.dependency_edits.push((manifest_path.clone(), edit));
                    }
                }
            }
        }

        report.written = batch.write()?;
        Ok(report)
    }
}
