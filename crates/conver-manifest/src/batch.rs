use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::document::ManifestDocument;
use crate::error::ManifestError;

/// A set of manifests edited together and written as one unit.
///
/// If any write fails, manifests already written in the same batch are put
/// back to the text they were loaded from.
#[derive(Debug, Default)]
pub struct ManifestBatch {
    documents: IndexMap<PathBuf, ManifestDocument>,
}

impl ManifestBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the document for `path`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn document(&mut self, path: &Path) -> Result<&mut ManifestDocument, ManifestError> {
        let document = match self.documents.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(ManifestDocument::load(path)?),
        };
        Ok(document)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> impl Iterator<Item = &ManifestDocument> {
        self.documents.values()
    }

    /// Paths of manifests whose contents changed.
    #[must_use]
    pub fn modified_paths(&self) -> Vec<PathBuf> {
        self.documents
            .values()
            .filter(|doc| doc.is_modified())
            .map(|doc| doc.path().to_path_buf())
            .collect()
    }

    /// Writes every modified manifest and returns their paths.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Write` if a write fails and every earlier
    /// write was restored, or `ManifestError::PartialWrite` listing the
    /// manifests that could not be restored.
    pub fn write(self) -> Result<Vec<PathBuf>, ManifestError> {
        let mut written: Vec<&ManifestDocument> = Vec::new();

        for doc in self.documents.values().filter(|doc| doc.is_modified()) {
            if let Err(source) = std::fs::write(doc.path(), doc.contents()) {
                let unrestored = restore(&written);
                let path = doc.path().to_path_buf();
                if unrestored.is_empty() {
                    return Err(ManifestError::Write { path, source });
                }
                return Err(ManifestError::PartialWrite {
                    path,
                    unrestored,
                    source,
                });
            }
            written.push(doc);
        }

        Ok(written.iter().map(|doc| doc.path().to_path_buf()).collect())
    }
}

fn restore(written: &[&ManifestDocument]) -> Vec<PathBuf> {
    written
        .iter()
        .rev()
        .filter(|doc| std::fs::write(doc.path(), doc.original()).is_err())
        .map(|doc| doc.path().to_path_buf())
        .collect()
}

#[cfg(test)]
mod tests {
    use semver::Version;

    use super::*;

    const MANIFEST: &str = "[package]\nname = \"pkg\"\nversion = \"1.0.0\"\n";

    fn write_manifest(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name).join("Cargo.toml");
        std::fs::create_dir_all(dir.join(name)).expect("create package dir");
        std::fs::write(&path, MANIFEST).expect("write manifest");
        path
    }

    #[test]
    fn document_is_loaded_once() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = write_manifest(dir.path(), "a");
        let mut batch = ManifestBatch::new();

        batch
            .document(&path)
            .expect("load")
            .set_version(&Version::new(1, 1, 0))
            .expect("set version");
        let again = batch.document(&path).expect("load again");

        assert_eq!(again.package_version(), Some("1.1.0"));
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn write_only_touches_modified_manifests() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let changed = write_manifest(dir.path(), "a");
        let unchanged = write_manifest(dir.path(), "b");
        let mut batch = ManifestBatch::new();

        batch
            .document(&changed)
            .expect("load")
            .set_version(&Version::new(2, 0, 0))
            .expect("set version");
        batch.document(&unchanged).expect("load");

        let written = batch.write().expect("write batch");

        assert_eq!(written, vec![changed.clone()]);
        let content = std::fs::read_to_string(&changed).expect("read");
        assert!(content.contains("version = \"2.0.0\""));
        assert_eq!(std::fs::read_to_string(&unchanged).expect("read"), MANIFEST);
    }

    #[test]
    fn failed_write_restores_earlier_manifests() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let first = write_manifest(dir.path(), "a");
        let second = write_manifest(dir.path(), "b");
        let mut batch = ManifestBatch::new();

        for path in [&first, &second] {
            batch
                .document(path)
                .expect("load")
                .set_version(&Version::new(3, 0, 0))
                .expect("set version");
        }

        std::fs::remove_file(&second).expect("remove manifest");
        std::fs::create_dir(&second).expect("block manifest path");

        let result = batch.write();

        assert!(matches!(result, Err(ManifestError::Write { path, .. }) if path == second));
        assert_eq!(std::fs::read_to_string(&first).expect("read"), MANIFEST);
    }
}
