use std::path::{Path, PathBuf};

use semver::Version;
use toml_edit::{DocumentMut, Item, Value};

use crate::error::ManifestError;
use crate::requirement::{RangePolicy, SkipReason, rewrite_requirement};

const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

/// # Errors
///
/// Returns `ManifestError::Read` if the file cannot be read, or
/// `ManifestError::Parse` if the TOML is malformed.
pub fn read_document(path: &Path) -> Result<DocumentMut, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &content)
}

fn parse(path: &Path, content: &str) -> Result<DocumentMut, ManifestError> {
    content
        .parse::<DocumentMut>()
        .map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionWrite {
    Literal,
    /// `version.workspace = true` was replaced by a literal version.
    ReplacedInherited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Rewritten { to: String },
    Skipped(SkipReason),
}

/// What happened to one dependency entry naming an updated sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdit {
    /// Dotted table path, e.g. `target.'cfg(unix)'.dependencies`.
    pub section: String,
    pub key: String,
    pub from: String,
    pub outcome: EditOutcome,
}

/// A manifest loaded for editing, remembering the text it was read from.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    path: PathBuf,
    original: String,
    doc: DocumentMut,
}

impl ManifestDocument {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let original = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = parse(path, &original)?;

        Ok(Self {
            path: path.to_path_buf(),
            original,
            doc,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[must_use]
    pub fn contents(&self) -> String {
        self.doc.to_string()
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.contents() != self.original
    }

    #[must_use]
    pub fn package_version(&self) -> Option<&str> {
        self.doc.get("package")?.get("version")?.as_str()
    }

    /// Sets `package.version`.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::MissingField` if there is no `[package]` table.
    pub fn set_version(&mut self, version: &Version) -> Result<VersionWrite, ManifestError> {
        let package = self
            .doc
            .get_mut("package")
            .and_then(Item::as_table_like_mut)
            .ok_or_else(|| ManifestError::MissingField {
                path: self.path.clone(),
                field: "package".to_string(),
            })?;

        let inherited = package.get("version").is_some_and(Item::is_table_like);
        if inherited {
            package.remove("version");
            package.insert("version", toml_edit::value(version.to_string()));
        } else if let Some(item) = package.get_mut("version") {
            replace_string(item, &version.to_string());
        } else {
            package.insert("version", toml_edit::value(version.to_string()));
        }

        Ok(if inherited {
            VersionWrite::ReplacedInherited
        } else {
            VersionWrite::Literal
        })
    }

    /// Points every requirement on `dependency` at `version`.
    ///
    /// Entries are matched by key or by their `package` rename. Entries using
    /// `workspace = true`, plain registry strings, and entries without a
    /// `version` key are not touched.
    pub fn update_dependency(
        &mut self,
        dependency: &str,
        version: &Version,
        policy: RangePolicy,
    ) -> Vec<DependencyEdit> {
        let mut edits = Vec::new();

        for section in self.dependency_sections() {
            let Some(table) = item_at_mut(&mut self.doc, &section).and_then(Item::as_table_like_mut)
            else {
                continue;
            };

            for (key, entry) in table.iter_mut() {
                let Some(entry) = entry.as_table_like_mut() else {
                    continue;
                };
                let name = entry
                    .get("package")
                    .and_then(Item::as_str)
                    .unwrap_or(key.get());
                if name != dependency {
                    continue;
                }
                if entry.get("workspace").and_then(Item::as_bool).unwrap_or(false) {
                    continue;
                }
                let Some(requirement) = entry.get_mut("version") else {
                    continue;
                };
                let Some(from) = requirement.as_str().map(ToString::to_string) else {
                    continue;
                };

                let outcome = match rewrite_requirement(&from, version, policy) {
                    Ok(to) => {
                        replace_string(requirement, &to);
                        EditOutcome::Rewritten { to }
                    }
                    Err(reason) => EditOutcome::Skipped(reason),
                };
                edits.push(DependencyEdit {
                    section: section.join("."),
                    key: key.get().to_string(),
                    from,
                    outcome,
                });
            }
        }

        edits
    }

    fn dependency_sections(&self) -> Vec<Vec<String>> {
        let mut sections = vec![vec!["workspace".to_string(), "dependencies".to_string()]];
        sections.extend(DEPENDENCY_SECTIONS.iter().map(|s| vec![(*s).to_string()]));

        if let Some(targets) = self.doc.get("target").and_then(Item::as_table_like) {
            for (target, _) in targets.iter() {
                for section in DEPENDENCY_SECTIONS {
                    sections.push(vec![
                        "target".to_string(),
                        target.to_string(),
                        section.to_string(),
                    ]);
                }
            }
        }

        sections
    }
}

fn item_at_mut<'d>(doc: &'d mut DocumentMut, path: &[String]) -> Option<&'d mut Item> {
    let mut item = doc.as_item_mut();
    for key in path {
        item = item.get_mut(key.as_str())?;
    }
    Some(item)
}

/// Replaces a string value, keeping the whitespace and comments around it.
fn replace_string(item: &mut Item, text: &str) {
    if let Some(value) = item.as_value_mut() {
        let decor = value.decor().clone();
        *value = Value::from(text);
        *value.decor_mut() = decor;
    } else {
        *item = toml_edit::value(text);
    }
}
