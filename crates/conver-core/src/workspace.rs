use std::collections::HashSet;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::error::{CoreError, Result};
use crate::update::VersionUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Normal,
    Dev,
    Build,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Real package name, after resolving `package = "..."` renames.
    pub name: String,
    pub requirement: Option<String>,
    pub kind: DependencyKind,
    /// `public = true` dependencies are part of the dependent's API, so their
    /// feature releases are breaking for it.
    pub is_peer: bool,
}

impl Dependency {
    #[must_use]
    pub fn new(name: impl Into<String>, requirement: Option<&str>) -> Self {
        Self {
            name: name.into(),
            requirement: requirement.map(ToString::to_string),
            kind: DependencyKind::Normal,
            is_peer: false,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: DependencyKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn peer(mut self) -> Self {
        self.is_peer = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: Version,
    pub path: PathBuf,
    pub manifest_path: PathBuf,
    pub dependencies: Vec<Dependency>,
}

impl Package {
    #[must_use]
    pub fn new(name: impl Into<String>, version: Version, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: name.into(),
            version,
            manifest_path: path.join("Cargo.toml"),
            path,
            dependencies: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }
}

/// The packages under version governance, in discovery order.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    packages: Vec<Package>,
}

impl Workspace {
    /// # Errors
    ///
    /// Returns `CoreError::DuplicatePackage` if two packages share a name.
    pub fn new(root: impl Into<PathBuf>, packages: Vec<Package>) -> Result<Self> {
        let mut seen = HashSet::new();
        for package in &packages {
            if !seen.insert(package.name.as_str()) {
                return Err(CoreError::DuplicatePackage(package.name.clone()));
            }
        }

        Ok(Self {
            root: root.into(),
            packages,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    #[must_use]
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.packages.iter().position(|p| p.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Moves every updated package to its planned version.
    pub fn apply_updates(&mut self, updates: &[VersionUpdate]) {
        for update in updates {
            if let Some(package) = self.packages.iter_mut().find(|p| p.name == update.name) {
                package.version = update.new_version.clone();
            }
        }
    }
}
