use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ProjectError;

pub(crate) type DependencyTable = IndexMap<String, DependencySpec>;

#[derive(Debug, Deserialize)]
pub(crate) struct CargoManifest {
    pub(crate) package: Option<Package>,
    pub(crate) workspace: Option<WorkspaceSection>,
    #[serde(flatten)]
    pub(crate) dependencies: DependencySections,
    #[serde(default)]
    pub(crate) target: IndexMap<String, DependencySections>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct DependencySections {
    #[serde(default)]
    pub(crate) dependencies: DependencyTable,
    #[serde(default)]
    pub(crate) dev_dependencies: DependencyTable,
    #[serde(default)]
    pub(crate) build_dependencies: DependencyTable,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Package {
    pub(crate) name: String,
    pub(crate) version: Option<InheritableField<String>>,
    pub(crate) publish: Option<InheritableField<Publish>>,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum InheritableField<T> {
    Literal(T),
    Inherited(Inherited),
}

#[derive(Debug, Deserialize)]
pub(crate) struct Inherited {
    pub(crate) workspace: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Publish {
    Flag(bool),
    Registries(Vec<String>),
}

impl Publish {
    pub(crate) fn is_private(&self) -> bool {
        match self {
            Self::Flag(publish) => !publish,
            Self::Registries(registries) => registries.is_empty(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DependencySpec {
    Simple(String),
    Detailed(DetailedDependency),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DetailedDependency {
    pub(crate) version: Option<String>,
    pub(crate) package: Option<String>,
    #[serde(default)]
    pub(crate) workspace: bool,
    #[serde(default)]
    pub(crate) public: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspaceSection {
    pub(crate) members: Option<Vec<String>>,
    pub(crate) exclude: Option<Vec<String>>,
    pub(crate) package: Option<WorkspacePackage>,
    #[serde(default)]
    pub(crate) dependencies: DependencyTable,
    pub(crate) metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspacePackage {
    pub(crate) version: Option<String>,
    pub(crate) publish: Option<Publish>,
}

/// `[*.metadata]`, keeping only the `conver` table as raw TOML so that
/// configuration errors can be reported against the manifest path.
#[derive(Debug, Deserialize)]
pub(crate) struct Metadata {
    pub(crate) conver: Option<toml::Value>,
}

pub(crate) fn read_manifest(path: &Path) -> Result<CargoManifest, ProjectError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ProjectError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}
