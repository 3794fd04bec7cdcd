use std::path::{Path, PathBuf};

use conver_core::{Dependency, DependencyKind, Package, PackagePattern, Workspace};
use globset::{GlobBuilder, GlobMatcher};
use semver::Version;
use tracing::debug;

use crate::config::ConverConfig;
use crate::error::ProjectError;
use crate::manifest::{
    CargoManifest, DependencySections, DependencySpec, DependencyTable, InheritableField, Publish,
    WorkspaceSection, read_manifest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    VirtualWorkspace,
    WorkspaceWithRoot,
    SinglePackage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPackage {
    pub package: Package,
    /// `publish = false` or an empty registry list.
    pub private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoProject {
    pub root: PathBuf,
    pub kind: ProjectKind,
    pub packages: Vec<ProjectPackage>,
}

impl CargoProject {
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("Cargo.toml")
    }

    /// Builds the engine's view of the project, keeping the packages the
    /// configuration selects.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Core` if two selected packages share a name.
    pub fn workspace(&self, config: &ConverConfig) -> Result<Workspace, ProjectError> {
        let packages = self
            .packages
            .iter()
            .filter(|candidate| is_selected(candidate, config))
            .map(|candidate| candidate.package.clone())
            .collect();

        Ok(Workspace::new(&self.root, packages)?)
    }
}

fn is_selected(candidate: &ProjectPackage, config: &ConverConfig) -> bool {
    let name = candidate.package.name.as_str();

    if candidate.private && !config.include_private() {
        debug!(package = name, "skipping private package");
        return false;
    }
    if PackagePattern::any_matches(config.exclude(), name) {
        debug!(package = name, "package excluded by configuration");
        return false;
    }
    if !config.include().is_empty() && !PackagePattern::any_matches(config.include(), name) {
        debug!(package = name, "package not in include list");
        return false;
    }
    true
}

/// # Errors
///
/// Returns `ProjectError` if no project root can be found or if manifest parsing fails.
pub fn discover_project(start_dir: &Path) -> Result<CargoProject, ProjectError> {
    let start_dir = start_dir
        .canonicalize()
        .map_err(|source| ProjectError::ManifestRead {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let (root, manifest) = find_project_root(&start_dir)?;
    let kind = determine_project_kind(&manifest);
    let packages = collect_packages(&root, &manifest)?;

    debug!(root = %root.display(), ?kind, packages = packages.len(), "discovered project");

    Ok(CargoProject {
        root,
        kind,
        packages,
    })
}

fn find_project_root(start_dir: &Path) -> Result<(PathBuf, CargoManifest), ProjectError> {
    let mut current = start_dir.to_path_buf();
    let mut fallback_single_package: Option<(PathBuf, CargoManifest)> = None;

    loop {
        let manifest_path = current.join("Cargo.toml");

        if manifest_path.exists() {
            let manifest = read_manifest(&manifest_path)?;

            if manifest.workspace.is_some() {
                return Ok((current, manifest));
            }

            if manifest.package.is_some() && fallback_single_package.is_none() {
                fallback_single_package = Some((current.clone(), manifest));
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => {
                return fallback_single_package.ok_or_else(|| ProjectError::NotFound {
                    start_dir: start_dir.to_path_buf(),
                });
            }
        }
    }
}

fn determine_project_kind(manifest: &CargoManifest) -> ProjectKind {
    match (&manifest.workspace, &manifest.package) {
        (Some(_), Some(_)) => ProjectKind::WorkspaceWithRoot,
        (None, Some(_)) => ProjectKind::SinglePackage,
        (Some(_) | None, None) => ProjectKind::VirtualWorkspace,
    }
}

fn collect_packages(
    root: &Path,
    manifest: &CargoManifest,
) -> Result<Vec<ProjectPackage>, ProjectError> {
    let workspace = manifest.workspace.as_ref();
    let mut packages = Vec::new();

    if manifest.package.is_some() {
        packages.push(load_package(root, manifest, workspace)?);
    }

    let Some(section) = workspace else {
        return Ok(packages);
    };

    let members = section.members.as_deref().unwrap_or(&[]);
    let excludes = section.exclude.as_deref().unwrap_or(&[]);
    let mut member_dirs = Vec::new();
    for pattern in members {
        member_dirs.extend(expand_glob_pattern(root, pattern, excludes)?);
    }
    member_dirs.sort();
    member_dirs.dedup();

    for member_dir in member_dirs {
        if member_dir == root {
            continue;
        }
        let member_manifest_path = member_dir.join("Cargo.toml");
        if !member_manifest_path.exists() {
            continue;
        }

        let member_manifest = read_manifest(&member_manifest_path)?;
        if member_manifest.package.is_some() {
            packages.push(load_package(&member_dir, &member_manifest, workspace)?);
        }
    }

    Ok(packages)
}

fn load_package(
    dir: &Path,
    manifest: &CargoManifest,
    workspace: Option<&WorkspaceSection>,
) -> Result<ProjectPackage, ProjectError> {
    let manifest_path = dir.join("Cargo.toml");
    let pkg = manifest
        .package
        .as_ref()
        .ok_or_else(|| ProjectError::MissingField {
            path: manifest_path.clone(),
            field: "package",
        })?;

    let workspace_package = workspace.and_then(|ws| ws.package.as_ref());
    let version = resolve_version(
        pkg.version.as_ref(),
        workspace_package.and_then(|p| p.version.as_ref()),
        &manifest_path,
    )?;
    let private = match &pkg.publish {
        Some(InheritableField::Literal(publish)) => publish.is_private(),
        Some(InheritableField::Inherited(inherited)) if inherited.workspace => workspace_package
            .and_then(|p| p.publish.as_ref())
            .is_some_and(Publish::is_private),
        Some(InheritableField::Inherited(_)) | None => false,
    };

    let workspace_deps = workspace.map(|ws| &ws.dependencies);
    let mut package = Package::new(&pkg.name, version, dir);
    package.dependencies = collect_dependencies(manifest, workspace_deps);

    Ok(ProjectPackage { package, private })
}

fn resolve_version(
    version_field: Option<&InheritableField<String>>,
    workspace_version: Option<&String>,
    manifest_path: &Path,
) -> Result<Version, ProjectError> {
    let version_str = match version_field {
        Some(InheritableField::Literal(v)) => v.clone(),
        Some(InheritableField::Inherited(inherited)) if inherited.workspace => workspace_version
            .ok_or_else(|| ProjectError::MissingField {
                path: manifest_path.to_path_buf(),
                field: "workspace.package.version",
            })?
            .clone(),
        Some(InheritableField::Inherited(_)) | None => {
            return Err(ProjectError::MissingField {
                path: manifest_path.to_path_buf(),
                field: "package.version",
            });
        }
    };

    version_str
        .parse()
        .map_err(|source| ProjectError::InvalidVersion {
            path: manifest_path.to_path_buf(),
            version: version_str,
            source,
        })
}

fn collect_dependencies(
    manifest: &CargoManifest,
    workspace_deps: Option<&DependencyTable>,
) -> Vec<Dependency> {
    let mut dependencies = Vec::new();

    let sections = std::iter::once(&manifest.dependencies).chain(manifest.target.values());
    for section in sections {
        extend_section(&mut dependencies, section, workspace_deps);
    }

    dependencies
}

fn extend_section(
    out: &mut Vec<Dependency>,
    sections: &DependencySections,
    workspace_deps: Option<&DependencyTable>,
) {
    let tables = [
        (&sections.dependencies, DependencyKind::Normal),
        (&sections.dev_dependencies, DependencyKind::Dev),
        (&sections.build_dependencies, DependencyKind::Build),
    ];

    for (table, kind) in tables {
        for (key, spec) in table {
            out.push(resolve_dependency(key, spec, workspace_deps).with_kind(kind));
        }
    }
}

fn resolve_dependency(
    key: &str,
    spec: &DependencySpec,
    workspace_deps: Option<&DependencyTable>,
) -> Dependency {
    let detailed = match spec {
        DependencySpec::Simple(requirement) => {
            return Dependency::new(key, Some(requirement.as_str()));
        }
        DependencySpec::Detailed(detailed) => detailed,
    };

    let (name, requirement) = if detailed.workspace {
        match workspace_deps.and_then(|deps| deps.get(key)) {
            Some(DependencySpec::Simple(requirement)) => (key, Some(requirement.as_str())),
            Some(DependencySpec::Detailed(inherited)) => (
                inherited.package.as_deref().unwrap_or(key),
                inherited.version.as_deref(),
            ),
            None => (key, None),
        }
    } else {
        (
            detailed.package.as_deref().unwrap_or(key),
            detailed.version.as_deref(),
        )
    };

    let dependency = Dependency::new(name, requirement);
    if detailed.public {
        dependency.peer()
    } else {
        dependency
    }
}

fn expand_glob_pattern(
    root: &Path,
    pattern: &str,
    excludes: &[String],
) -> Result<Vec<PathBuf>, ProjectError> {
    let glob = compile(pattern)?;
    let exclude_matchers = excludes
        .iter()
        .map(|ex| compile(ex))
        .collect::<Result<Vec<_>, _>>()?;

    let mut dirs = Vec::new();
    if glob.is_match(Path::new(".")) {
        dirs.push(root.to_path_buf());
    }
    collect_matching_dirs(root, root, &glob, &exclude_matchers, &mut dirs)?;

    Ok(dirs)
}

fn compile(pattern: &str) -> Result<GlobMatcher, ProjectError> {
    let trimmed = pattern.trim_end_matches('/');
    GlobBuilder::new(trimmed)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ProjectError::GlobPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn collect_matching_dirs(
    base: &Path,
    current: &Path,
    glob: &GlobMatcher,
    excludes: &[GlobMatcher],
    results: &mut Vec<PathBuf>,
) -> Result<(), ProjectError> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_dir() || is_hidden_or_target(&path) {
            continue;
        }

        let relative = path.strip_prefix(base).unwrap_or(&path);

        if excludes.iter().any(|ex| ex.is_match(relative)) {
            continue;
        }

        if glob.is_match(relative) {
            results.push(path.clone());
        }

        collect_matching_dirs(base, &path, glob, excludes, results)?;
    }

    Ok(())
}

fn is_hidden_or_target(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') || name == "target")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::DetailedDependency;

    fn parse(content: &str) -> CargoManifest {
        toml::from_str(content).expect("valid manifest")
    }

    #[test]
    fn determine_project_kind_virtual() {
        let manifest = parse("[workspace]\nmembers = [\"crates/*\"]\n");

        assert_eq!(
            determine_project_kind(&manifest),
            ProjectKind::VirtualWorkspace
        );
    }

    #[test]
    fn determine_project_kind_workspace_with_root() {
        let manifest = parse(
            "[package]\nname = \"root\"\nversion = \"1.0.0\"\n\n[workspace]\nmembers = [\"crates/*\"]\n",
        );

        assert_eq!(
            determine_project_kind(&manifest),
            ProjectKind::WorkspaceWithRoot
        );
    }

    #[test]
    fn determine_project_kind_single_package() {
        let manifest = parse("[package]\nname = \"single\"\nversion = \"1.0.0\"\n");

        assert_eq!(
            determine_project_kind(&manifest),
            ProjectKind::SinglePackage
        );
    }

    #[test]
    fn collects_dependencies_from_all_sections() {
        let manifest = parse(
            r#"[package]
name = "app"
version = "1.0.0"

[dependencies]
core = { path = "../core", version = "1.0.0", public = true }
serde = "1"

[dev-dependencies]
fixtures = { path = "../fixtures" }

[target.'cfg(unix)'.build-dependencies]
engine = { package = "conver-engine", path = "../engine", version = "0.1" }
"#,
        );

        let deps = collect_dependencies(&manifest, None);

        assert_eq!(deps.len(), 4);
        assert_eq!(deps[0].name, "core");
        assert!(deps[0].is_peer);
        assert_eq!(deps[1].requirement.as_deref(), Some("1"));
        assert_eq!(deps[2].kind, DependencyKind::Dev);
        assert_eq!(deps[2].requirement, None);
        assert_eq!(deps[3].name, "conver-engine");
        assert_eq!(deps[3].kind, DependencyKind::Build);
    }

    #[test]
    fn workspace_dependencies_resolve_name_and_requirement() {
        let mut workspace_deps = DependencyTable::new();
        workspace_deps.insert(
            "engine".to_string(),
            DependencySpec::Detailed(DetailedDependency {
                version: Some("0.2.0".to_string()),
                package: Some("conver-engine".to_string()),
                ..DetailedDependency::default()
            }),
        );
        let spec = DependencySpec::Detailed(DetailedDependency {
            workspace: true,
            ..DetailedDependency::default()
        });

        let dep = resolve_dependency("engine", &spec, Some(&workspace_deps));

        assert_eq!(dep.name, "conver-engine");
        assert_eq!(dep.requirement.as_deref(), Some("0.2.0"));
    }

    #[test]
    fn publish_false_marks_package_private() {
        let manifest = parse("[package]\nname = \"a\"\nversion = \"1.0.0\"\npublish = false\n");

        let package = load_package(Path::new("/ws/a"), &manifest, None).expect("load package");

        assert!(package.private);
    }

    #[test]
    fn empty_registry_list_marks_package_private() {
        let manifest = parse("[package]\nname = \"a\"\nversion = \"1.0.0\"\npublish = []\n");

        let package = load_package(Path::new("/ws/a"), &manifest, None).expect("load package");

        assert!(package.private);
    }

    #[test]
    fn missing_version_is_reported() {
        let manifest = parse("[package]\nname = \"a\"\n");

        let result = load_package(Path::new("/ws/a"), &manifest, None);

        assert!(matches!(
            result,
            Err(ProjectError::MissingField {
                field: "package.version",
                ..
            })
        ));
    }
}
