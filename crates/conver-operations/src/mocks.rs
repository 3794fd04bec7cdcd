use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use conver_core::{Bump, Commit, Dependency, FileChange, FileChangeKind, Package, StickyState};
use conver_manifest::ManifestError;
use conver_project::{CargoProject, ConverConfig, ProjectKind, ProjectPackage};
use semver::Version;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    HistoryProvider, InteractionProvider, ManifestWriteReport, ManifestWriteRequest,
    ManifestWriter, PackageSelection, ProjectProvider, StateIO,
};

/// Builds a commit touching `files`, typed the way the git provider would
/// type it.
#[must_use]
pub fn make_commit(header: &str, files: &[PathBuf]) -> Commit {
    Commit {
        hash: format!("{:0>40}", header.len()),
        commit_type: git_conventional::Commit::parse(header)
            .ok()
            .map(|c| c.type_().to_string()),
        header: header.to_string(),
        diff: files
            .iter()
            .map(|f| FileChange::new(FileChangeKind::Modified, f.clone()))
            .collect(),
    }
}

pub struct MockProjectProvider {
    project: CargoProject,
    config: ConverConfig,
}

impl MockProjectProvider {
    #[must_use]
    pub fn new(project: CargoProject) -> Self {
        Self {
            project,
            config: ConverConfig::default(),
        }
    }

    /// # Panics
    ///
    /// Panics if the version string is not valid semver.
    #[must_use]
    pub fn single_package(name: &str, version: &str) -> Self {
        let root = PathBuf::from("/mock/project");
        let project = CargoProject {
            root: root.clone(),
            kind: ProjectKind::SinglePackage,
            packages: vec![ProjectPackage {
                package: Package::new(name, version.parse().expect("valid version"), root),
                private: false,
            }],
        };
        Self::new(project)
    }

    /// # Panics
    ///
    /// Panics if any version string is not valid semver.
    #[must_use]
    pub fn workspace(packages: Vec<(&str, &str)>) -> Self {
        let root = PathBuf::from("/mock/workspace");
        let packages = packages
            .into_iter()
            .map(|(name, version)| ProjectPackage {
                package: Package::new(
                    name,
                    version.parse::<Version>().expect("valid version"),
                    root.join("crates").join(name),
                ),
                private: false,
            })
            .collect();

        Self::new(CargoProject {
            root,
            kind: ProjectKind::VirtualWorkspace,
            packages,
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: ConverConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, dependent: &str, dependency: Dependency) -> Self {
        if let Some(candidate) = self
            .project
            .packages
            .iter_mut()
            .find(|p| p.package.name == dependent)
        {
            candidate.package.dependencies.push(dependency);
        }
        self
    }

    /// # Panics
    ///
    /// Panics if the package does not exist.
    #[must_use]
    pub fn package_file(&self, name: &str, relative: &str) -> PathBuf {
        self.project
            .packages
            .iter()
            .find(|p| p.package.name == name)
            .map(|p| p.package.path.join(relative))
            .expect("package exists")
    }
}

impl ProjectProvider for MockProjectProvider {
    fn discover_project(&self, _start_path: &Path) -> Result<CargoProject> {
        Ok(self.project.clone())
    }

    fn load_config(&self, _project: &CargoProject) -> Result<ConverConfig> {
        Ok(self.config.clone())
    }
}

#[derive(Clone, Default)]
pub struct MockHistoryProvider {
    commits: Vec<Commit>,
    branch: Option<String>,
    head: Option<String>,
    revisions: HashMap<String, String>,
    requested_bases: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockHistoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branch = Some(branch.to_string());
        self
    }

    #[must_use]
    pub fn with_head(mut self, sha: &str) -> Self {
        self.head = Some(sha.to_string());
        self
    }

    #[must_use]
    pub fn with_revision(mut self, revision: &str, sha: &str) -> Self {
        self.revisions.insert(revision.to_string(), sha.to_string());
        self
    }

    #[must_use]
    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.commits.push(commit);
        self
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn requested_bases(&self) -> Vec<Option<String>> {
        self.requested_bases.lock().expect("lock poisoned").clone()
    }
}

impl HistoryProvider for MockHistoryProvider {
    fn commits_since(&self, _project_root: &Path, base: Option<&str>) -> Result<Vec<Commit>> {
        self.requested_bases
            .lock()
            .expect("lock poisoned")
            .push(base.map(ToString::to_string));
        Ok(self.commits.clone())
    }

    fn head_sha(&self, _project_root: &Path) -> Result<Option<String>> {
        Ok(self.head.clone())
    }

    fn current_branch(&self, _project_root: &Path) -> Result<String> {
        self.branch
            .clone()
            .ok_or(OperationError::Git(conver_git::GitError::DetachedHead))
    }

    fn resolve(&self, _project_root: &Path, revision: &str) -> Result<Option<String>> {
        Ok(self.revisions.get(revision).cloned())
    }
}

/// In-memory state file. Clones share the same storage.
#[derive(Clone, Default)]
pub struct MockStateIO {
    stored: Arc<Mutex<Option<StickyState>>>,
    saved: Arc<Mutex<Option<StickyState>>>,
}

impl MockStateIO {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn with_state(self, state: StickyState) -> Self {
        *self.stored.lock().expect("lock poisoned") = Some(state);
        self
    }

    /// The last state written, if any.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn saved(&self) -> Option<StickyState> {
        self.saved.lock().expect("lock poisoned").clone()
    }
}

impl StateIO for MockStateIO {
    fn load_state(&self, _path: &Path) -> Result<Option<StickyState>> {
        Ok(self.stored.lock().expect("lock poisoned").clone())
    }

    fn save_state(&self, _path: &Path, state: &StickyState) -> Result<()> {
        *self.stored.lock().expect("lock poisoned") = Some(state.clone());
        *self.saved.lock().expect("lock poisoned") = Some(state.clone());
        Ok(())
    }
}

pub struct MockInteractionProvider {
    packages: Option<Vec<String>>,
    bump: Option<Bump>,
    text: Option<String>,
    confirm: bool,
    offered: Mutex<Vec<String>>,
    confirmations: Mutex<usize>,
}

impl MockInteractionProvider {
    /// Cancels package and bump prompts, accepts text defaults and confirms.
    #[must_use]
    pub fn new() -> Self {
        Self {
            packages: None,
            bump: None,
            text: None,
            confirm: true,
            offered: Mutex::new(Vec::new()),
            confirmations: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn with_packages(mut self, packages: Vec<String>) -> Self {
        self.packages = Some(packages);
        self
    }

    #[must_use]
    pub fn with_bump(mut self, bump: Bump) -> Self {
        self.bump = Some(bump);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    #[must_use]
    pub fn declining(mut self) -> Self {
        self.confirm = false;
        self
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn offered_packages(&self) -> Vec<String> {
        self.offered.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn confirmations(&self) -> usize {
        *self.confirmations.lock().expect("lock poisoned")
    }
}

impl Default for MockInteractionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionProvider for MockInteractionProvider {
    fn select_packages(&self, _prompt: &str, available: &[String]) -> Result<PackageSelection> {
        *self.offered.lock().expect("lock poisoned") = available.to_vec();
        Ok(self
            .packages
            .clone()
            .map_or(PackageSelection::Cancelled, PackageSelection::Selected))
    }

    fn select_bump(&self) -> Result<Option<Bump>> {
        Ok(self.bump)
    }

    fn input_text(&self, _prompt: &str, default: Option<&str>) -> Result<Option<String>> {
        Ok(self.text.clone().or_else(|| default.map(ToString::to_string)))
    }

    fn confirm(&self, _prompt: &str) -> Result<bool> {
        *self.confirmations.lock().expect("lock poisoned") += 1;
        Ok(self.confirm)
    }
}

/// Records applied updates instead of touching the filesystem.
#[derive(Clone, Default)]
pub struct MockManifestWriter {
    applied: Arc<Mutex<Vec<(PathBuf, Version)>>>,
    dependents: Arc<Mutex<Vec<PathBuf>>>,
    fail: bool,
}

impl MockManifestWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Manifest paths with the versions written to them.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn applied(&self) -> Vec<(PathBuf, Version)> {
        self.applied.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn dependents(&self) -> Vec<PathBuf> {
        self.dependents.lock().expect("lock poisoned").clone()
    }
}

impl ManifestWriter for MockManifestWriter {
    fn apply(&self, request: &ManifestWriteRequest<'_>) -> Result<ManifestWriteReport> {
        if self.fail {
            let path = request
                .targets
                .first()
                .map(|(path, _)| path.clone())
                .unwrap_or_default();
            return Err(ManifestError::Write {
                path,
                source: std::io::Error::other("simulated failure"),
            }
            .into());
        }

        let mut applied = self.applied.lock().expect("lock poisoned");
        applied.extend(
            request
                .targets
                .iter()
                .map(|(path, update)| (path.clone(), update.new_version.clone())),
        );
        *self.dependents.lock().expect("lock poisoned") = request.dependents.clone();

        Ok(ManifestWriteReport {
            written: request.targets.iter().map(|(path, _)| path.clone()).collect(),
            ..ManifestWriteReport::default()
        })
    }
}
