use std::path::{Path, PathBuf};

use conver_core::{Commit, StickyState, VersionUpdate, Workspace};
use conver_project::{CargoProject, ConverConfig, StateFile};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{HistoryProvider, ManifestWriteRequest, ProjectProvider, StateIO};

/// A discovered project with its configuration and the package set the
/// engine works on.
pub(crate) struct ProjectContext {
    pub(crate) project: CargoProject,
    pub(crate) config: ConverConfig,
    pub(crate) workspace: Workspace,
    pub(crate) state_path: PathBuf,
}

impl ProjectContext {
    pub(crate) fn load<P: ProjectProvider>(provider: &P, start_path: &Path) -> Result<Self> {
        let project = provider.discover_project(start_path)?;
        let config = provider.load_config(&project)?;
        let workspace = project.workspace(&config)?;
        let state_path = StateFile::for_project(&project.root, &config)
            .path()
            .to_path_buf();

        Ok(Self {
            project,
            config,
            workspace,
            state_path,
        })
    }

    pub(crate) fn root(&self) -> &Path {
        &self.project.root
    }

    pub(crate) fn load_state<S: StateIO>(&self, io: &S) -> Result<StickyState> {
        io.load_state(&self.state_path)?
            .ok_or_else(|| OperationError::NotInitialized {
                path: self.state_path.clone(),
            })
    }

    /// Commits since `base`. Changes to the state directory are dropped so
    /// that committing the state file never counts as a workspace change.
    pub(crate) fn commits_since<H: HistoryProvider>(
        &self,
        history: &H,
        base: Option<&str>,
    ) -> Result<Vec<Commit>> {
        let state_dir = self.root().join(self.config.state_dir());
        let mut commits = history.commits_since(self.root(), base)?;
        for commit in &mut commits {
            commit.diff.retain(|change| !change.path.starts_with(&state_dir));
        }
        Ok(commits)
    }

    /// Every manifest that may hold a requirement on a workspace package.
    pub(crate) fn dependent_manifests(&self) -> Vec<PathBuf> {
        let mut manifests = vec![self.project.manifest_path()];
        for candidate in &self.project.packages {
            if !manifests.contains(&candidate.package.manifest_path) {
                manifests.push(candidate.package.manifest_path.clone());
            }
        }
        manifests
    }

    /// Pairs each update with its package manifest, using the configured
    /// requirement rewriting.
    pub(crate) fn write_request<'a>(
        &self,
        updates: impl IntoIterator<Item = &'a VersionUpdate>,
    ) -> ManifestWriteRequest<'a> {
        let targets = updates
            .into_iter()
            .filter_map(|update| {
                self.workspace
                    .package(&update.name)
                    .map(|package| (package.manifest_path.clone(), update))
            })
            .collect();

        ManifestWriteRequest {
            targets,
            dependents: self.dependent_manifests(),
            update_dependencies: self.config.update_dependencies(),
            policy: self.config.range_policy(),
        }
    }
}
