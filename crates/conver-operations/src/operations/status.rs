use std::path::Path;

use conver_core::{Bump, Package};
use conver_engine::{Planner, VersionPlan};
use semver::Version;

use super::context::ProjectContext;
use crate::Result;
use crate::traits::{HistoryProvider, ProjectProvider, StateIO};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageClass {
    PreRelease,
    /// Major version zero.
    Initial,
    Stable,
}

impl PackageClass {
    #[must_use]
    pub fn of(version: &Version) -> Self {
        if !version.pre.is_empty() {
            Self::PreRelease
        } else if version.major == 0 {
            Self::Initial
        } else {
            Self::Stable
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreRelease => "pre-release",
            Self::Initial => "0.x",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageStatus {
    pub name: String,
    pub version: Version,
    pub class: PackageClass,
}

impl From<&Package> for PackageStatus {
    fn from(package: &Package) -> Self {
        Self {
            name: package.name.clone(),
            version: package.version.clone(),
            class: PackageClass::of(&package.version),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusOutput {
    pub packages: Vec<PackageStatus>,
    pub promotions: Vec<(String, Bump)>,
    pub plan: VersionPlan,
    pub base: Option<String>,
}

pub struct StatusOperation<P, H, S> {
    project_provider: P,
    history_provider: H,
    state_io: S,
}

impl<P, H, S> StatusOperation<P, H, S>
where
    P: ProjectProvider,
    H: HistoryProvider,
    S: StateIO,
{
    pub fn new(project_provider: P, history_provider: H, state_io: S) -> Self {
        Self {
            project_provider,
            history_provider,
            state_io,
        }
    }

    /// Computes the pending plan without changing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is not initialized, history cannot be
    /// read, or planning fails.
    pub fn execute(&self, start_path: &Path) -> Result<StatusOutput> {
        let context = ProjectContext::load(&self.project_provider, start_path)?;
        let state = context.load_state(&self.state_io)?;

        let commits = context.commits_since(&self.history_provider, state.base.as_deref())?;
        let mut snapshot = state.clone();
        let plan = Planner::new(&context.workspace, context.config.plan_options())
            .plan(&commits, &mut snapshot)?;

        let promotions = state
            .promotions
            .iter()
            .filter(|(name, bump)| !bump.is_none() && context.workspace.contains(name))
            .map(|(name, bump)| (name.clone(), *bump))
            .collect();

        Ok(StatusOutput {
            packages: context
                .workspace
                .packages()
                .iter()
                .map(PackageStatus::from)
                .collect(),
            promotions,
            plan,
            base: state.base,
        })
    }
}
