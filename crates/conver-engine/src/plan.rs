use std::fmt;

use conver_core::{Bump, Commit, StickyState, VersionUpdate, Workspace};
use conver_version as version;
use tracing::debug;

use crate::attribution::attribute;
use crate::error::Result;
use crate::options::{GroupKind, PlanOptions};
use crate::prerelease::{PreReleaseStatus, Subject};
use crate::propagation::{Propagator, resolve_groups};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCommit {
    pub hash: String,
    pub header: String,
}

/// Non-fatal findings collected while planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanWarning {
    UnrecognizedCommitType { commit_type: String, commits: usize },
    InvalidCommits(Vec<InvalidCommit>),
    UnmatchedGroup { kind: GroupKind, patterns: Vec<String> },
    /// A pre-release record for a package that is no longer a pre-release.
    StalePreReleaseRecord { package: String },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedCommitType {
                commit_type,
                commits,
            } => write!(
                f,
                "commit type '{commit_type}' has no bump mapping ({commits} commit(s) ignored)"
            ),
            Self::InvalidCommits(commits) => {
                write!(f, "{} commit(s) are not conventional commits:", commits.len())?;
                for commit in commits {
                    let short = commit.hash.get(..7).unwrap_or(&commit.hash);
                    write!(f, "\n  {short} {}", commit.header)?;
                }
                Ok(())
            }
            Self::UnmatchedGroup { kind, patterns } => write!(
                f,
                "{} patterns match no packages: {}",
                kind.as_str(),
                patterns.join(", ")
            ),
            Self::StalePreReleaseRecord { package } => write!(
                f,
                "dropping pre-release record of '{package}', which is no longer a pre-release"
            ),
        }
    }
}

/// Result of a planning pass.
#[derive(Debug, Clone, Default)]
pub struct VersionPlan {
    /// Updates in workspace package order.
    pub updates: Vec<VersionUpdate>,
    pub warnings: Vec<PlanWarning>,
    pub passes: usize,
}

impl VersionPlan {
    /// Updates that actually change a version.
    pub fn changes(&self) -> impl Iterator<Item = &VersionUpdate> {
        self.updates.iter().filter(|u| u.is_change())
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.changes().next().is_some()
    }
}

/// Computes version plans for one workspace snapshot.
pub struct Planner<'a> {
    workspace: &'a Workspace,
    options: &'a PlanOptions,
}

impl<'a> Planner<'a> {
    #[must_use]
    pub fn new(workspace: &'a Workspace, options: &'a PlanOptions) -> Self {
        Self { workspace, options }
    }

    /// Plans the updates implied by `commits`.
    ///
    /// On success every promotion of a workspace package is consumed from
    /// `state` and stale pre-release records are dropped. On error `state`
    /// is left untouched.
    ///
    /// Consumption happens before [`validate`](crate::validate) sees the
    /// plan. Callers that may still reject the plan should pass a clone and
    /// keep it only once the plan is validated and applied.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::MissingPreReleaseOrigin` if a pre-release package
    /// has no recorded origin, `PlanError::PropagationDiverged` if the bump
    /// cascade does not settle, and pattern or version errors from the
    /// configuration.
    pub fn plan(&self, commits: &[Commit], state: &mut StickyState) -> Result<VersionPlan> {
        let packages = self.workspace.packages();
        let mut warnings = Vec::new();

        let mut subjects = Vec::with_capacity(packages.len());
        let mut stale = Vec::new();
        for package in packages {
            let status = PreReleaseStatus::classify(package, state)?;
            let has_record = state.pre_release_origin(&package.name).is_some();
            if status == PreReleaseStatus::Stable && has_record {
                stale.push(package.name.clone());
            }
            subjects.push(Subject::new(
                package,
                status,
                state.promotion(&package.name),
                self.options,
            ));
        }

        let attribution = attribute(self.workspace, commits, self.options)?;
        warnings.extend(attribution.warnings);

        let raw: Vec<Bump> = packages
            .iter()
            .zip(attribution.bumps)
            .map(|(package, inferred)| {
                let promotion = state.promotion(&package.name);
                if self.options.override_inferred_bumps && !promotion.is_none() {
                    promotion
                } else {
                    inferred.max(promotion)
                }
            })
            .collect();

        let (groups, group_warnings) = resolve_groups(self.workspace, self.options)?;
        warnings.extend(group_warnings);

        let propagation = Propagator::new(self.workspace, &subjects, &groups).run(raw)?;

        let mut updates = Vec::new();
        for (index, package) in packages.iter().enumerate() {
            let subject = &subjects[index];
            let bump = subject.effective(propagation.bumps[index]);

            let mut planned = None;
            if !bump.is_none() {
                let next = subject.next_version(
                    bump,
                    propagation.floors[index].as_ref(),
                    self.options,
                )?;
                if version::compare(&next, &package.version).is_gt() {
                    planned = Some(next);
                }
            }

            match planned {
                Some(new_version) => {
                    debug!(package = %package.name, %bump, %new_version, "planned update");
                    updates.push(VersionUpdate {
                        name: package.name.clone(),
                        old_version: package.version.clone(),
                        new_version,
                        bump,
                    });
                }
                None if self.options.include_unchanged => updates.push(VersionUpdate {
                    name: package.name.clone(),
                    old_version: package.version.clone(),
                    new_version: package.version.clone(),
                    bump: Bump::None,
                }),
                None => {}
            }
        }

        for package in packages {
            state.promotions.shift_remove(&package.name);
        }
        for package in stale {
            state.clear_pre_release(&package);
            warnings.push(PlanWarning::StalePreReleaseRecord { package });
        }

        Ok(VersionPlan {
            updates,
            warnings,
            passes: propagation.passes,
        })
    }
}

/// Shorthand for [`Planner::plan`].
///
/// # Errors
///
/// See [`Planner::plan`].
pub fn plan(
    workspace: &Workspace,
    commits: &[Commit],
    options: &PlanOptions,
    state: &mut StickyState,
) -> Result<VersionPlan> {
    Planner::new(workspace, options).plan(commits, state)
}
