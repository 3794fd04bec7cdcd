use std::path::Path;

use conver_core::StickyState;
use conver_engine::{Planner, VersionPlan, validate};
use conver_manifest::{EditOutcome, SkipReason};
use tracing::{debug, info, warn};

use super::context::ProjectContext;
use crate::Result;
use crate::traits::{
    HistoryProvider, InteractionProvider, ManifestWriteReport, ManifestWriter, ProjectProvider,
    StateIO,
};

const CONFIRM_PROMPT: &str = "Are you sure you want to make these changes?";

#[derive(Debug, Clone, Copy, Default)]
pub struct VersionInput {
    pub dry_run: bool,
    /// Skip the confirmation prompt.
    pub yes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    NoUpdates,
    DryRun,
    Cancelled,
    Applied {
        report: ManifestWriteReport,
        /// The new history baseline.
        base: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct VersionOutput {
    pub plan: VersionPlan,
    /// No baseline was recorded, so the whole history was read.
    pub missing_base: bool,
    pub outcome: VersionOutcome,
}

/// A validated plan waiting to be applied.
pub struct PendingVersion {
    context: ProjectContext,
    next_state: StickyState,
    pub plan: VersionPlan,
    /// No baseline was recorded, so the whole history was read.
    pub missing_base: bool,
}

impl PendingVersion {
    pub fn has_changes(&self) -> bool {
        self.plan.has_changes()
    }
}

pub struct VersionOperation<P, H, S, M, I> {
    project_provider: P,
    history_provider: H,
    state_io: S,
    manifest_writer: M,
    interaction_provider: I,
}

impl<P, H, S, M, I> VersionOperation<P, H, S, M, I>
where
    P: ProjectProvider,
    H: HistoryProvider,
    S: StateIO,
    M: ManifestWriter,
    I: InteractionProvider,
{
    pub fn new(
        project_provider: P,
        history_provider: H,
        state_io: S,
        manifest_writer: M,
        interaction_provider: I,
    ) -> Self {
        Self {
            project_provider,
            history_provider,
            state_io,
            manifest_writer,
            interaction_provider,
        }
    }

    /// Plans and applies the pending version updates.
    ///
    /// # Errors
    ///
    /// Returns an error if [`plan`](Self::plan) or [`apply`](Self::apply)
    /// fails.
    pub fn execute(&self, start_path: &Path, input: VersionInput) -> Result<VersionOutput> {
        let pending = self.plan(start_path)?;
        self.apply(pending, input)
    }

    /// Reads the history since the recorded base and computes a validated
    /// plan. Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the project, state or history cannot be read, or
    /// if planning or validation fails.
    pub fn plan(&self, start_path: &Path) -> Result<PendingVersion> {
        let context = ProjectContext::load(&self.project_provider, start_path)?;
        let state = context.load_state(&self.state_io)?;
        let options = context.config.plan_options();

        let missing_base = state.base.is_none();
        if missing_base {
            warn!("no base commit recorded; the whole history will be searched");
        }

        let commits = context.commits_since(&self.history_provider, state.base.as_deref())?;
        debug!(commits = commits.len(), "read history");

        let mut next_state = state;
        let plan = Planner::new(&context.workspace, options).plan(&commits, &mut next_state)?;
        if plan.has_changes() {
            validate(&plan, options)?;
        }

        Ok(PendingVersion {
            context,
            next_state,
            plan,
            missing_base,
        })
    }

    /// Applies a plan from [`plan`](Self::plan), asking for confirmation
    /// unless `input.yes` is set.
    ///
    /// Manifests are written before the state file, and the state only
    /// changes once every manifest was written.
    ///
    /// # Errors
    ///
    /// Returns an error if manifests or the state file cannot be written.
    pub fn apply(&self, pending: PendingVersion, input: VersionInput) -> Result<VersionOutput> {
        let PendingVersion {
            context,
            mut next_state,
            plan,
            missing_base,
        } = pending;

        let output = |plan, outcome| VersionOutput {
            plan,
            missing_base,
            outcome,
        };

        if !plan.has_changes() {
            return Ok(output(plan, VersionOutcome::NoUpdates));
        }

        if input.dry_run {
            return Ok(output(plan, VersionOutcome::DryRun));
        }

        if !input.yes && !self.interaction_provider.confirm(CONFIRM_PROMPT)? {
            return Ok(output(plan, VersionOutcome::Cancelled));
        }

        let mut report = self
            .manifest_writer
            .apply(&context.write_request(plan.changes()))?;
        if context.config.ignore_outdated_pre_release() {
            report.dependency_edits.retain(|(_, edit)| {
                edit.outcome != EditOutcome::Skipped(SkipReason::OutdatedPreRelease)
            });
        }

        let head = self.history_provider.head_sha(context.root())?;
        if head.is_some() {
            next_state.base.clone_from(&head);
        }
        self.state_io.save_state(&context.state_path, &next_state)?;
        info!(packages = plan.changes().count(), "applied version updates");

        Ok(output(
            plan,
            VersionOutcome::Applied {
                report,
                base: next_state.base,
            },
        ))
    }
}
