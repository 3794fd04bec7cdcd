use std::path::{Path, PathBuf};

use conver_core::StickyState;
use tracing::debug;

use super::context::ProjectContext;
use crate::Result;
use crate::error::OperationError;
use crate::traits::{HistoryProvider, InteractionProvider, ProjectProvider, StateIO};

const DEFAULT_BASE: &str = "HEAD~1";

#[derive(Debug, Clone, Default)]
pub struct InitInput {
    pub branch: Option<String>,
    pub base: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutput {
    pub state_path: PathBuf,
    pub branch: Option<String>,
    /// `None` when HEAD has no parent; the next run reads the whole history.
    pub base: Option<String>,
}

pub struct InitOperation<P, H, S, I> {
    project_provider: P,
    history_provider: H,
    state_io: S,
    interaction_provider: I,
}

impl<P, H, S, I> InitOperation<P, H, S, I>
where
    P: ProjectProvider,
    H: HistoryProvider,
    S: StateIO,
    I: InteractionProvider,
{
    pub fn new(project_provider: P, history_provider: H, state_io: S, interaction_provider: I) -> Self {
        Self {
            project_provider,
            history_provider,
            state_io,
            interaction_provider,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the project is already initialized, an explicit
    /// base does not resolve, or the state file cannot be written.
    pub fn execute(&self, start_path: &Path, input: InitInput) -> Result<InitOutput> {
        let context = ProjectContext::load(&self.project_provider, start_path)?;

        if self.state_io.load_state(&context.state_path)?.is_some() {
            return Err(OperationError::AlreadyInitialized {
                path: context.state_path,
            });
        }

        let branch = match input.branch {
            Some(branch) => Some(branch),
            None => self.ask_branch(context.root())?,
        };
        let base = self.resolve_base(context.root(), input.base.as_deref())?;

        let state = StickyState {
            base: base.clone(),
            branch: branch.clone(),
            ..StickyState::default()
        };
        if !input.dry_run {
            self.state_io.save_state(&context.state_path, &state)?;
        }

        Ok(InitOutput {
            state_path: context.state_path,
            branch,
            base,
        })
    }

    fn ask_branch(&self, root: &Path) -> Result<Option<String>> {
        let current = match self.history_provider.current_branch(root) {
            Ok(branch) => Some(branch),
            Err(e) => {
                debug!(error = %e, "no current branch to suggest");
                None
            }
        };

        let answer = self
            .interaction_provider
            .input_text("What is the main branch?", current.as_deref())?;
        Ok(answer.filter(|branch| !branch.trim().is_empty()))
    }

    fn resolve_base(&self, root: &Path, requested: Option<&str>) -> Result<Option<String>> {
        match requested {
            Some(revision) => self
                .history_provider
                .resolve(root, revision)?
                .map(Some)
                .ok_or_else(|| OperationError::UnknownRevision {
                    revision: revision.to_string(),
                }),
            None => self.history_provider.resolve(root, DEFAULT_BASE),
        }
    }
}
