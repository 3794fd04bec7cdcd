use std::path::Path;

use conver_core::Bump;
use tracing::info;

use super::context::ProjectContext;
use super::select::{Selection, select_packages};
use crate::Result;
use crate::traits::{InteractionProvider, ProjectProvider, StateIO};

#[derive(Debug, Clone, Default)]
pub struct PromoteInput {
    /// Package names or `*` patterns.
    pub packages: Vec<String>,
    pub bump: Option<Bump>,
    /// Replace existing promotions even when they are greater.
    pub override_existing: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoteOutput {
    pub bump: Bump,
    pub updated: Vec<String>,
    /// Packages that already had this promotion.
    pub unchanged: Vec<String>,
    /// Packages keeping a greater existing promotion.
    pub conflicts: Vec<(String, Bump)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoteOutcome {
    Cancelled,
    Promoted(PromoteOutput),
}

pub struct PromoteOperation<P, S, I> {
    project_provider: P,
    state_io: S,
    interaction_provider: I,
}

impl<P, S, I> PromoteOperation<P, S, I>
where
    P: ProjectProvider,
    S: StateIO,
    I: InteractionProvider,
{
    pub fn new(project_provider: P, state_io: S, interaction_provider: I) -> Self {
        Self {
            project_provider,
            state_io,
            interaction_provider,
        }
    }

    /// Records a minimum bump for the selected packages.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is not initialized, a package argument
    /// matches nothing, a prompt is needed but unavailable, or the state file
    /// cannot be written.
    pub fn execute(&self, start_path: &Path, input: PromoteInput) -> Result<PromoteOutcome> {
        let context = ProjectContext::load(&self.project_provider, start_path)?;
        let mut state = context.load_state(&self.state_io)?;

        let packages = match select_packages(
            &context.workspace,
            &input.packages,
            |_| true,
            &self.interaction_provider,
            "Which packages would you like to promote?",
        )? {
            Selection::Packages(packages) => packages,
            Selection::Cancelled => return Ok(PromoteOutcome::Cancelled),
        };

        let bump = match input.bump {
            Some(bump) => bump,
            None => match self.interaction_provider.select_bump()? {
                Some(bump) => bump,
                None => return Ok(PromoteOutcome::Cancelled),
            },
        };

        let mut output = PromoteOutput {
            bump,
            updated: Vec::new(),
            unchanged: Vec::new(),
            conflicts: Vec::new(),
        };
        for name in packages {
            let existing = state.promotion(&name);
            if existing == bump {
                output.unchanged.push(name);
            } else if existing > bump && !input.override_existing {
                output.conflicts.push((name, existing));
            } else {
                state.set_promotion(name.as_str(), bump);
                output.updated.push(name);
            }
        }

        if !input.dry_run && !output.updated.is_empty() {
            self.state_io.save_state(&context.state_path, &state)?;
            info!(packages = ?output.updated, %bump, "recorded promotion");
        }

        Ok(PromoteOutcome::Promoted(output))
    }
}
