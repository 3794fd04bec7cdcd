use std::path::Path;

use conver_core::{Bump, Package, VersionUpdate};
use conver_version as version;
use tracing::info;

use super::context::ProjectContext;
use super::select::{Selection, select_packages};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    InteractionProvider, ManifestWriteReport, ManifestWriter, ProjectProvider, StateIO,
};

#[derive(Debug, Clone, Default)]
pub struct PreEnterInput {
    /// Package names or `*` patterns.
    pub packages: Vec<String>,
    /// Pre-release identifier such as `rc` or `beta`.
    pub id: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PreExitInput {
    pub packages: Vec<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreOutput {
    pub updates: Vec<VersionUpdate>,
    /// Selected packages that were already in (enter) or not in (exit)
    /// pre-release.
    pub skipped: Vec<String>,
    /// `None` on dry runs.
    pub report: Option<ManifestWriteReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreOutcome {
    Cancelled,
    Changed(PreOutput),
}

pub struct PreEnterOperation<P, S, M, I> {
    project_provider: P,
    state_io: S,
    manifest_writer: M,
    interaction_provider: I,
}

impl<P, S, M, I> PreEnterOperation<P, S, M, I>
where
    P: ProjectProvider,
    S: StateIO,
    M: ManifestWriter,
    I: InteractionProvider,
{
    pub fn new(project_provider: P, state_io: S, manifest_writer: M, interaction_provider: I) -> Self {
        Self {
            project_provider,
            state_io,
            manifest_writer,
            interaction_provider,
        }
    }

    /// Moves stable packages to `<version>-<id>.<initial>` and records the
    /// version they left.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::AlreadyInPreRelease` if no selected package is
    /// stable, and version, manifest or state errors otherwise.
    pub fn execute(&self, start_path: &Path, input: PreEnterInput) -> Result<PreOutcome> {
        let context = ProjectContext::load(&self.project_provider, start_path)?;
        let mut state = context.load_state(&self.state_io)?;

        let selected = match select_packages(
            &context.workspace,
            &input.packages,
            |p| !p.is_prerelease(),
            &self.interaction_provider,
            "Which packages should enter pre-release?",
        )? {
            Selection::Packages(names) => names,
            Selection::Cancelled => return Ok(PreOutcome::Cancelled),
        };

        let (eligible, skipped) = partition(&context, &selected, |p| !p.is_prerelease());
        if eligible.is_empty() {
            return Err(OperationError::AlreadyInPreRelease { packages: skipped });
        }

        let id = match input.id {
            Some(id) => id,
            None => match self
                .interaction_provider
                .input_text("Which pre-release identifier?", Some("rc"))?
            {
                Some(id) if !id.trim().is_empty() => id.trim().to_string(),
                _ => return Ok(PreOutcome::Cancelled),
            },
        };

        let initial = context.config.plan_options().initial_pre_release;
        let updates = eligible
            .iter()
            .map(|package| -> Result<VersionUpdate> {
                Ok(VersionUpdate {
                    name: package.name.clone(),
                    old_version: package.version.clone(),
                    new_version: version::with_prerelease(&package.version, &id, initial)?,
                    bump: Bump::None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for update in &updates {
            state.record_pre_release(update.name.as_str(), update.old_version.clone());
        }

        let report = if input.dry_run {
            None
        } else {
            let report = self
                .manifest_writer
                .apply(&context.write_request(&updates))?;
            self.state_io.save_state(&context.state_path, &state)?;
            info!(packages = updates.len(), %id, "entered pre-release");
            Some(report)
        };

        Ok(PreOutcome::Changed(PreOutput {
            updates,
            skipped,
            report,
        }))
    }
}

pub struct PreExitOperation<P, S, M, I> {
    project_provider: P,
    state_io: S,
    manifest_writer: M,
    interaction_provider: I,
}

impl<P, S, M, I> PreExitOperation<P, S, M, I>
where
    P: ProjectProvider,
    S: StateIO,
    M: ManifestWriter,
    I: InteractionProvider,
{
    pub fn new(project_provider: P, state_io: S, manifest_writer: M, interaction_provider: I) -> Self {
        Self {
            project_provider,
            state_io,
            manifest_writer,
            interaction_provider,
        }
    }

    /// Strips the pre-release suffix of the selected packages and clears
    /// their records.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::NotInPreRelease` if no selected package is a
    /// pre-release, and manifest or state errors otherwise.
    pub fn execute(&self, start_path: &Path, input: PreExitInput) -> Result<PreOutcome> {
        let context = ProjectContext::load(&self.project_provider, start_path)?;
        let mut state = context.load_state(&self.state_io)?;

        let selected = match select_packages(
            &context.workspace,
            &input.packages,
            Package::is_prerelease,
            &self.interaction_provider,
            "Which packages should exit pre-release?",
        )? {
            Selection::Packages(names) => names,
            Selection::Cancelled => return Ok(PreOutcome::Cancelled),
        };

        let (eligible, skipped) = partition(&context, &selected, Package::is_prerelease);
        if eligible.is_empty() {
            return Err(OperationError::NotInPreRelease { packages: skipped });
        }

        let updates: Vec<VersionUpdate> = eligible
            .iter()
            .map(|package| VersionUpdate {
                name: package.name.clone(),
                old_version: package.version.clone(),
                new_version: version::strip_prerelease(&package.version),
                bump: Bump::None,
            })
            .collect();

        for update in &updates {
            state.clear_pre_release(&update.name);
        }

        let report = if input.dry_run {
            None
        } else {
            let report = self
                .manifest_writer
                .apply(&context.write_request(&updates))?;
            self.state_io.save_state(&context.state_path, &state)?;
            info!(packages = updates.len(), "exited pre-release");
            Some(report)
        };

        Ok(PreOutcome::Changed(PreOutput {
            updates,
            skipped,
            report,
        }))
    }
}

/// Splits selected names into packages passing `eligible` and the names of
/// the rest.
fn partition<'a>(
    context: &'a ProjectContext,
    selected: &[String],
    eligible: impl Fn(&Package) -> bool,
) -> (Vec<&'a Package>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for package in selected.iter().filter_map(|name| context.workspace.package(name)) {
        if eligible(package) {
            accepted.push(package);
        } else {
            rejected.push(package.name.clone());
        }
    }
    (accepted, rejected)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use conver_core::StickyState;
    use semver::Version;

    use super::*;
    use crate::mocks::{MockInteractionProvider, MockManifestWriter, MockProjectProvider, MockStateIO};

    fn v(text: &str) -> Version {
        Version::parse(text).expect("valid version")
    }

    fn changed(outcome: PreOutcome) -> PreOutput {
        match outcome {
            PreOutcome::Changed(output) => output,
            PreOutcome::Cancelled => panic!("operation was cancelled"),
        }
    }

    fn names(packages: &[&str]) -> Vec<String> {
        packages.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn enter_writes_suffix_and_records_origin() -> anyhow::Result<()> {
        let project = MockProjectProvider::single_package("my-crate", "1.2.3");
        let state_io = MockStateIO::new().with_state(StickyState::default());
        let writer = MockManifestWriter::new();
        let op = PreEnterOperation::new(project, state_io.clone(), writer.clone(), MockInteractionProvider::new());
        let input = PreEnterInput {
            id: Some("rc".to_string()),
            ..PreEnterInput::default()
        };

        let output = changed(op.execute(Path::new("/any"), input)?);

        assert_eq!(output.updates[0].new_version, v("1.2.3-rc.0"));
        assert_eq!(
            writer.applied(),
            vec![(PathBuf::from("/mock/project/Cargo.toml"), v("1.2.3-rc.0"))]
        );
        let saved = state_io.saved().expect("state saved");
        assert_eq!(saved.pre_release_origin("my-crate"), Some(&v("1.2.3")));
        Ok(())
    }

    #[test]
    fn enter_skips_packages_already_in_pre_release() -> anyhow::Result<()> {
        let project = MockProjectProvider::workspace(vec![("a", "1.0.0"), ("b", "2.0.0-beta.1")]);
        let mut state = StickyState::default();
        state.record_pre_release("b", v("1.9.0"));
        let state_io = MockStateIO::new().with_state(state);
        let op = PreEnterOperation::new(project, state_io, MockManifestWriter::new(), MockInteractionProvider::new());
        let input = PreEnterInput {
            packages: names(&["a", "b"]),
            id: Some("alpha".to_string()),
            dry_run: false,
        };

        let output = changed(op.execute(Path::new("/any"), input)?);

        assert_eq!(output.updates.len(), 1);
        assert_eq!(output.updates[0].new_version, v("1.0.0-alpha.0"));
        assert_eq!(output.skipped, vec!["b"]);
        Ok(())
    }

    #[test]
    fn enter_fails_when_nothing_is_stable() {
        let project = MockProjectProvider::workspace(vec![("a", "1.0.0-rc.0"), ("b", "1.0.0")]);
        let state_io = MockStateIO::new().with_state(StickyState::default());
        let op = PreEnterOperation::new(project, state_io, MockManifestWriter::new(), MockInteractionProvider::new());
        let input = PreEnterInput {
            packages: names(&["a"]),
            id: Some("rc".to_string()),
            dry_run: false,
        };

        let result = op.execute(Path::new("/any"), input);

        assert!(matches!(
            result,
            Err(OperationError::AlreadyInPreRelease { packages }) if packages == ["a"]
        ));
    }

    #[test]
    fn enter_prompts_for_missing_id() -> anyhow::Result<()> {
        let project = MockProjectProvider::single_package("my-crate", "0.4.0");
        let state_io = MockStateIO::new().with_state(StickyState::default());
        let interaction = MockInteractionProvider::new().with_text("beta");
        let op = PreEnterOperation::new(project, state_io, MockManifestWriter::new(), interaction);

        let output = changed(op.execute(Path::new("/any"), PreEnterInput::default())?);

        assert_eq!(output.updates[0].new_version, v("0.4.0-beta.0"));
        Ok(())
    }

    #[test]
    fn enter_dry_run_leaves_everything() -> anyhow::Result<()> {
        let project = MockProjectProvider::single_package("my-crate", "1.2.3");
        let state_io = MockStateIO::new().with_state(StickyState::default());
        let writer = MockManifestWriter::new();
        let op = PreEnterOperation::new(project, state_io.clone(), writer.clone(), MockInteractionProvider::new());
        let input = PreEnterInput {
            id: Some("rc".to_string()),
            dry_run: true,
            ..PreEnterInput::default()
        };

        let output = changed(op.execute(Path::new("/any"), input)?);

        assert!(output.report.is_none());
        assert!(writer.applied().is_empty());
        assert!(state_io.saved().is_none());
        Ok(())
    }

    #[test]
    fn exit_strips_suffix_and_clears_record() -> anyhow::Result<()> {
        let project = MockProjectProvider::single_package("my-crate", "1.3.0-rc.5");
        let mut state = StickyState::default();
        state.record_pre_release("my-crate", v("1.2.3"));
        let state_io = MockStateIO::new().with_state(state);
        let writer = MockManifestWriter::new();
        let op = PreExitOperation::new(project, state_io.clone(), writer.clone(), MockInteractionProvider::new());

        let output = changed(op.execute(Path::new("/any"), PreExitInput::default())?);

        assert_eq!(output.updates[0].new_version, v("1.3.0"));
        assert_eq!(
            writer.applied(),
            vec![(PathBuf::from("/mock/project/Cargo.toml"), v("1.3.0"))]
        );
        let saved = state_io.saved().expect("state saved");
        assert!(saved.pre_releases.is_empty());
        Ok(())
    }

    #[test]
    fn exit_fails_for_stable_packages() {
        let project = MockProjectProvider::single_package("my-crate", "1.2.3");
        let state_io = MockStateIO::new().with_state(StickyState::default());
        let op = PreExitOperation::new(project, state_io, MockManifestWriter::new(), MockInteractionProvider::new());

        let result = op.execute(Path::new("/any"), PreExitInput::default());

        assert!(matches!(
            result,
            Err(OperationError::NotInPreRelease { packages }) if packages == ["my-crate"]
        ));
    }

    #[test]
    fn exit_prompt_offers_only_pre_releases() -> anyhow::Result<()> {
        let project = MockProjectProvider::workspace(vec![("a", "1.0.0"), ("b", "2.0.0-rc.1"), ("c", "3.0.0-rc.0")]);
        let state_io = MockStateIO::new().with_state(StickyState::default());
        let interaction = MockInteractionProvider::new().with_packages(names(&["c"]));
        let op = PreExitOperation::new(project, state_io, MockManifestWriter::new(), interaction);

        let output = changed(op.execute(Path::new("/any"), PreExitInput::default())?);

        assert_eq!(op.interaction_provider.offered_packages(), vec!["b", "c"]);
        assert_eq!(output.updates[0].new_version, v("3.0.0"));
        Ok(())
    }
}
