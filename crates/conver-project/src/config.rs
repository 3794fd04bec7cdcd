use std::path::{Path, PathBuf};

use conver_core::{Bump, PackagePattern};
use conver_engine::{BumpTable, Ownership, PlanOptions};
use conver_manifest::RangePolicy;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ProjectError;
use crate::manifest::read_manifest;
use crate::project::{CargoProject, ProjectKind};

/// Raw `[workspace.metadata.conver]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConverMetadata {
    #[serde(default)]
    bumps: IndexMap<String, Bump>,
    inputs: Option<Vec<String>>,
    #[serde(default)]
    linked: Vec<Vec<String>>,
    #[serde(default)]
    fixed: Vec<Vec<String>>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    include_private: bool,
    #[serde(default)]
    initial_pre_release: u64,
    #[serde(default)]
    preserve_pre_release: bool,
    #[serde(default)]
    allow_first_major: bool,
    #[serde(default)]
    prevent_major_bump: bool,
    #[serde(default)]
    ignore_invalid_commits: bool,
    #[serde(default)]
    override_inferred_bumps: bool,
    #[serde(default)]
    include_unchanged: bool,
    #[serde(default)]
    ownership: Ownership,
    state_dir: Option<PathBuf>,
    update_dependencies: Option<bool>,
    #[serde(default)]
    override_complex_range: bool,
    #[serde(default)]
    update_stable_to_pre_release: bool,
    #[serde(default)]
    ignore_outdated_pre_release: bool,
}

#[derive(Debug, Clone)]
pub struct ConverConfig {
    plan: PlanOptions,
    include: Vec<PackagePattern>,
    exclude: Vec<PackagePattern>,
    include_private: bool,
    state_dir: PathBuf,
    update_dependencies: bool,
    range_policy: RangePolicy,
    ignore_outdated_pre_release: bool,
}

impl Default for ConverConfig {
    fn default() -> Self {
        Self {
            plan: PlanOptions::default(),
            include: Vec::new(),
            exclude: Vec::new(),
            include_private: false,
            state_dir: PathBuf::from(crate::DEFAULT_STATE_DIR),
            update_dependencies: true,
            range_policy: RangePolicy::default(),
            ignore_outdated_pre_release: false,
        }
    }
}

impl ConverConfig {
    #[must_use]
    pub fn plan_options(&self) -> &PlanOptions {
        &self.plan
    }

    #[must_use]
    pub fn include(&self) -> &[PackagePattern] {
        &self.include
    }

    #[must_use]
    pub fn exclude(&self) -> &[PackagePattern] {
        &self.exclude
    }

    #[must_use]
    pub fn include_private(&self) -> bool {
        self.include_private
    }

    /// Relative to the project root.
    #[must_use]
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    #[must_use]
    pub fn update_dependencies(&self) -> bool {
        self.update_dependencies
    }

    #[must_use]
    pub fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    #[must_use]
    pub fn ignore_outdated_pre_release(&self) -> bool {
        self.ignore_outdated_pre_release
    }

    #[must_use]
    pub fn with_plan_options(mut self, plan: PlanOptions) -> Self {
        self.plan = plan;
        self
    }

    fn from_metadata(metadata: ConverMetadata) -> Result<Self, ProjectError> {
        let mut bump_table = BumpTable::default();
        for (commit_type, bump) in metadata.bumps {
            bump_table.set(commit_type, bump);
        }

        let defaults = PlanOptions::default();
        let plan = PlanOptions {
            bump_table,
            inputs: metadata.inputs.unwrap_or(defaults.inputs),
            linked: metadata.linked,
            fixed: metadata.fixed,
            initial_pre_release: metadata.initial_pre_release,
            preserve_pre_release: metadata.preserve_pre_release,
            allow_first_major: metadata.allow_first_major,
            prevent_major_bump: metadata.prevent_major_bump,
            ignore_invalid_commits: metadata.ignore_invalid_commits,
            override_inferred_bumps: metadata.override_inferred_bumps,
            include_unchanged: metadata.include_unchanged,
            ownership: metadata.ownership,
        };

        Ok(Self {
            plan,
            include: PackagePattern::compile_all(&metadata.include)?,
            exclude: PackagePattern::compile_all(&metadata.exclude)?,
            include_private: metadata.include_private,
            state_dir: metadata
                .state_dir
                .unwrap_or_else(|| PathBuf::from(crate::DEFAULT_STATE_DIR)),
            update_dependencies: metadata.update_dependencies.unwrap_or(true),
            range_policy: RangePolicy {
                update_stable_to_pre_release: metadata.update_stable_to_pre_release,
                override_complex_range: metadata.override_complex_range,
            },
            ignore_outdated_pre_release: metadata.ignore_outdated_pre_release,
        })
    }
}

/// Parses the conver configuration based on project kind.
///
/// For single-package projects, reads from `[package.metadata.conver]`.
/// For workspaces, reads from `[workspace.metadata.conver]`.
///
/// # Errors
///
/// Returns `ProjectError::InvalidConfig` if a key has an invalid value, or an
/// error if the manifest cannot be read or parsed.
pub fn parse_config(project: &CargoProject) -> Result<ConverConfig, ProjectError> {
    let manifest_path = project.manifest_path();
    let manifest = read_manifest(&manifest_path)?;

    let table = match project.kind {
        ProjectKind::SinglePackage => manifest.package.and_then(|pkg| pkg.metadata),
        ProjectKind::VirtualWorkspace | ProjectKind::WorkspaceWithRoot => {
            manifest.workspace.and_then(|ws| ws.metadata)
        }
    }
    .and_then(|meta| meta.conver);

    let metadata = match table {
        Some(value) => {
            ConverMetadata::deserialize(value).map_err(|source| ProjectError::InvalidConfig {
                path: manifest_path.clone(),
                source,
            })?
        }
        None => ConverMetadata::default(),
    };

    ConverConfig::from_metadata(metadata)
}
