use std::collections::HashMap;

use conver_core::Bump;
use serde::{Deserialize, Serialize};

use crate::inputs::DEFAULT_INPUTS;

const DEFAULT_BUMPS: &[(&str, Bump)] = &[
    ("patch", Bump::Patch),
    ("minor", Bump::Minor),
    ("breaking", Bump::Major),
    ("fix", Bump::Patch),
    ("feat", Bump::Minor),
    ("perf", Bump::Patch),
    ("peformance", Bump::Patch),
    ("docs", Bump::None),
    ("documentation", Bump::None),
    ("style", Bump::None),
    ("refactor", Bump::None),
    ("test", Bump::None),
    ("build", Bump::None),
    ("ci", Bump::None),
    ("chore", Bump::None),
];

/// Outcome of looking up a commit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpLookup {
    Known(Bump),
    Unrecognized,
}

/// Conventional-commit type to bump mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpTable {
    entries: HashMap<String, Bump>,
}

impl Default for BumpTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_BUMPS
                .iter()
                .map(|(name, bump)| ((*name).to_string(), *bump))
                .collect(),
        }
    }
}

impl BumpTable {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces the mapping for `commit_type`.
    pub fn set(&mut self, commit_type: impl Into<String>, bump: Bump) {
        self.entries.insert(commit_type.into(), bump);
    }

    #[must_use]
    pub fn with(mut self, commit_type: impl Into<String>, bump: Bump) -> Self {
        self.set(commit_type, bump);
        self
    }

    #[must_use]
    pub fn lookup(&self, commit_type: &str) -> BumpLookup {
        self.entries
            .get(commit_type)
            .copied()
            .map_or(BumpLookup::Unrecognized, BumpLookup::Known)
    }
}

/// How changed files are matched to the packages that contain them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ownership {
    /// Every package whose directory contains the file is affected, so a
    /// change inside a nested package also bumps the enclosing package.
    #[default]
    Containment,
    /// Only the deepest package containing the file is affected.
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Members share `major.minor`.
    Linked,
    /// Members share `major.minor.patch`.
    Fixed,
}

impl GroupKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::Fixed => "fixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    pub bump_table: BumpTable,
    /// File patterns relative to the workspace root; `!` marks an exclude.
    pub inputs: Vec<String>,
    pub linked: Vec<Vec<String>>,
    pub fixed: Vec<Vec<String>>,
    pub initial_pre_release: u64,
    pub preserve_pre_release: bool,
    pub allow_first_major: bool,
    pub prevent_major_bump: bool,
    pub ignore_invalid_commits: bool,
    /// A promotion replaces the inferred bump even when it is lower.
    pub override_inferred_bumps: bool,
    pub include_unchanged: bool,
    pub ownership: Ownership,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            bump_table: BumpTable::default(),
            inputs: DEFAULT_INPUTS.iter().map(ToString::to_string).collect(),
            linked: Vec::new(),
            fixed: Vec::new(),
            initial_pre_release: 0,
            preserve_pre_release: false,
            allow_first_major: false,
            prevent_major_bump: false,
            ignore_invalid_commits: false,
            override_inferred_bumps: false,
            include_unchanged: false,
            ownership: Ownership::default(),
        }
    }
}
