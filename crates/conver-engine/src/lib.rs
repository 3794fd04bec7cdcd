//! Turns conventional-commit history into a version plan for a workspace.
//!
//! The engine performs no I/O. Callers hand it a [`Workspace`] snapshot, the
//! commits since the last release, [`PlanOptions`] and the [`StickyState`];
//! it returns a [`VersionPlan`] and consumes the promotions it used from the
//! state snapshot.
//!
//! [`Workspace`]: conver_core::Workspace
//! [`StickyState`]: conver_core::StickyState

mod attribution;
mod error;
mod inputs;
mod options;
mod plan;
mod prerelease;
mod propagation;
mod validate;

pub use attribution::{Attribution, attribute};
pub use error::{PlanError, Result};
pub use inputs::{DEFAULT_INPUTS, InputFilter};
pub use options::{BumpLookup, BumpTable, GroupKind, Ownership, PlanOptions};
pub use plan::{InvalidCommit, PlanWarning, Planner, VersionPlan, plan};
pub use prerelease::PreReleaseStatus;
pub use validate::validate;
