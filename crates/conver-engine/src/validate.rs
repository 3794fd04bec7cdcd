use conver_core::Bump;

use crate::error::{PlanError, Result};
use crate::options::PlanOptions;
use crate::plan::VersionPlan;

/// Checks a plan against release policy before anything is written.
///
/// # Errors
///
/// Returns `PlanError::MajorBumpPrevented` listing every package with a
/// major update when `prevent_major_bump` is set.
pub fn validate(plan: &VersionPlan, options: &PlanOptions) -> Result<()> {
    if !options.prevent_major_bump {
        return Ok(());
    }

    let packages: Vec<String> = plan
        .changes()
        .filter(|u| u.bump == Bump::Major)
        .map(|u| u.name.clone())
        .collect();

    if packages.is_empty() {
        Ok(())
    } else {
        Err(PlanError::MajorBumpPrevented { packages })
    }
}
