use conver_core::{Package, PackagePattern, Workspace};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{InteractionProvider, PackageSelection};

pub(crate) enum Selection {
    Packages(Vec<String>),
    Cancelled,
}

/// Resolves package arguments (names or `*` patterns) against the workspace.
///
/// Without arguments a single-package workspace selects its package and
/// anything larger asks the user to choose among the `eligible` packages.
pub(crate) fn select_packages<I, F>(
    workspace: &Workspace,
    requested: &[String],
    eligible: F,
    interaction: &I,
    prompt: &str,
) -> Result<Selection>
where
    I: InteractionProvider,
    F: Fn(&Package) -> bool,
{
    if workspace.is_empty() {
        return Err(OperationError::EmptyProject(workspace.root().to_path_buf()));
    }

    if !requested.is_empty() {
        return match_requested(workspace, requested).map(Selection::Packages);
    }

    if let [only] = workspace.packages() {
        return Ok(Selection::Packages(vec![only.name.clone()]));
    }

    let available: Vec<String> = workspace
        .packages()
        .iter()
        .filter(|p| eligible(p))
        .map(|p| p.name.clone())
        .collect();
    if available.is_empty() {
        return Err(OperationError::NoPackagesSelected);
    }

    match interaction.select_packages(prompt, &available)? {
        PackageSelection::Selected(names) if !names.is_empty() => Ok(Selection::Packages(names)),
        PackageSelection::Selected(_) | PackageSelection::Cancelled => Ok(Selection::Cancelled),
    }
}

fn match_requested(workspace: &Workspace, requested: &[String]) -> Result<Vec<String>> {
    let patterns = PackagePattern::compile_all(requested)?;

    for pattern in &patterns {
        if !workspace.packages().iter().any(|p| pattern.matches(&p.name)) {
            return Err(OperationError::UnknownPackage {
                name: pattern.as_str().to_string(),
                available: workspace
                    .packages()
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
    }

    Ok(workspace
        .packages()
        .iter()
        .filter(|p| PackagePattern::any_matches(&patterns, &p.name))
        .map(|p| p.name.clone())
        .collect())
}
