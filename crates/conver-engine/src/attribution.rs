use std::path::{Path, PathBuf};

use conver_core::{Bump, Commit, Workspace};
use tracing::debug;

use crate::error::Result;
use crate::inputs::InputFilter;
use crate::options::{BumpLookup, Ownership, PlanOptions};
use crate::plan::{InvalidCommit, PlanWarning};

/// Raw bumps inferred from commits, one slot per workspace package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub bumps: Vec<Bump>,
    pub warnings: Vec<PlanWarning>,
}

enum Owners {
    All,
    Only(Vec<usize>),
}

struct PackageRoot {
    path: PathBuf,
    depth: usize,
}

/// Infers the bump each package receives from `commits`.
///
/// # Errors
///
/// Returns `PlanError::InvalidInputPattern` if an input pattern is invalid.
pub fn attribute(
    workspace: &Workspace,
    commits: &[Commit],
    options: &PlanOptions,
) -> Result<Attribution> {
    let roots: Vec<PackageRoot> = workspace
        .packages()
        .iter()
        .map(|p| PackageRoot {
            path: absolute(workspace.root(), &p.path),
            depth: p.path.components().count(),
        })
        .collect();

    let filters = workspace
        .packages()
        .iter()
        .map(|p| {
            // Fallback to full path if the package lives outside the root
            let relative = p.path.strip_prefix(workspace.root()).unwrap_or(&p.path);
            InputFilter::for_package(&options.inputs, relative)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut bumps = vec![Bump::None; workspace.len()];
    let mut invalid = Vec::new();
    let mut unrecognized: Vec<(String, usize)> = Vec::new();

    for commit in commits {
        let Some(commit_type) = commit.commit_type.as_deref() else {
            invalid.push(InvalidCommit {
                hash: commit.hash.clone(),
                header: commit.header.clone(),
            });
            continue;
        };

        let bump = match options.bump_table.lookup(commit_type) {
            BumpLookup::Known(bump) => bump,
            BumpLookup::Unrecognized => {
                match unrecognized.iter_mut().find(|(t, _)| t == commit_type) {
                    Some((_, count)) => *count += 1,
                    None => unrecognized.push((commit_type.to_string(), 1)),
                }
                continue;
            }
        };
        if bump.is_none() {
            continue;
        }

        let mut touched = vec![false; workspace.len()];
        for change in &commit.diff {
            let file = absolute(workspace.root(), &change.path);
            let Ok(relative) = file.strip_prefix(workspace.root()) else {
                continue;
            };

            match owners(&roots, &file, options.ownership) {
                Owners::All => {
                    for (index, filter) in filters.iter().enumerate() {
                        touched[index] |= filter.matches(relative);
                    }
                }
                Owners::Only(indices) => {
                    for index in indices {
                        touched[index] |= filters[index].matches(relative);
                    }
                }
            }
        }

        for (index, hit) in touched.into_iter().enumerate() {
            if hit && bump > bumps[index] {
                debug!(
                    package = %workspace.packages()[index].name,
                    commit = commit.short_hash(),
                    %bump,
                    "commit raises bump"
                );
                bumps[index] = bump;
            }
        }
    }

    let mut warnings: Vec<PlanWarning> = unrecognized
        .into_iter()
        .map(|(commit_type, commits)| PlanWarning::UnrecognizedCommitType {
            commit_type,
            commits,
        })
        .collect();
    if !invalid.is_empty() && !options.ignore_invalid_commits {
        warnings.push(PlanWarning::InvalidCommits(invalid));
    }

    Ok(Attribution { bumps, warnings })
}

fn owners(roots: &[PackageRoot], file: &Path, ownership: Ownership) -> Owners {
    let containing = roots
        .iter()
        .enumerate()
        .filter(|(_, root)| file.starts_with(&root.path));

    let indices: Vec<usize> = match ownership {
        Ownership::Containment => containing.map(|(index, _)| index).collect(),
        Ownership::Nearest => containing
            .max_by_key(|(_, root)| root.depth)
            .map(|(index, _)| index)
            .into_iter()
            .collect(),
    };

    if indices.is_empty() {
        Owners::All
    } else {
        Owners::Only(indices)
    }
}

fn absolute(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
