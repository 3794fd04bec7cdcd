use std::cmp::Ordering;

use conver_core::{Bump, PackagePattern, Workspace};
use conver_version as version;
use semver::Version;
use tracing::debug;

use crate::error::{PlanError, Result};
use crate::options::{GroupKind, PlanOptions};
use crate::plan::PlanWarning;
use crate::prerelease::Subject;

#[derive(Debug, Clone, Copy)]
struct Edge {
    dependent: usize,
    dependency: usize,
    peer: bool,
}

/// A linked or fixed group with its members as package indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedGroup {
    pub kind: GroupKind,
    pub members: Vec<usize>,
}

/// Resolves the configured group patterns against the workspace.
pub(crate) fn resolve_groups(
    workspace: &Workspace,
    options: &PlanOptions,
) -> Result<(Vec<ResolvedGroup>, Vec<PlanWarning>)> {
    let mut groups = Vec::new();
    let mut warnings = Vec::new();

    for (kind, sets) in [
        (GroupKind::Linked, &options.linked),
        (GroupKind::Fixed, &options.fixed),
    ] {
        for patterns in sets {
            let compiled = PackagePattern::compile_all(patterns)?;
            let members: Vec<usize> = workspace
                .packages()
                .iter()
                .enumerate()
                .filter(|(_, p)| PackagePattern::any_matches(&compiled, &p.name))
                .map(|(index, _)| index)
                .collect();

            if members.is_empty() {
                warnings.push(PlanWarning::UnmatchedGroup {
                    kind,
                    patterns: patterns.clone(),
                });
                continue;
            }

            debug!(kind = kind.as_str(), members = members.len(), "resolved group");
            groups.push(ResolvedGroup { kind, members });
        }
    }

    Ok((groups, warnings))
}

#[derive(Debug, Clone, Default)]
struct Ceilings {
    stable: Option<Version>,
    pre: Option<Version>,
}

impl Ceilings {
    /// Stable ceilings bind every member, pre-release ceilings only
    /// pre-release members.
    fn for_member(&self, prerelease: bool) -> Option<&Version> {
        match (&self.stable, &self.pre, prerelease) {
            (stable, Some(pre), true) => Some(stable.as_ref().map_or(pre, |s| greater(s, pre))),
            (stable, _, _) => stable.as_ref(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Propagation {
    pub bumps: Vec<Bump>,
    /// Group ceiling each package's stable triple must reach.
    pub floors: Vec<Option<Version>>,
    pub passes: usize,
}

/// Cascades bumps over dependency edges and group constraints until
/// nothing changes.
pub(crate) struct Propagator<'a> {
    subjects: &'a [Subject],
    groups: &'a [ResolvedGroup],
    edges: Vec<Edge>,
}

impl<'a> Propagator<'a> {
    pub fn new(
        workspace: &Workspace,
        subjects: &'a [Subject],
        groups: &'a [ResolvedGroup],
    ) -> Self {
        let mut edges = Vec::new();
        for (dependent, package) in workspace.packages().iter().enumerate() {
            for dependency in &package.dependencies {
                let Some(target) = workspace.index_of(&dependency.name) else {
                    continue;
                };
                if target != dependent {
                    edges.push(Edge {
                        dependent,
                        dependency: target,
                        peer: dependency.is_peer,
                    });
                }
            }
        }

        Self {
            subjects,
            groups,
            edges,
        }
    }

    /// Each productive pass raises at least one package by one level, so
    /// three levels per package bound the number of passes.
    pub fn max_passes(&self) -> usize {
        3 * self.subjects.len() + 1
    }

    pub fn run(&self, mut bumps: Vec<Bump>) -> Result<Propagation> {
        let limit = self.max_passes();

        for passes in 1..=limit {
            if !self.pass(&mut bumps) {
                debug!(passes, "propagation settled");
                let floors = self.floors(&bumps);
                return Ok(Propagation {
                    bumps,
                    floors,
                    passes,
                });
            }
        }

        Err(PlanError::PropagationDiverged { passes: limit })
    }

    /// Applies every rule once. Returns whether any bump changed.
    pub fn pass(&self, bumps: &mut [Bump]) -> bool {
        let mut changed = false;

        for edge in &self.edges {
            let theirs = bumps[edge.dependency];
            let wanted = if edge.peer && theirs >= Bump::Minor {
                Bump::Major
            } else if theirs >= Bump::Patch {
                Bump::Patch
            } else {
                Bump::None
            };
            changed |= raise(bumps, edge.dependent, wanted);
        }

        for group in self.groups {
            let ceilings = self.ceilings(group, bumps);
            for &member in &group.members {
                let subject = &self.subjects[member];
                let Some(ceiling) = ceilings.for_member(subject.status.is_prerelease()) else {
                    continue;
                };
                let projected = subject.projected_main(bumps[member]);
                changed |= raise(bumps, member, needed(&projected, ceiling, group.kind));
            }
        }

        changed
    }

    fn ceilings(&self, group: &ResolvedGroup, bumps: &[Bump]) -> Ceilings {
        let mut ceilings = Ceilings::default();
        for &member in &group.members {
            let subject = &self.subjects[member];
            let projected = subject.projected_main(bumps[member]);
            let slot = if subject.status.is_prerelease() {
                &mut ceilings.pre
            } else {
                &mut ceilings.stable
            };
            *slot = Some(match slot.take() {
                Some(current) => greater(&current, &projected).clone(),
                None => projected,
            });
        }
        ceilings
    }

    fn floors(&self, bumps: &[Bump]) -> Vec<Option<Version>> {
        let mut floors: Vec<Option<Version>> = vec![None; self.subjects.len()];

        for group in self.groups {
            let ceilings = self.ceilings(group, bumps);
            for &member in &group.members {
                let prerelease = self.subjects[member].status.is_prerelease();
                let Some(ceiling) = ceilings.for_member(prerelease) else {
                    continue;
                };
                let floor = match group.kind {
                    GroupKind::Linked => Version::new(ceiling.major, ceiling.minor, 0),
                    GroupKind::Fixed => version::strip_prerelease(ceiling),
                };
                floors[member] = Some(match floors[member].take() {
                    Some(existing) => greater(&existing, &floor).clone(),
                    None => floor,
                });
            }
        }

        floors
    }
}

fn raise(bumps: &mut [Bump], index: usize, wanted: Bump) -> bool {
    if wanted > bumps[index] {
        bumps[index] = wanted;
        true
    } else {
        false
    }
}

fn greater<'v>(a: &'v Version, b: &'v Version) -> &'v Version {
    if version::compare_main(a, b) == Ordering::Less {
        b
    } else {
        a
    }
}

/// Smallest bump that brings `projected` level with `ceiling`.
fn needed(projected: &Version, ceiling: &Version, kind: GroupKind) -> Bump {
    if ceiling.major > projected.major {
        Bump::Major
    } else if ceiling.major == projected.major && ceiling.minor > projected.minor {
        Bump::Minor
    } else if kind == GroupKind::Fixed
        && ceiling.major == projected.major
        && ceiling.minor == projected.minor
        && ceiling.patch > projected.patch
    {
        Bump::Patch
    } else {
        Bump::None
    }
}
