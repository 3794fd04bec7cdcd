use std::cmp::Ordering;

use conver_core::{Bump, Package, StickyState};
use conver_version as version;
use semver::Version;

use crate::error::{PlanError, Result};
use crate::options::PlanOptions;

/// Where a package stands with respect to pre-releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreReleaseStatus {
    Stable,
    /// Pre-release version with the stable version it started from.
    InPreRelease { origin: Version },
}

impl PreReleaseStatus {
    /// # Errors
    ///
    /// Returns `PlanError::MissingPreReleaseOrigin` for a pre-release version
    /// without a recorded origin.
    pub fn classify(package: &Package, state: &StickyState) -> Result<Self> {
        if !version::is_prerelease(&package.version) {
            return Ok(Self::Stable);
        }

        state
            .pre_release_origin(&package.name)
            .map(|origin| Self::InPreRelease {
                origin: origin.clone(),
            })
            .ok_or_else(|| PlanError::MissingPreReleaseOrigin {
                package: package.name.clone(),
                version: package.version.clone(),
            })
    }

    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        matches!(self, Self::InPreRelease { .. })
    }
}

/// Per-package inputs to version arithmetic.
#[derive(Debug, Clone)]
pub(crate) struct Subject {
    pub current: Version,
    pub status: PreReleaseStatus,
    /// 0.x packages keep breaking changes within the minor component.
    pub major_locked: bool,
}

impl Subject {
    pub fn new(
        package: &Package,
        status: PreReleaseStatus,
        promotion: Bump,
        options: &PlanOptions,
    ) -> Self {
        Self {
            major_locked: package.version.major == 0
                && promotion != Bump::Major
                && !options.allow_first_major,
            current: package.version.clone(),
            status,
        }
    }

    pub fn effective(&self, bump: Bump) -> Bump {
        if self.major_locked && bump == Bump::Major {
            Bump::Minor
        } else {
            bump
        }
    }

    fn base(&self) -> &Version {
        match &self.status {
            PreReleaseStatus::Stable => &self.current,
            PreReleaseStatus::InPreRelease { origin } => origin,
        }
    }

    /// The stable triple this package ends on for `bump`.
    pub fn projected_main(&self, bump: Bump) -> Version {
        let next = version::increment(self.base(), self.effective(bump));
        match self.status {
            PreReleaseStatus::Stable => next,
            PreReleaseStatus::InPreRelease { .. } => {
                let reached = version::strip_prerelease(&self.current);
                if version::compare_main(&reached, &next) == Ordering::Less {
                    next
                } else {
                    reached
                }
            }
        }
    }

    /// Computes the version this package moves to.
    ///
    /// `floor` is a group ceiling the stable triple must reach. It is ignored
    /// when reaching it would cross a locked 0.x major.
    pub fn next_version(
        &self,
        bump: Bump,
        floor: Option<&Version>,
        options: &PlanOptions,
    ) -> Result<Version> {
        let mut next = version::increment(self.base(), self.effective(bump));
        if let Some(floor) = floor {
            let crosses_lock = self.major_locked && floor.major > self.base().major;
            if !crosses_lock && version::compare_main(&next, floor) == Ordering::Less {
                next = version::strip_prerelease(floor);
            }
        }

        if let PreReleaseStatus::InPreRelease { .. } = self.status {
            version::carry_prerelease(&mut next, &self.current);
            if version::compare_main(&self.current, &next) != Ordering::Less {
                next = self.current.clone();
                version::bump_prerelease_sequence(&mut next)?;
            } else if options.preserve_pre_release {
                version::bump_prerelease_sequence(&mut next)?;
            } else {
                version::reset_prerelease_sequence(&mut next, options.initial_pre_release)?;
            }
        }

        Ok(next)
    }
}
