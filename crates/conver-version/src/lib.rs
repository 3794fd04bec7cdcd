//! Version arithmetic used by the planner.
//!
//! Everything here works on [`semver::Version`]. Pre-release components are
//! handled as dot-separated identifier lists. Every numeric identifier is
//! part of the release sequence (`rc.1.beta.2` moves to `rc.2.beta.3`).

mod error;

use std::cmp::Ordering;

use conver_core::Bump;
use semver::{Prerelease, Version};

pub use error::{Result, VersionError};

/// # Errors
///
/// Returns `VersionError::InvalidVersion` if `input` is not a semver version.
pub fn parse(input: &str) -> Result<Version> {
    Version::parse(input.trim()).map_err(|source| VersionError::InvalidVersion {
        input: input.to_string(),
        source,
    })
}

#[must_use]
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre.is_empty()
}

/// Bumps the stable triple of `base`. Pre-release and build metadata are
/// dropped; `Bump::None` yields the bare triple.
#[must_use]
pub fn increment(base: &Version, bump: Bump) -> Version {
    let mut next = Version::new(base.major, base.minor, base.patch);

    match bump {
        Bump::None => {}
        Bump::Patch => {
            next.patch += 1;
        }
        Bump::Minor => {
            next.minor += 1;
            next.patch = 0;
        }
        Bump::Major => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
        }
    }

    next
}

/// # Errors
///
/// Returns `VersionError::InvalidVersion` if `base` does not parse.
pub fn increment_str(base: &str, bump: Bump) -> Result<Version> {
    Ok(increment(&parse(base)?, bump))
}

pub fn carry_prerelease(target: &mut Version, source: &Version) {
    target.pre = source.pre.clone();
}

#[must_use]
pub fn strip_prerelease(version: &Version) -> Version {
    Version::new(version.major, version.minor, version.patch)
}

/// Builds `<base>-<id>.<initial>` from the stable triple of `base`.
///
/// # Errors
///
/// Returns `VersionError::InvalidPreReleaseId` if `id` is not a valid
/// pre-release identifier list.
pub fn with_prerelease(base: &Version, id: &str, initial: u64) -> Result<Version> {
    let text = format!("{id}.{initial}");
    let pre = Prerelease::new(&text).map_err(|source| VersionError::InvalidPreReleaseId {
        id: id.to_string(),
        source,
    })?;

    let mut version = strip_prerelease(base);
    version.pre = pre;
    Ok(version)
}

/// Increments every numeric pre-release identifier.
///
/// # Errors
///
/// Only fails if the rebuilt identifier list is rejected, which cannot
/// happen for lists that were valid before.
pub fn bump_prerelease_sequence(version: &mut Version) -> Result<()> {
    rewrite_sequence(version, |n| n.saturating_add(1))
}

/// Replaces every numeric pre-release identifier with `initial`.
///
/// # Errors
///
/// See [`bump_prerelease_sequence`].
pub fn reset_prerelease_sequence(version: &mut Version, initial: u64) -> Result<()> {
    rewrite_sequence(version, |_| initial)
}

fn rewrite_sequence(version: &mut Version, f: impl Fn(u64) -> u64) -> Result<()> {
    if version.pre.is_empty() {
        return Ok(());
    }

    let text = version
        .pre
        .as_str()
        .split('.')
        .map(|id| match id.parse::<u64>() {
            Ok(n) => f(n).to_string(),
            Err(_) => id.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".");
    version.pre = Prerelease::new(&text).map_err(|source| VersionError::InvalidPreReleaseId {
        id: text.clone(),
        source,
    })?;
    Ok(())
}

/// Full precedence ordering. Build metadata is ignored.
#[must_use]
pub fn compare(a: &Version, b: &Version) -> Ordering {
    compare_main(a, b).then_with(|| a.pre.cmp(&b.pre))
}

/// Compares only `major.minor.patch`.
#[must_use]
pub fn compare_main(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch).cmp(&(b.major, b.minor, b.patch))
}
