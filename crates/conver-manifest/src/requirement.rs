use semver::{Op, Version, VersionReq};

/// How dependency requirements on updated siblings may be rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangePolicy {
    /// Point stable requirements at a sibling's new pre-release.
    pub update_stable_to_pre_release: bool,
    /// Replace multi-comparator or non-caret/tilde/exact requirements.
    pub override_complex_range: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Wildcard,
    Unparseable,
    /// The sibling moved to a pre-release and the requirement is stable.
    StableRequirement,
    /// The requirement pins a pre-release while the sibling is now stable.
    OutdatedPreRelease,
    Complex,
}

/// Computes the requirement text that points `requirement` at `target`.
///
/// The operator of a simple requirement (`^`, `~`, `=` or none) is kept.
///
/// # Errors
///
/// Returns the reason the requirement is left alone.
pub fn rewrite_requirement(
    requirement: &str,
    target: &Version,
    policy: RangePolicy,
) -> Result<String, SkipReason> {
    let text = requirement.trim();
    if text == "*" {
        return Err(SkipReason::Wildcard);
    }

    let parsed = VersionReq::parse(text).map_err(|_| SkipReason::Unparseable)?;
    let mentions_pre = parsed.comparators.iter().any(|c| !c.pre.is_empty());

    if target.pre.is_empty() {
        if mentions_pre {
            return Err(SkipReason::OutdatedPreRelease);
        }
    } else if !mentions_pre && !policy.update_stable_to_pre_release {
        return Err(SkipReason::StableRequirement);
    }

    match simple_operator(text, &parsed) {
        Some(operator) => Ok(format!("{operator}{target}")),
        None if policy.override_complex_range => Ok(format!("^{target}")),
        None => Err(SkipReason::Complex),
    }
}

fn simple_operator<'t>(text: &'t str, parsed: &VersionReq) -> Option<&'t str> {
    let [comparator] = parsed.comparators.as_slice() else {
        return None;
    };
    if !matches!(comparator.op, Op::Caret | Op::Tilde | Op::Exact) {
        return None;
    }

    let end = text
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(text.len());
    Some(text[..end].trim_end())
}
