use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{PlanError, Result};

pub const DEFAULT_INPUTS: [&str; 2] = ["{workspace}/**/*", "{package}/**/*"];

const WORKSPACE_PLACEHOLDERS: [&str; 3] = ["{workspace}", "{workspaceRoot}", "{root}"];
const PACKAGE_PLACEHOLDERS: [&str; 5] = [
    "{package}",
    "{packageRoot}",
    "{pkg}",
    "{projectRoot}",
    "{project}",
];

/// Include/exclude file filter for one package.
///
/// Patterns are resolved relative to the workspace root: `{workspace}`
/// becomes the root itself and `{package}` the package directory.
#[derive(Debug, Clone)]
pub struct InputFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl InputFilter {
    /// # Errors
    ///
    /// Returns `PlanError::InvalidInputPattern` for a pattern globset rejects.
    pub fn for_package<S: AsRef<str>>(patterns: &[S], package_dir: &Path) -> Result<Self> {
        let package_dir = slash_path(package_dir);
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let (target, raw) = match pattern.strip_prefix('!') {
                Some(rest) => (&mut exclude, rest),
                None => (&mut include, pattern),
            };
            let resolved = substitute(raw, &package_dir);
            let glob = GlobBuilder::new(&resolved)
                .literal_separator(true)
                .build()
                .map_err(|source| PlanError::InvalidInputPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            target.add(glob);
        }

        let build = |builder: GlobSetBuilder| {
            builder
                .build()
                .map_err(|source| PlanError::InvalidInputPattern {
                    pattern: patterns
                        .iter()
                        .map(AsRef::as_ref)
                        .collect::<Vec<_>>()
                        .join(", "),
                    source,
                })
        };

        Ok(Self {
            include: build(include)?,
            exclude: build(exclude)?,
        })
    }

    /// `relative` is a path relative to the workspace root.
    #[must_use]
    pub fn matches(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }
}

fn substitute(pattern: &str, package_dir: &str) -> String {
    let mut resolved = pattern.to_string();
    for placeholder in PACKAGE_PLACEHOLDERS {
        resolved = resolved.replace(placeholder, package_dir);
    }
    for placeholder in WORKSPACE_PLACEHOLDERS {
        resolved = resolved.replace(placeholder, "");
    }

    while resolved.contains("//") {
        resolved = resolved.replace("//", "/");
    }
    let trimmed = resolved.trim_start_matches("./").trim_start_matches('/');
    trimmed.to_string()
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
