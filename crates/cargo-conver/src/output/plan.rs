use std::path::PathBuf;

use conver_core::VersionUpdate;
use conver_manifest::{DependencyEdit, EditOutcome};

pub(crate) fn format_update(update: &VersionUpdate) -> String {
    if update.bump.is_none() {
        format!(
            "{}: {} -> {}",
            update.name, update.old_version, update.new_version
        )
    } else {
        format!(
            "{}: {} -> {} ({})",
            update.name, update.old_version, update.new_version, update.bump
        )
    }
}

/// One indented line per update, in the order given.
pub(crate) fn format_updates<'a>(updates: impl IntoIterator<Item = &'a VersionUpdate>) -> String {
    let mut output = String::new();
    for update in updates {
        output.push_str("  ");
        output.push_str(&format_update(update));
        output.push('\n');
    }
    output
}

/// Lists the requirement rewrites. Skipped requirements are left to the
/// caller, which decides whether they deserve a warning.
pub(crate) fn format_dependency_edits(edits: &[(PathBuf, DependencyEdit)]) -> String {
    let mut output = String::new();
    for (manifest, edit) in edits {
        if let EditOutcome::Rewritten { to } = &edit.outcome {
            output.push_str(&format!(
                "  {}: [{}] {} {} -> {}\n",
                manifest.display(),
                edit.section,
                edit.key,
                edit.from,
                to
            ));
        }
    }
    output
}
