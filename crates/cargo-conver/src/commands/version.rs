use conver_core::VersionUpdate;
use conver_manifest::{EditOutcome, SkipReason};
use conver_operations::operations::{VersionInput, VersionOperation, VersionOutcome};
use conver_operations::providers::{
    FileSystemManifestWriter, FileSystemProjectProvider, FileSystemStateIO, Git2Provider,
};
use conver_operations::traits::ManifestWriteReport;
use tracing::warn;

use super::Session;
use crate::error::Result;
use crate::output::{format_dependency_edits, format_updates};

pub(crate) fn run(session: &Session<'_>) -> Result<()> {
    let operation = VersionOperation::new(
        FileSystemProjectProvider::new(),
        Git2Provider::new(),
        FileSystemStateIO::new(),
        FileSystemManifestWriter::new(),
        session.prompter(),
    );

    let pending = operation.plan(session.start_path)?;
    for warning in &pending.plan.warnings {
        warn!("{warning}");
    }

    // The confirmation prompt needs the plan on screen first.
    let shown = pending.has_changes() && !session.yes && !session.dry_run && !session.json;
    if shown {
        print_plan(pending.plan.changes());
    }

    let input = VersionInput {
        dry_run: session.dry_run,
        yes: session.yes,
    };
    let output = operation.apply(pending, input)?;

    if session.json {
        println!("{}", serde_json::to_string_pretty(&output.plan.updates)?);
        return Ok(());
    }

    match &output.outcome {
        VersionOutcome::NoUpdates => println!("No version updates"),
        outcome => {
            if !shown {
                print_plan(output.plan.changes());
            }
            print_outcome(outcome);
        }
    }
    Ok(())
}

fn print_plan<'a>(changes: impl IntoIterator<Item = &'a VersionUpdate>) {
    println!("Version updates:");
    print!("{}", format_updates(changes));
}

fn print_outcome(outcome: &VersionOutcome) {
    match outcome {
        VersionOutcome::NoUpdates => {}
        VersionOutcome::DryRun => println!("\nDry run - no changes made."),
        VersionOutcome::Cancelled => println!("\nCancelled - no changes made."),
        VersionOutcome::Applied { report, .. } => print_report(report),
    }
}

fn print_report(report: &ManifestWriteReport) {
    let rewritten = format_dependency_edits(&report.dependency_edits);
    if !rewritten.is_empty() {
        println!("\nDependency requirements:");
        print!("{rewritten}");
    }

    for name in &report.inherited_replaced {
        warn!("'{name}' inherited its version from the workspace; it now has its own version");
    }

    for (manifest, edit) in &report.dependency_edits {
        if edit.outcome == EditOutcome::Skipped(SkipReason::OutdatedPreRelease) {
            warn!(
                "{}: [{}] {} still requires the pre-release {}",
                manifest.display(),
                edit.section,
                edit.key,
                edit.from
            );
        }
    }

    println!("\nUpdated {} manifest(s).", report.written.len());
}
