use conver_operations::operations::{
    PreEnterInput, PreEnterOperation, PreExitInput, PreExitOperation, PreOutcome, PreOutput,
};
use conver_operations::providers::{
    FileSystemManifestWriter, FileSystemProjectProvider, FileSystemStateIO,
};

use super::{PreEnterArgs, PreExitArgs, Session};
use crate::error::Result;
use crate::output::format_updates;

pub(crate) fn run_enter(args: PreEnterArgs, session: &Session<'_>) -> Result<()> {
    let operation = PreEnterOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemStateIO::new(),
        FileSystemManifestWriter::new(),
        session.prompter(),
    );
    let input = PreEnterInput {
        packages: args.packages,
        id: args.id,
        dry_run: session.dry_run,
    };
    let outcome = operation.execute(session.start_path, input)?;

    print_outcome(&outcome, session, "Already in pre-release")
}

pub(crate) fn run_exit(args: PreExitArgs, session: &Session<'_>) -> Result<()> {
    let operation = PreExitOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemStateIO::new(),
        FileSystemManifestWriter::new(),
        session.prompter(),
    );
    let input = PreExitInput {
        packages: args.packages,
        dry_run: session.dry_run,
    };
    let outcome = operation.execute(session.start_path, input)?;

    print_outcome(&outcome, session, "Not in pre-release")
}

fn print_outcome(outcome: &PreOutcome, session: &Session<'_>, skipped_title: &str) -> Result<()> {
    match outcome {
        PreOutcome::Cancelled => println!("Cancelled - no changes made."),
        PreOutcome::Changed(output) if session.json => {
            println!("{}", serde_json::to_string_pretty(&output.updates)?);
        }
        PreOutcome::Changed(output) => print_output(output, skipped_title),
    }
    Ok(())
}

fn print_output(output: &PreOutput, skipped_title: &str) {
    if output.report.is_none() {
        println!("Dry run - no changes made.\n");
    }

    println!("Version updates:");
    print!("{}", format_updates(&output.updates));

    if !output.skipped.is_empty() {
        println!("\n{skipped_title}:");
        for name in &output.skipped {
            println!("  {name}");
        }
    }
}
