use conver_operations::operations::{
    PromoteInput, PromoteOperation, PromoteOutcome, PromoteOutput,
};
use conver_operations::providers::{FileSystemProjectProvider, FileSystemStateIO};

use super::{PromoteArgs, Session};
use crate::error::Result;

pub(crate) fn run(args: PromoteArgs, session: &Session<'_>) -> Result<()> {
    let operation = PromoteOperation::new(
        FileSystemProjectProvider::new(),
        FileSystemStateIO::new(),
        session.prompter(),
    );
    let input = PromoteInput {
        packages: args.packages,
        bump: args.bump,
        override_existing: args.override_existing,
        dry_run: session.dry_run,
    };

    match operation.execute(session.start_path, input)? {
        PromoteOutcome::Cancelled => println!("Cancelled - no changes made."),
        PromoteOutcome::Promoted(output) => {
            if session.json {
                println!("{}", serde_json::to_string_pretty(&json_output(&output))?);
            } else {
                print_output(&output, session.dry_run);
            }
        }
    }

    Ok(())
}

fn json_output(output: &PromoteOutput) -> serde_json::Value {
    let conflicts: serde_json::Map<String, serde_json::Value> = output
        .conflicts
        .iter()
        .map(|(name, existing)| (name.clone(), existing.as_str().into()))
        .collect();

    serde_json::json!({
        "bump": output.bump,
        "updated": output.updated,
        "unchanged": output.unchanged,
        "conflicts": conflicts,
    })
}

fn print_output(output: &PromoteOutput, dry_run: bool) {
    if dry_run {
        println!("Dry run - no changes made.\n");
    }

    if !output.conflicts.is_empty() {
        println!("Already promoted further (use --override to replace):");
        for (name, existing) in &output.conflicts {
            println!("  {name}: {existing}");
        }
    }

    if !output.unchanged.is_empty() {
        println!("Already promoted to {}:", output.bump);
        for name in &output.unchanged {
            println!("  {name}");
        }
    }

    if output.updated.is_empty() {
        println!("No changes.");
        return;
    }

    println!("Promoted to {}:", output.bump);
    for name in &output.updated {
        println!("  {name}");
    }
}
