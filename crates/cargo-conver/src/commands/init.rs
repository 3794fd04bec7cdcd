use conver_operations::operations::{InitInput, InitOperation, InitOutput};
use conver_operations::providers::{FileSystemProjectProvider, FileSystemStateIO, Git2Provider};
use tracing::warn;

use super::{InitArgs, Session};
use crate::error::Result;

pub(crate) fn run(args: InitArgs, session: &Session<'_>) -> Result<()> {
    let operation = InitOperation::new(
        FileSystemProjectProvider::new(),
        Git2Provider::new(),
        FileSystemStateIO::new(),
        session.prompter(),
    );
    let input = InitInput {
        branch: args.branch,
        base: args.base,
        dry_run: session.dry_run,
    };
    let output = operation.execute(session.start_path, input)?;

    if output.base.is_none() {
        warn!("HEAD has no parent; the first version run will read the whole history");
    }

    if session.json {
        println!("{}", serde_json::to_string_pretty(&json_output(&output))?);
    } else {
        print_output(&output, session.dry_run);
    }

    Ok(())
}

fn json_output(output: &InitOutput) -> serde_json::Value {
    serde_json::json!({
        "statePath": output.state_path,
        "branch": output.branch,
        "base": output.base,
    })
}

fn print_output(output: &InitOutput, dry_run: bool) {
    if dry_run {
        println!("Dry run - no changes made.\n");
        println!("Would create state file at '{}'", output.state_path.display());
    } else {
        println!("Created state file at '{}'", output.state_path.display());
    }
    if let Some(branch) = &output.branch {
        println!("  branch: {branch}");
    }
    match &output.base {
        Some(base) => println!("  base: {base}"),
        None => println!("  base: none"),
    }
}
