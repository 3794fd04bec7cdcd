use conver_operations::operations::StatusOperation;
use conver_operations::providers::{FileSystemProjectProvider, FileSystemStateIO, Git2Provider};
use tracing::warn;

use super::Session;
use crate::error::Result;
use crate::output::{PlainTextStatusFormatter, StatusFormatter};

pub(crate) fn run(session: &Session<'_>) -> Result<()> {
    let operation = StatusOperation::new(
        FileSystemProjectProvider::new(),
        Git2Provider::new(),
        FileSystemStateIO::new(),
    );
    let output = operation.execute(session.start_path)?;

    for warning in &output.plan.warnings {
        warn!("{warning}");
    }

    if session.json {
        println!("{}", serde_json::to_string_pretty(&output.plan.updates)?);
    } else {
        print!("{}", PlainTextStatusFormatter.format_status(&output));
    }

    Ok(())
}
