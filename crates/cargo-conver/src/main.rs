mod commands;
mod environment;
mod error;
mod interaction;
mod logging;
mod output;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::commands::{Commands, GlobalArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "cargo-conver")]
#[command(bin_name = "cargo-conver")]
#[command(version = env!("CARGO_CONVER_VERSION"))]
#[command(about = "Version Cargo workspace packages from conventional commits", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(cargo_args(std::env::args_os()));

    logging::init(cli.global.log_level());

    let start_path = match resolve_start_path(cli.global.path.clone()) {
        Ok(path) => path,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli.command.execute(&cli.global, &start_path) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// `cargo conver ...` runs the binary as `cargo-conver conver ...`.
fn cargo_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut args: Vec<OsString> = args.into_iter().collect();
    if args.get(1).is_some_and(|arg| arg == "conver") {
        args.remove(1);
    }
    args
}

fn resolve_start_path(path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir().map_err(CliError::CurrentDir),
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
