mod init;
mod pre;
mod promote;
mod status;
mod version;

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use conver_core::Bump;
use tracing::debug;

use crate::environment::{NonInteractiveReason, non_interactive_reason};
use crate::error::Result;
use crate::interaction::Prompter;
use crate::logging::LogLevel;

#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to start project discovery from (default: current directory)
    #[arg(long = "path", short = 'C', global = true)]
    pub path: Option<PathBuf>,

    /// Log level written to stderr
    #[arg(long = "log", env = "CONVER_LOG", value_enum, global = true)]
    pub log: Option<LogLevel>,

    /// Shorthand for --log verbose
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable output and silence logging
    #[arg(long, global = true)]
    pub json: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Never prompt; implies --yes
    #[arg(long, global = true)]
    pub ci: bool,

    /// Show what would change without writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,
}

impl GlobalArgs {
    pub(crate) fn log_level(&self) -> LogLevel {
        if self.json {
            LogLevel::Silent
        } else if self.verbose {
            LogLevel::Verbose
        } else {
            self.log.unwrap_or_default()
        }
    }
}

/// What every command needs besides its own arguments.
pub(crate) struct Session<'a> {
    pub start_path: &'a Path,
    pub json: bool,
    pub yes: bool,
    pub dry_run: bool,
    non_interactive: Option<NonInteractiveReason>,
}

impl<'a> Session<'a> {
    fn new(global: &GlobalArgs, start_path: &'a Path) -> Self {
        let non_interactive = non_interactive_reason(global.ci);
        if let Some(reason) = &non_interactive {
            debug!(reason = %reason.describe(), "prompts disabled");
        }

        Self {
            start_path,
            json: global.json,
            yes: global.yes || non_interactive.is_some(),
            dry_run: global.dry_run,
            non_interactive,
        }
    }

    pub(crate) fn prompter(&self) -> Prompter {
        if self.non_interactive.is_some() {
            Prompter::Disabled
        } else {
            Prompter::Terminal
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create the state file that anchors version history
    Init(InitArgs),
    /// Show packages and the version updates pending since the base commit
    Status,
    /// Apply pending version updates to manifests
    Version,
    /// Record a minimum bump for packages
    Promote(PromoteArgs),
    /// Move packages into or out of pre-release
    Pre(PreArgs),
}

#[derive(Args)]
pub(crate) struct InitArgs {
    /// Release branch to record (default: current branch)
    #[arg(long)]
    pub branch: Option<String>,

    /// Revision to start reading history from (default: HEAD~1)
    #[arg(long)]
    pub base: Option<String>,
}

#[derive(Args)]
pub(crate) struct PromoteArgs {
    /// Package names or patterns such as `conver-*` (prompts when omitted)
    pub packages: Vec<String>,

    /// Minimum bump to record (prompts when omitted)
    #[arg(long, value_enum)]
    pub bump: Option<Bump>,

    /// Replace an existing greater promotion
    #[arg(long = "override")]
    pub override_existing: bool,
}

#[derive(Args)]
pub(crate) struct PreArgs {
    #[command(subcommand)]
    pub command: PreCommand,
}

#[derive(Subcommand)]
pub(crate) enum PreCommand {
    /// Start a pre-release for stable packages
    Enter(PreEnterArgs),
    /// Finish the pre-release of packages
    Exit(PreExitArgs),
}

#[derive(Args)]
pub(crate) struct PreEnterArgs {
    /// Package names or patterns (prompts when omitted)
    pub packages: Vec<String>,

    /// Pre-release identifier, e.g. `rc` or `beta`
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args)]
pub(crate) struct PreExitArgs {
    /// Package names or patterns (prompts when omitted)
    pub packages: Vec<String>,
}

impl Commands {
    pub(crate) fn execute(self, global: &GlobalArgs, start_path: &Path) -> Result<()> {
        let session = Session::new(global, start_path);

        match self {
            Self::Init(args) => init::run(args, &session),
            Self::Status => status::run(&session),
            Self::Version => version::run(&session),
            Self::Promote(args) => promote::run(args, &session),
            Self::Pre(PreArgs {
                command: PreCommand::Enter(args),
            }) => pre::run_enter(args, &session),
            Self::Pre(PreArgs {
                command: PreCommand::Exit(args),
            }) => pre::run_exit(args, &session),
        }
    }
}
