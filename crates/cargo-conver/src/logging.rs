use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogLevel {
    Silent,
    Error,
    #[default]
    Warn,
    Info,
    /// Planning decisions.
    Verbose,
    /// Everything, including dependency crates.
    Debug,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            Self::Silent => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Verbose => "warn,cargo_conver=debug,conver_engine=debug,conver_operations=debug",
            Self::Debug => "debug",
        }
    }
}

/// Installs the stderr subscriber. Called once, before any command runs.
pub(crate) fn init(level: LogLevel) {
    if level == LogLevel::Silent {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level.directive()))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
