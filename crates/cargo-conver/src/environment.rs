use std::io::IsTerminal;

const NO_TTY_VAR: &str = "CONVER_NO_TTY";
const FORCE_TTY_VAR: &str = "CONVER_FORCE_TTY";

const CI_ENV_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TF_BUILD",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonInteractiveReason {
    ExplicitDisable,
    CiFlag,
    CiDetected { env_var: String },
    NoTerminal,
}

impl NonInteractiveReason {
    pub fn describe(&self) -> String {
        match self {
            Self::ExplicitDisable => format!("{NO_TTY_VAR} is set"),
            Self::CiFlag => "--ci was given".to_string(),
            Self::CiDetected { env_var } => format!("CI detected via {env_var}"),
            Self::NoTerminal => "stdin is not a terminal".to_string(),
        }
    }
}

/// Decides whether prompts may be shown. `--ci` always wins; otherwise the
/// environment decides.
pub fn non_interactive_reason(ci_flag: bool) -> Option<NonInteractiveReason> {
    if ci_flag {
        return Some(NonInteractiveReason::CiFlag);
    }

    if std::env::var(NO_TTY_VAR).is_ok() {
        return Some(NonInteractiveReason::ExplicitDisable);
    }

    if std::env::var(FORCE_TTY_VAR).is_ok() {
        return None;
    }

    if let Some(env_var) = detect_ci_env_var() {
        return Some(NonInteractiveReason::CiDetected { env_var });
    }

    if !std::io::stdin().is_terminal() {
        return Some(NonInteractiveReason::NoTerminal);
    }

    None
}

fn detect_ci_env_var() -> Option<String> {
    CI_ENV_VARS
        .iter()
        .find(|var| std::env::var(var).is_ok())
        .map(|var| (*var).to_string())
}
