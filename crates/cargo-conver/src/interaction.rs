use conver_core::Bump;
use conver_operations::traits::{InteractionProvider, PackageSelection};
use conver_operations::{OperationError, Result};
use dialoguer::{Confirm, Input, MultiSelect, Select};

const BUMP_ITEMS: [(&str, Bump); 3] = [
    ("patch - Bug fixes (backwards compatible)", Bump::Patch),
    ("minor - New features (backwards compatible)", Bump::Minor),
    ("major - Breaking changes", Bump::Major),
];

fn prompt_error(error: dialoguer::Error) -> OperationError {
    match error {
        dialoguer::Error::IO(io_err) => OperationError::Prompt(io_err),
    }
}

pub struct TerminalInteractionProvider;

impl InteractionProvider for TerminalInteractionProvider {
    fn select_packages(&self, prompt: &str, available: &[String]) -> Result<PackageSelection> {
        let selection = MultiSelect::new()
            .with_prompt(prompt)
            .items(available)
            .interact_opt()
            .map_err(prompt_error)?;

        Ok(match selection {
            Some(indices) => PackageSelection::Selected(
                indices.into_iter().map(|i| available[i].clone()).collect(),
            ),
            None => PackageSelection::Cancelled,
        })
    }

    fn select_bump(&self) -> Result<Option<Bump>> {
        let items: Vec<&str> = BUMP_ITEMS.iter().map(|(label, _)| *label).collect();

        let selection = Select::new()
            .with_prompt("Select the minimum bump")
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)?;

        Ok(selection.and_then(|i| BUMP_ITEMS.get(i)).map(|(_, bump)| *bump))
    }

    fn input_text(&self, prompt: &str, default: Option<&str>) -> Result<Option<String>> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }

        let text = input.interact_text().map_err(prompt_error)?;
        Ok(Some(text))
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact_opt()
            .map_err(prompt_error)?;

        Ok(answer.unwrap_or(false))
    }
}

/// Used when no terminal is available. Prompts with a default take it;
/// everything else fails with a hint about the missing argument.
pub struct NonInteractiveProvider;

impl InteractionProvider for NonInteractiveProvider {
    fn select_packages(&self, _prompt: &str, _available: &[String]) -> Result<PackageSelection> {
        Err(OperationError::InteractionRequired {
            reason: "package selection requires a terminal; pass package names as arguments",
        })
    }

    fn select_bump(&self) -> Result<Option<Bump>> {
        Err(OperationError::InteractionRequired {
            reason: "bump selection requires a terminal; pass --bump",
        })
    }

    fn input_text(&self, _prompt: &str, default: Option<&str>) -> Result<Option<String>> {
        default
            .map(|value| Some(value.to_string()))
            .ok_or(OperationError::InteractionRequired {
                reason: "missing input cannot be prompted for without a terminal",
            })
    }

    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Err(OperationError::InteractionRequired {
            reason: "confirmation requires a terminal; pass --yes",
        })
    }
}

/// The provider a command runs with, picked once per invocation.
pub enum Prompter {
    Terminal,
    Disabled,
}

impl InteractionProvider for Prompter {
    fn select_packages(&self, prompt: &str, available: &[String]) -> Result<PackageSelection> {
        match self {
            Self::Terminal => TerminalInteractionProvider.select_packages(prompt, available),
            Self::Disabled => NonInteractiveProvider.select_packages(prompt, available),
        }
    }

    fn select_bump(&self) -> Result<Option<Bump>> {
        match self {
            Self::Terminal => TerminalInteractionProvider.select_bump(),
            Self::Disabled => NonInteractiveProvider.select_bump(),
        }
    }

    fn input_text(&self, prompt: &str, default: Option<&str>) -> Result<Option<String>> {
        match self {
            Self::Terminal => TerminalInteractionProvider.input_text(prompt, default),
            Self::Disabled => NonInteractiveProvider.input_text(prompt, default),
        }
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        match self {
            Self::Terminal => TerminalInteractionProvider.confirm(prompt),
            Self::Disabled => NonInteractiveProvider.confirm(prompt),
        }
    }
}
