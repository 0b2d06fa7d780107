use console::Style;
use dialoguer::theme::Theme;
use std::fmt;

/// Theme for choice prompts.
///
/// Visual rules:
/// - No prompt prefix
/// - Choices in magenta+bold brackets: `Continue? [yes/no]`
/// - Default in cyan+bold parentheses: `(yes): `
/// - After answering: `Continue? [yes/no]: yes`
pub struct ChoiceTheme {
    choices: String,
}

impl ChoiceTheme {
    pub fn new(choices: &[&str]) -> Self {
        Self {
            choices: choices.join("/"),
        }
    }
}

/// Unstyled prompt line, used when input is not a terminal.
pub fn plain_prompt(message: &str, choices: &[&str], default: &str) -> String {
    format!("{message} [{}] ({default}): ", choices.join("/"))
}

impl Theme for ChoiceTheme {
    fn format_prompt(&self, f: &mut dyn fmt::Write, prompt: &str) -> fmt::Result {
        write!(
            f,
            "{} {}",
            prompt,
            Style::new()
                .for_stdout()
                .magenta()
                .bold()
                .apply_to(format!("[{}]", self.choices))
        )
    }

    fn format_error(&self, f: &mut dyn fmt::Write, err: &str) -> fmt::Result {
        write!(f, "{}", Style::new().for_stdout().red().apply_to(err))
    }

    /// `Prompt [a/b] (default): `
    fn format_input_prompt(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        default: Option<&str>,
    ) -> fmt::Result {
        self.format_prompt(f, prompt)?;
        match default {
            Some(default) => write!(
                f,
                " {}: ",
                Style::new()
                    .for_stdout()
                    .cyan()
                    .bold()
                    .apply_to(format!("({default})"))
            ),
            None => write!(f, ": "),
        }
    }

    /// `Prompt [a/b]: value`
    fn format_input_prompt_selection(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        sel: &str,
    ) -> fmt::Result {
        self.format_prompt(f, prompt)?;
        write!(f, ": {}", Style::new().for_stdout().cyan().apply_to(sel))
    }
}
