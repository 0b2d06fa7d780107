use std::io::{self, BufRead, IsTerminal, Write};

use conda_rich_core::ReporterError;
use console::Term;
use dialoguer::Input;

use crate::output::Sink;
use crate::theme::{ChoiceTheme, plain_prompt};

pub const INVALID_CHOICE: &str = "Please select one of the available options";

/// Ask until the answer is one of `choices`. Empty input selects `default`.
///
/// Uses an interactive `dialoguer` prompt when stdin and stdout are both
/// terminals. Otherwise stdin is read line by line, with the prompt written
/// to `sink`.
pub fn ask(
    sink: &Sink,
    message: &str,
    choices: &[&str],
    default: &str,
) -> Result<String, ReporterError> {
    check_arguments(choices, default)?;

    if let Some(term) = prompt_terminal(sink) {
        tracing::debug!(prompt = message, "prompting on terminal");
        ask_terminal(&term, message, choices, default)
    } else {
        tracing::debug!(prompt = message, "prompting from piped input");
        let stdin = io::stdin();
        let mut input = stdin.lock();
        ask_from(&mut input, &mut sink.clone(), message, choices, default)
    }
}

/// Terminal for an interactive prompt: stdout, the stream the rest of the
/// renderer writes to, when both it and stdin are attended.
fn prompt_terminal(sink: &Sink) -> Option<Term> {
    if sink.is_capture() {
        return None;
    }
    let term = Term::stdout();
    (term.is_term() && io::stdin().is_terminal()).then_some(term)
}

fn ask_terminal(
    term: &Term,
    message: &str,
    choices: &[&str],
    default: &str,
) -> Result<String, ReporterError> {
    let theme = ChoiceTheme::new(choices);
    let allowed: Vec<String> = choices.iter().map(|c| c.to_string()).collect();

    Input::<String>::with_theme(&theme)
        .with_prompt(message)
        .default(default.to_string())
        .validate_with(move |answer: &String| -> Result<(), &'static str> {
            if allowed.iter().any(|choice| choice == answer) {
                Ok(())
            } else {
                Err(INVALID_CHOICE)
            }
        })
        .interact_text_on(term)
        .map_err(|e| ReporterError::Prompt(e.to_string()))
}

/// Line-oriented prompt over arbitrary reader/writer pairs.
pub fn ask_from(
    input: &mut impl BufRead,
    output: &mut impl Write,
    message: &str,
    choices: &[&str],
    default: &str,
) -> Result<String, ReporterError> {
    check_arguments(choices, default)?;

    loop {
        write!(output, "{}", plain_prompt(message, choices, default))?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ReporterError::Prompt(
                "input ended before an answer was given".to_string(),
            ));
        }

        let answer = line.trim();
        if answer.is_empty() {
            return Ok(default.to_string());
        }
        if choices.contains(&answer) {
            return Ok(answer.to_string());
        }
        writeln!(output, "{INVALID_CHOICE}")?;
    }
}

fn check_arguments(choices: &[&str], default: &str) -> Result<(), ReporterError> {
    if choices.is_empty() {
        return Err(ReporterError::InvalidInput(
            "prompt needs at least one choice".to_string(),
        ));
    }
    if !choices.contains(&default) {
        return Err(ReporterError::InvalidInput(format!(
            "default '{default}' is not one of the choices"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run(
        stdin: &str,
        choices: &[&str],
        default: &str,
    ) -> (Result<String, ReporterError>, String) {
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut output = Vec::new();
        let answer = ask_from(&mut input, &mut output, "Continue?", choices, default);
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn accepts_listed_choice() {
        let (answer, output) = run("yes\n", &["yes", "no"], "yes");
        assert_eq!(answer.unwrap(), "yes");
        assert_eq!(output, "Continue? [yes/no] (yes): ");
    }

    #[test]
    fn empty_line_takes_default() {
        let (answer, _) = run("\n", &["yes", "no"], "no");
        assert_eq!(answer.unwrap(), "no");
    }

    #[test]
    fn reprompts_on_unknown_answer() {
        let (answer, output) = run("maybe\nno\n", &["yes", "no"], "yes");
        assert_eq!(answer.unwrap(), "no");
        assert_eq!(
            output,
            format!(
                "Continue? [yes/no] (yes): {INVALID_CHOICE}\nContinue? [yes/no] (yes): "
            )
        );
    }

    #[test]
    fn end_of_input_is_an_error() {
        let (answer, _) = run("", &["yes", "no"], "yes");
        assert!(matches!(answer, Err(ReporterError::Prompt(_))));
    }

    #[test]
    fn default_must_be_a_choice() {
        let (answer, output) = run("yes\n", &["yes", "no"], "later");
        assert!(matches!(answer, Err(ReporterError::InvalidInput(_))));
        assert!(output.is_empty());
    }

    #[test]
    fn captured_output_never_prompts_on_terminal() {
        assert!(prompt_terminal(&Sink::capture()).is_none());
    }

    #[test]
    fn choices_must_not_be_empty() {
        let (answer, _) = run("yes\n", &[], "yes");
        assert!(matches!(answer, Err(ReporterError::InvalidInput(_))));
    }
}
