use std::any::Any;
use std::fmt;

use crate::{ProgressBar, ReporterError, Spinner};

pub const DEFAULT_PROMPT: &str = "Continue?";
pub const DEFAULT_CHOICES: [&str; 2] = ["yes", "no"];
pub const DEFAULT_PROMPT_ANSWER: &str = "yes";
pub const DEFAULT_FAIL_MESSAGE: &str = "failed\n";

/// One value in a detail view row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::Str(s) => f.write_str(s),
            DetailValue::Int(n) => write!(f, "{n}"),
            DetailValue::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
        }
    }
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        DetailValue::Str(value.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        DetailValue::Str(value)
    }
}

impl From<i64> for DetailValue {
    fn from(value: i64) -> Self {
        DetailValue::Int(value)
    }
}

impl From<bool> for DetailValue {
    fn from(value: bool) -> Self {
        DetailValue::Bool(value)
    }
}

/// Optional arguments to [`ReporterRenderer::progress_bar`].
#[derive(Default, Clone, Copy)]
pub struct ProgressBarOptions<'a> {
    /// Shared display produced by [`ReporterRenderer::progress_bar_context_manager`].
    ///
    /// Backends downcast it to their own display handle type.
    pub context_manager: Option<&'a dyn Any>,
    /// Keep the row on screen once it reaches 100%.
    pub visible_when_finished: bool,
}

impl<'a> ProgressBarOptions<'a> {
    pub fn in_display(display: &'a dyn DisplayScope) -> Self {
        Self {
            context_manager: Some(display.handle()),
            visible_when_finished: false,
        }
    }

    pub fn visible_when_finished(mut self, visible: bool) -> Self {
        self.visible_when_finished = visible;
        self
    }
}

/// A live display hosting several progress rows.
///
/// The display is torn down when the scope is dropped.
pub trait DisplayScope {
    /// Handle passed to progress bars as `context_manager`.
    fn handle(&self) -> &dyn Any;
}

/// The set of console primitives one reporter backend provides.
pub trait ReporterRenderer: Send + Sync {
    /// Render `data` as an aligned key/value table.
    fn detail_view(&self, data: &[(&str, DetailValue)]) -> Result<String, ReporterError>;

    /// Render the list of environment names.
    fn envs_list(&self, data: &[&str]) -> Result<String, ReporterError>;

    fn progress_bar(
        &self,
        description: &str,
        options: ProgressBarOptions<'_>,
    ) -> Result<Box<dyn ProgressBar>, ReporterError>;

    fn progress_bar_context_manager(&self) -> Box<dyn DisplayScope>;

    fn spinner(&self, message: &str, fail_message: &str) -> Box<dyn Spinner>;

    /// Ask the user to pick one of `choices`; empty input picks `default`.
    fn prompt(&self, message: &str, choices: &[&str], default: &str)
    -> Result<String, ReporterError>;
}
