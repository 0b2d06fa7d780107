use std::io::Write;
use std::sync::Arc;

use conda_rich_core::{
    Context, DetailValue, DisplayScope, ProgressBar, ProgressBarOptions, ReporterError,
    ReporterRenderer, Spinner,
};

use crate::output::{Sink, console_width, pretty_list};
use crate::progress::{ProgressDisplay, QuietProgressBar, RichProgressBar};
use crate::spinner::{QuietSpinner, RichSpinner};

/// Console reporting for conda, built on `indicatif` and `dialoguer`.
///
/// Each factory checks `context.quiet()` when called and falls back to
/// plain line output while it is set.
pub struct RichReporterRenderer {
    context: Arc<Context>,
    sink: Sink,
}

impl RichReporterRenderer {
    pub fn new(context: Arc<Context>) -> Self {
        Self::with_sink(context, Sink::stdout())
    }

    /// Renderer writing to `sink` instead of stdout.
    pub fn with_sink(context: Arc<Context>, sink: Sink) -> Self {
        Self { context, sink }
    }

    /// Factory registered with the host's plugin registry.
    pub fn boxed(context: Arc<Context>) -> Box<dyn ReporterRenderer> {
        Box::new(Self::new(context))
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }
}

/// Two-column table with keys right-aligned to the longest one.
pub fn render_detail_view(data: &[(&str, DetailValue)]) -> Result<String, ReporterError> {
    let longest = data
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .ok_or_else(|| {
            ReporterError::InvalidInput("detail view needs at least one field".to_string())
        })?;

    let mut parts = vec![String::new()];
    parts.extend(
        data.iter()
            .map(|(key, value)| format!(" {key:>longest$} : {value}")),
    );
    parts.push("\n".to_string());
    Ok(parts.join("\n"))
}

impl ReporterRenderer for RichReporterRenderer {
    fn detail_view(&self, data: &[(&str, DetailValue)]) -> Result<String, ReporterError> {
        render_detail_view(data)
    }

    fn envs_list(&self, data: &[&str]) -> Result<String, ReporterError> {
        let mut capture = Sink::capture();
        writeln!(capture, "Environments")?;
        writeln!(capture, "{}", pretty_list(data, console_width()))?;
        Ok(capture.take())
    }

    fn progress_bar(
        &self,
        description: &str,
        options: ProgressBarOptions<'_>,
    ) -> Result<Box<dyn ProgressBar>, ReporterError> {
        if self.context.quiet() {
            tracing::debug!(description, "quiet progress bar");
            Ok(Box::new(QuietProgressBar::new(description, &self.sink)))
        } else {
            tracing::debug!(description, "rich progress bar");
            Ok(Box::new(RichProgressBar::new(description, options)?))
        }
    }

    fn progress_bar_context_manager(&self) -> Box<dyn DisplayScope> {
        Box::new(ProgressDisplay::transient(&self.sink))
    }

    fn spinner(&self, message: &str, fail_message: &str) -> Box<dyn Spinner> {
        if self.context.quiet() {
            tracing::debug!(spinner = message, "quiet spinner");
            Box::new(QuietSpinner::new(message, fail_message, &self.sink))
        } else {
            tracing::debug!(spinner = message, "rich spinner");
            Box::new(RichSpinner::new(message, fail_message, &self.sink))
        }
    }

    fn prompt(
        &self,
        message: &str,
        choices: &[&str],
        default: &str,
    ) -> Result<String, ReporterError> {
        crate::prompt::ask(&self.sink, message, choices, default)
    }
}
