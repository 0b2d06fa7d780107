//! Rich reporter backend for conda.
//!
//! Registers a reporter named `rich` whose renderer draws live progress bars
//! and spinners with `indicatif`, prompts with `dialoguer`, and falls back to
//! plain line output while the host runs in quiet mode.

pub mod output;
pub mod progress;
pub mod prompt;
pub mod renderer;
pub mod spinner;
pub mod theme;

use conda_rich_core::ReporterBackend;

pub use output::Sink;
pub use progress::{DisplayHandle, ProgressDisplay, QuietProgressBar, RichProgressBar, TaskState};
pub use renderer::RichReporterRenderer;
pub use spinner::{QuietSpinner, RichSpinner};

pub const BACKEND_NAME: &str = "rich";
pub const BACKEND_DESCRIPTION: &str = "Rich implementation for console reporting in conda";

/// Reporter backends provided by this plugin.
pub fn conda_reporter_backends() -> impl Iterator<Item = ReporterBackend> {
    std::iter::once(ReporterBackend {
        name: BACKEND_NAME,
        description: BACKEND_DESCRIPTION,
        renderer: RichReporterRenderer::boxed,
    })
}
