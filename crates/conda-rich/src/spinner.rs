use std::time::Duration;

use conda_rich_core::{ScopeExit, Spinner};
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::Sink;

const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Frames of the "aesthetic" spinner. The last frame is shown once finished.
const AESTHETIC_FRAMES: [&str; 8] = [
    "▰▱▱▱▱▱▱",
    "▰▰▱▱▱▱▱",
    "▰▰▰▱▱▱▱",
    "▰▰▰▰▱▱▱",
    "▰▰▰▰▰▱▱",
    "▰▰▰▰▰▰▱",
    "▰▰▰▰▰▰▰",
    "▰▱▱▱▱▱▱",
];

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} {spinner:.green}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&AESTHETIC_FRAMES)
}

/// Animated single-row spinner on a transient live display.
///
/// Exiting always reports `"{message} (done)"`, whatever the outcome.
pub struct RichSpinner {
    message: String,
    fail_message: String,
    sink: Sink,
    live: Option<ProgressBar>,
}

impl RichSpinner {
    pub fn new(message: &str, fail_message: &str, sink: &Sink) -> Self {
        Self {
            message: message.to_string(),
            fail_message: fail_message.to_string(),
            sink: sink.clone(),
            live: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }
}

impl Spinner for RichSpinner {
    fn message(&self) -> &str {
        &self.message
    }

    fn fail_message(&self) -> &str {
        &self.fail_message
    }

    fn enter(&mut self) {
        let live = ProgressBar::with_draw_target(None, self.sink.draw_target());
        live.set_style(spinner_style());
        live.set_message(self.message.clone());
        if !self.sink.is_capture() {
            live.enable_steady_tick(TICK_INTERVAL);
        }
        self.live = Some(live);
    }

    fn exit(&mut self, outcome: ScopeExit) {
        let Some(live) = self.live.take() else {
            return;
        };
        tracing::debug!(spinner = %self.message, ?outcome, "spinner finished");
        live.finish_and_clear();
        self.sink.emit(&format!("{} (done)\n", self.message));
    }
}

impl Drop for RichSpinner {
    fn drop(&mut self) {
        if let Some(live) = self.live.take() {
            live.finish_and_clear();
        }
    }
}

/// Spinner for quiet mode: prints a status line and its outcome.
pub struct QuietSpinner {
    message: String,
    fail_message: String,
    sink: Sink,
}

impl QuietSpinner {
    pub fn new(message: &str, fail_message: &str, sink: &Sink) -> Self {
        Self {
            message: message.to_string(),
            fail_message: fail_message.to_string(),
            sink: sink.clone(),
        }
    }
}

impl Spinner for QuietSpinner {
    fn message(&self) -> &str {
        &self.message
    }

    fn fail_message(&self) -> &str {
        &self.fail_message
    }

    fn enter(&mut self) {
        self.sink.emit(&format!("{}: ", self.message));
        self.sink.emit("...working... ");
    }

    fn exit(&mut self, outcome: ScopeExit) {
        match outcome {
            ScopeExit::Completed => self.sink.emit("done\n"),
            ScopeExit::Failed => self.sink.emit(&format!("{}\n", self.fail_message)),
        }
    }
}
