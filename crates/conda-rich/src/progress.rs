use std::any::Any;
use std::time::Duration;

use conda_rich_core::{DisplayScope, ProgressBar, ProgressBarOptions, ReporterError};
use indicatif::{MultiProgress, ProgressDrawTarget, ProgressStyle};

use crate::output::Sink;

pub const MISSING_DISPLAY: &str = "Rich is configured, but there is no progress bar available";

/// Bar positions per unit of work. A task's total is one unit.
pub const TASK_RESOLUTION: u64 = 1000;

const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Live display that several progress rows share.
///
/// Cloning yields another handle to the same display.
#[derive(Clone)]
pub struct DisplayHandle {
    multi: MultiProgress,
    hidden: bool,
}

impl DisplayHandle {
    pub fn new(target: ProgressDrawTarget) -> Self {
        let hidden = target.is_hidden();
        Self {
            multi: MultiProgress::with_draw_target(target),
            hidden,
        }
    }

    /// A display that tracks rows without drawing anything.
    pub fn hidden() -> Self {
        Self::new(ProgressDrawTarget::hidden())
    }

    fn add_row(&self, description: &str) -> indicatif::ProgressBar {
        let row = self.multi.add(indicatif::ProgressBar::new(TASK_RESOLUTION));
        row.set_style(bar_style());
        row.set_message(description.to_string());
        if !self.hidden {
            row.enable_steady_tick(REFRESH_INTERVAL);
        }
        row
    }
}

/// Transient display scope handed out by the renderer.
///
/// Rows drawn while the scope lives are erased when it is dropped.
pub struct ProgressDisplay {
    display: DisplayHandle,
}

impl ProgressDisplay {
    pub fn transient(sink: &Sink) -> Self {
        Self {
            display: DisplayHandle::new(sink.draw_target()),
        }
    }
}

impl DisplayScope for ProgressDisplay {
    fn handle(&self) -> &dyn Any {
        &self.display
    }
}

impl Drop for ProgressDisplay {
    fn drop(&mut self) {
        if let Err(e) = self.display.multi.clear() {
            tracing::warn!(error = %e, "failed to clear progress display");
        }
        tracing::debug!("progress display closed");
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} {bar:40.magenta/black} {percent:>3}% {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸━")
}

/// Observable state of one progress row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskState {
    pub completed: f64,
    pub visible: bool,
    pub active: bool,
}

/// Progress row drawn inside a shared [`DisplayHandle`].
pub struct RichProgressBar {
    description: String,
    row: indicatif::ProgressBar,
    visible_when_finished: bool,
    state: TaskState,
}

impl RichProgressBar {
    /// Attach a new row to the display passed as `options.context_manager`.
    ///
    /// Fails with a configuration error if no [`DisplayHandle`] was passed.
    pub fn new(
        description: &str,
        options: ProgressBarOptions<'_>,
    ) -> Result<Self, ReporterError> {
        let display = options
            .context_manager
            .and_then(|handle| handle.downcast_ref::<DisplayHandle>())
            .ok_or_else(|| ReporterError::Configuration(MISSING_DISPLAY.to_string()))?;

        tracing::debug!(description, "progress row added");
        Ok(Self {
            description: description.to_string(),
            row: display.add_row(description),
            visible_when_finished: options.visible_when_finished,
            state: TaskState {
                completed: 0.0,
                visible: true,
                active: true,
            },
        })
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    fn stop(&mut self) {
        if !self.state.active {
            return;
        }
        self.state.active = false;
        if !self.row.is_finished() {
            self.row.abandon();
        }
        tracing::debug!(description = %self.description, "progress row stopped");
    }
}

impl ProgressBar for RichProgressBar {
    fn description(&self) -> &str {
        &self.description
    }

    fn update_to(&mut self, fraction: f64) {
        if !self.state.active {
            return;
        }
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.state.completed = fraction;
        self.row
            .set_position((fraction * TASK_RESOLUTION as f64).round() as u64);

        if fraction >= 1.0 {
            self.state.visible = self.visible_when_finished;
            if self.visible_when_finished {
                self.row.finish();
            } else {
                self.row.finish_and_clear();
            }
        }
    }

    fn refresh(&mut self) {
        if self.state.active {
            self.row.force_draw();
        }
    }

    fn close(mut self: Box<Self>) {
        self.stop();
    }
}

impl Drop for RichProgressBar {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Progress bar for quiet mode: one line up front, nothing afterwards.
pub struct QuietProgressBar {
    description: String,
}

impl QuietProgressBar {
    pub fn new(description: &str, sink: &Sink) -> Self {
        sink.emit(&format!("...downloading {description}...\n"));
        Self {
            description: description.to_string(),
        }
    }
}

impl ProgressBar for QuietProgressBar {
    fn description(&self) -> &str {
        &self.description
    }

    fn update_to(&mut self, _fraction: f64) {}

    fn refresh(&mut self) {}

    fn close(self: Box<Self>) {}
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use indicatif::TermLike;

    use super::*;

    /// Terminal that only counts how often something is written to it.
    #[derive(Debug, Clone, Default)]
    struct CountingTerm {
        writes: Arc<AtomicUsize>,
    }

    impl CountingTerm {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl TermLike for CountingTerm {
        fn width(&self) -> u16 {
            80
        }

        fn move_cursor_up(&self, _n: usize) -> io::Result<()> {
            Ok(())
        }

        fn move_cursor_down(&self, _n: usize) -> io::Result<()> {
            Ok(())
        }

        fn move_cursor_right(&self, _n: usize) -> io::Result<()> {
            Ok(())
        }

        fn move_cursor_left(&self, _n: usize) -> io::Result<()> {
            Ok(())
        }

        fn write_line(&self, _s: &str) -> io::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn write_str(&self, _s: &str) -> io::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn clear_line(&self) -> io::Result<()> {
            Ok(())
        }

        fn flush(&self) -> io::Result<()> {
            Ok(())
        }
    }

    fn options(display: &DisplayHandle, visible_when_finished: bool) -> ProgressBarOptions<'_> {
        ProgressBarOptions {
            context_manager: Some(display),
            visible_when_finished,
        }
    }

    #[test]
    fn missing_display_is_a_configuration_error() {
        let err = RichProgressBar::new("Test", ProgressBarOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, ReporterError::Configuration(_)));
        assert_eq!(err.to_string(), MISSING_DISPLAY);
    }

    #[test]
    fn foreign_display_is_rejected() {
        let not_a_display = String::from("progress");
        let options = ProgressBarOptions {
            context_manager: Some(&not_a_display),
            visible_when_finished: false,
        };
        let err = RichProgressBar::new("Test", options).err().unwrap();
        assert_eq!(err.to_string(), MISSING_DISPLAY);
    }

    #[test]
    fn hidden_when_finished_by_default() {
        let display = DisplayHandle::hidden();
        let mut bar = RichProgressBar::new("Test", options(&display, false)).unwrap();
        for step in 1..=4 {
            bar.update_to(f64::from(step) / 4.0);
            bar.refresh();
        }
        let state = bar.state();
        assert_eq!(state.completed, 1.0);
        assert!(!state.visible);
        assert!(state.active);
    }

    #[test]
    fn visible_when_finished_keeps_row() {
        let display = DisplayHandle::hidden();
        let mut bar = RichProgressBar::new("Test", options(&display, true)).unwrap();
        bar.update_to(0.5);
        assert!(bar.state().visible);
        bar.update_to(1.0);
        assert!(bar.state().visible);
    }

    #[test]
    fn fractions_are_clamped() {
        let display = DisplayHandle::hidden();
        let mut bar = RichProgressBar::new("Test", options(&display, false)).unwrap();
        bar.update_to(-0.5);
        assert_eq!(bar.state().completed, 0.0);
        bar.update_to(1.25);
        assert_eq!(bar.state().completed, 1.0);
        assert!(!bar.state().visible);
    }

    #[test]
    fn refresh_redraws_a_ticking_display() {
        let term = CountingTerm::default();
        let display = DisplayHandle::new(ProgressDrawTarget::term_like(Box::new(term.clone())));
        let mut bar = RichProgressBar::new("Test", options(&display, false)).unwrap();
        bar.update_to(0.5);

        for _ in 0..5 {
            let before = term.writes();
            bar.refresh();
            assert!(term.writes() > before);
        }
    }

    #[test]
    fn stop_deactivates_only_this_row() {
        let display = DisplayHandle::hidden();
        let mut first = RichProgressBar::new("first", options(&display, false)).unwrap();
        let mut second = RichProgressBar::new("second", options(&display, false)).unwrap();

        first.update_to(0.3);
        first.stop();
        first.update_to(0.9);
        assert!(!first.state().active);
        assert_eq!(first.state().completed, 0.3);

        second.update_to(0.6);
        assert!(second.state().active);
        assert_eq!(second.state().completed, 0.6);
    }

    #[test]
    fn transient_display_exposes_its_handle() {
        let sink = Sink::capture();
        let scope = ProgressDisplay::transient(&sink);
        let handle = scope.handle();
        assert!(handle.downcast_ref::<DisplayHandle>().is_some());
        drop(scope);
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn quiet_bar_prints_one_line() {
        let sink = Sink::capture();
        let mut bar = QuietProgressBar::new("X", &sink);
        bar.update_to(0.5);
        bar.refresh();
        Box::new(bar).close();
        assert_eq!(sink.contents(), "...downloading X...\n");
    }
}
