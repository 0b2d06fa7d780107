/// Handle for one download-style progress row.
///
/// Renderers hand these out; callers update them and close them exactly once.
/// `close` consumes the handle, so a closed bar cannot be touched again.
pub trait ProgressBar: Send {
    fn description(&self) -> &str;

    /// Set completion to `fraction` of the total, in `[0, 1]`.
    fn update_to(&mut self, fraction: f64);

    fn refresh(&mut self);

    fn close(self: Box<Self>);
}

/// How a spinner's scope ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeExit {
    Completed,
    Failed,
}

/// Indicator shown while an operation of unknown length runs.
///
/// `enter` and `exit` bracket the operation. Prefer [`SpinnerScope`] or
/// [`with_spinner`] over calling them by hand.
pub trait Spinner: Send {
    fn message(&self) -> &str;
    fn fail_message(&self) -> &str;
    fn enter(&mut self);
    fn exit(&mut self, outcome: ScopeExit);
}

/// Scope guard around a running spinner.
///
/// Dropping the guard without calling [`complete`](Self::complete) exits the
/// spinner as failed. That covers early returns through `?` and unwinding.
pub struct SpinnerScope<'a> {
    spinner: &'a mut dyn Spinner,
    exited: bool,
}

impl<'a> SpinnerScope<'a> {
    pub fn enter(spinner: &'a mut dyn Spinner) -> Self {
        tracing::debug!(spinner = spinner.message(), "spinner scope entered");
        spinner.enter();
        Self {
            spinner,
            exited: false,
        }
    }

    pub fn complete(mut self) {
        self.exit(ScopeExit::Completed);
    }

    pub fn fail(mut self) {
        self.exit(ScopeExit::Failed);
    }

    fn exit(&mut self, outcome: ScopeExit) {
        if self.exited {
            return;
        }
        self.exited = true;
        tracing::debug!(spinner = self.spinner.message(), ?outcome, "spinner scope exited");
        self.spinner.exit(outcome);
    }
}

impl Drop for SpinnerScope<'_> {
    fn drop(&mut self) {
        self.exit(ScopeExit::Failed);
    }
}

/// Run `op` while `spinner` is shown, returning its result untouched.
pub fn with_spinner<T, E>(
    spinner: &mut dyn Spinner,
    op: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let scope = SpinnerScope::enter(spinner);
    let result = op();
    match &result {
        Ok(_) => scope.complete(),
        Err(_) => scope.fail(),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        events: Vec<String>,
    }

    impl Spinner for Recording {
        fn message(&self) -> &str {
            "recording"
        }

        fn fail_message(&self) -> &str {
            "failed\n"
        }

        fn enter(&mut self) {
            self.events.push("enter".to_string());
        }

        fn exit(&mut self, outcome: ScopeExit) {
            self.events.push(format!("exit {outcome:?}"));
        }
    }

    #[test]
    fn with_spinner_ok() {
        let mut spinner = Recording::default();
        let value: Result<u32, String> = with_spinner(&mut spinner, || Ok(7));
        assert_eq!(value, Ok(7));
        assert_eq!(spinner.events, ["enter", "exit Completed"]);
    }

    #[test]
    fn with_spinner_returns_error_unchanged() {
        let mut spinner = Recording::default();
        let value: Result<(), String> = with_spinner(&mut spinner, || Err("boom".to_string()));
        assert_eq!(value, Err("boom".to_string()));
        assert_eq!(spinner.events, ["enter", "exit Failed"]);
    }

    #[test]
    fn dropped_scope_reports_failure() {
        let mut spinner = Recording::default();
        {
            let _scope = SpinnerScope::enter(&mut spinner);
        }
        assert_eq!(spinner.events, ["enter", "exit Failed"]);
    }

    #[test]
    fn scope_exits_once() {
        let mut spinner = Recording::default();
        SpinnerScope::enter(&mut spinner).complete();
        assert_eq!(spinner.events, ["enter", "exit Completed"]);
    }

    #[test]
    fn panic_inside_scope_reports_failure() {
        let mut spinner = Recording::default();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = SpinnerScope::enter(&mut spinner);
            panic!("operation blew up");
        }));
        assert!(outcome.is_err());
        assert_eq!(spinner.events, ["enter", "exit Failed"]);
    }
}
