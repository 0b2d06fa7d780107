use std::sync::atomic::{AtomicBool, Ordering};

use conda_rich_config::CondaConfig;

/// Host state shared with every renderer of a session.
///
/// `quiet` may be flipped by the host at any time; renderers read it on
/// every dispatch instead of caching it.
#[derive(Debug, Default)]
pub struct Context {
    quiet: AtomicBool,
    console: String,
}

impl Context {
    pub fn new(quiet: bool, console: impl Into<String>) -> Self {
        Self {
            quiet: AtomicBool::new(quiet),
            console: console.into(),
        }
    }

    pub fn from_config(config: &CondaConfig) -> Self {
        Self::new(config.quiet, config.console.clone())
    }

    pub fn quiet(&self) -> bool {
        self.quiet.load(Ordering::Relaxed)
    }

    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    /// Name of the reporter backend the host was configured with.
    pub fn console(&self) -> &str {
        &self.console
    }
}
