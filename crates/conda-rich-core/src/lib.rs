pub mod context;
pub mod plugin;
pub mod progress;
pub mod renderer;

pub use context::Context;
pub use plugin::{RendererFactory, ReporterBackend};
pub use progress::{ProgressBar, ScopeExit, Spinner, SpinnerScope, with_spinner};
pub use renderer::{DetailValue, DisplayScope, ProgressBarOptions, ReporterRenderer};

#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    /// The backend was selected but cannot work in its current setup.
    #[error("{0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("prompt failed: {0}")]
    Prompt(String),
    #[error(transparent)]
    Config(#[from] conda_rich_config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
