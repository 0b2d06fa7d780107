use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONDARC_FILENAME: &str = ".condarc";

/// Reporter backend selected when neither `.condarc` nor the environment names one.
pub const DEFAULT_CONSOLE: &str = "rich";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse .condarc: {0}")]
    Parse(String),
    #[error("config validation error: {0}")]
    Validation(String),
}

/// The subset of conda's configuration that console reporting depends on.
///
/// Any other key present in `.condarc` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CondaConfig {
    /// Suppress animated output in favor of plain progress lines.
    #[serde(default)]
    pub quiet: bool,

    /// Name of the reporter backend used for console output.
    #[serde(default = "default_console")]
    pub console: String,
}

impl Default for CondaConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            console: default_console(),
        }
    }
}

fn default_console() -> String {
    DEFAULT_CONSOLE.to_string()
}

/// Parse `.condarc` content.
///
/// An empty document (or one holding only comments) yields the defaults.
pub fn parse(content: &str) -> Result<CondaConfig, ConfigError> {
    let blank = content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    if blank {
        return Ok(CondaConfig::default());
    }
    let config: Option<CondaConfig> =
        serde_yaml_ng::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(config.unwrap_or_default())
}

/// Load a `.condarc` file.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Option<CondaConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let config = parse(&content)?;
    tracing::debug!(path = %path.display(), ?config, "loaded condarc");
    Ok(Some(config))
}

/// Where `.condarc` is looked up: `$CONDARC` if set, otherwise the home directory.
pub fn resolve_path(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    match lookup("CONDARC") {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::home_dir().map(|home| home.join(CONDARC_FILENAME)),
    }
}

/// Apply `CONDA_QUIET` and `CONDA_CONSOLE` on top of file values.
pub fn apply_env(
    config: &mut CondaConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(raw) = lookup("CONDA_QUIET") {
        config.quiet = parse_bool(&raw).ok_or_else(|| {
            ConfigError::Validation(format!("CONDA_QUIET has non-boolean value '{raw}'"))
        })?;
    }
    if let Some(console) = lookup("CONDA_CONSOLE") {
        config.console = console;
    }
    Ok(())
}

/// Resolve the effective configuration for this process.
///
/// An explicit `path` takes precedence over `$CONDARC` and `~/.condarc`.
/// Environment overrides are applied last.
pub fn load_effective(path: Option<&Path>) -> Result<CondaConfig, ConfigError> {
    load_effective_with(path, |name| std::env::var(name).ok())
}

pub fn load_effective_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<CondaConfig, ConfigError> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => resolve_path(&lookup),
    };
    let mut config = match path {
        Some(path) => load(&path)?.unwrap_or_default(),
        None => CondaConfig::default(),
    };
    apply_env(&mut config, &lookup)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &CondaConfig) -> Result<(), ConfigError> {
    if config.console.trim().is_empty() {
        return Err(ConfigError::Validation(
            "console must name a reporter backend".to_string(),
        ));
    }
    Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
