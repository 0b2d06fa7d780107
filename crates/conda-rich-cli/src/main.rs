mod style;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use clap::Parser;
use conda_rich_core::renderer::{DEFAULT_FAIL_MESSAGE, DEFAULT_PROMPT, DEFAULT_PROMPT_ANSWER};
use conda_rich_core::{
    Context, DetailValue, ProgressBarOptions, ReporterBackend, ReporterError, with_spinner,
};

#[derive(Parser)]
#[command(name = "conda-rich", version)]
struct Cli {
    /// Print plain progress lines instead of live displays
    #[arg(long, global = true)]
    quiet: bool,

    /// Read configuration from this file instead of $CONDARC or ~/.condarc
    #[arg(long, global = true)]
    condarc: Option<PathBuf>,

    /// Reporter backend to render with
    #[arg(long, global = true)]
    console: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List the reporter backends this build provides
    Backends,

    /// Show KEY=VALUE pairs as an aligned table
    Detail {
        #[arg(required = true, value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// List environment names
    Envs { names: Vec<String> },

    /// Show a progress bar per package while simulating downloads
    Download {
        #[arg(required = true)]
        packages: Vec<String>,

        /// Number of progress updates per package
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        steps: u32,

        /// Pause between updates, in milliseconds
        #[arg(long, default_value_t = 50)]
        delay_ms: u64,

        /// Keep finished bars on screen
        #[arg(long)]
        keep: bool,
    },

    /// Show a spinner while simulating a task
    Spin {
        message: String,

        /// Make the task fail
        #[arg(long)]
        fail: bool,

        #[arg(long, default_value = DEFAULT_FAIL_MESSAGE)]
        fail_message: String,

        /// How long the task runs, in milliseconds
        #[arg(long, default_value_t = 300)]
        millis: u64,
    },

    /// Ask a question with a fixed set of answers
    Prompt {
        #[arg(long, default_value = DEFAULT_PROMPT)]
        message: String,

        #[arg(long, value_delimiter = ',', default_values = ["yes", "no"])]
        choices: Vec<String>,

        #[arg(long, default_value = DEFAULT_PROMPT_ANSWER)]
        default: String,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Reporter(#[from] ReporterError),
    #[error("unknown reporter backend '{0}'")]
    UnknownBackend(String),
    #[error("simulated task failed")]
    SimulatedFailure,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style::error_prefix());
            ExitCode::from(exit_code(&e))
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn exit_code(err: &CliError) -> u8 {
    match err {
        CliError::Reporter(ReporterError::Config(_) | ReporterError::Configuration(_)) => 3,
        CliError::UnknownBackend(_) => 3,
        CliError::Reporter(ReporterError::Prompt(_)) => 4,
        CliError::Reporter(ReporterError::InvalidInput(_) | ReporterError::Io(_)) => 1,
        CliError::SimulatedFailure => 1,
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        quiet,
        condarc,
        console,
        command,
    } = cli;

    let mut config =
        conda_rich_config::load_effective(condarc.as_deref()).map_err(ReporterError::from)?;
    if quiet {
        config.quiet = true;
    }
    if let Some(console) = console {
        config.console = console;
    }

    if let Commands::Backends = command {
        for backend in conda_rich::conda_reporter_backends() {
            println!(
                "{}  {}",
                style::backend_name(backend.name),
                backend.description
            );
        }
        return Ok(());
    }

    let context = Arc::new(Context::from_config(&config));
    let backend = find_backend(context.console())?;
    let renderer = backend.instantiate(context);

    match command {
        Commands::Backends => {}
        Commands::Detail { fields } => {
            let data: Vec<(&str, DetailValue)> = fields
                .iter()
                .map(|(key, value)| (key.as_str(), detail_value(value)))
                .collect();
            print!("{}", renderer.detail_view(&data)?);
        }
        Commands::Envs { names } => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            print!("{}", renderer.envs_list(&names)?);
        }
        Commands::Download {
            packages,
            steps,
            delay_ms,
            keep,
        } => {
            let display = renderer.progress_bar_context_manager();
            let mut bars = Vec::with_capacity(packages.len());
            for package in &packages {
                let options = ProgressBarOptions::in_display(&*display).visible_when_finished(keep);
                bars.push(renderer.progress_bar(package, options)?);
            }

            for step in 1..=steps {
                for bar in &mut bars {
                    bar.update_to(f64::from(step) / f64::from(steps));
                    bar.refresh();
                }
                sleep(Duration::from_millis(delay_ms));
            }

            for bar in bars {
                bar.close();
            }
        }
        Commands::Spin {
            message,
            fail,
            fail_message,
            millis,
        } => {
            let mut spinner = renderer.spinner(&message, &fail_message);
            with_spinner(&mut *spinner, || {
                sleep(Duration::from_millis(millis));
                if fail {
                    Err(CliError::SimulatedFailure)
                } else {
                    Ok(())
                }
            })?;
        }
        Commands::Prompt {
            message,
            choices,
            default,
        } => {
            let choices: Vec<&str> = choices.iter().map(String::as_str).collect();
            let answer = renderer.prompt(&message, &choices, &default)?;
            println!("{answer}");
        }
    }

    Ok(())
}

fn find_backend(name: &str) -> Result<ReporterBackend, CliError> {
    let backend = conda_rich::conda_reporter_backends()
        .find(|backend| backend.name == name)
        .ok_or_else(|| CliError::UnknownBackend(name.to_string()))?;
    tracing::debug!(backend = backend.name, "reporter backend selected");
    Ok(backend)
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// Booleans and integers keep their type; anything else is text.
fn detail_value(raw: &str) -> DetailValue {
    match raw {
        "true" | "True" => DetailValue::Bool(true),
        "false" | "False" => DetailValue::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(DetailValue::Int)
            .unwrap_or_else(|_| DetailValue::Str(raw.to_string())),
    }
}
