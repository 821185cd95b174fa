//! CLI Adapter.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::adapters::{InterpreterLoader, TerminalConsole};
use crate::app::dispatch::{Dispatcher, execute_from_cli};
use crate::app::{Project, ProjectOptions};
use crate::domain::AppError;

const DEFAULT_LAUNCHER: &str = "scriptkit";

#[derive(Parser)]
#[command(name = "scriptkit")]
#[command(version)]
#[command(
    about = "Run a host project's scripts from a separately installed scripts module",
    long_about = None
)]
struct Cli {
    /// Any path inside the scripts module (defaults to the module holding this binary)
    #[arg(long, env = "SCRIPTKIT_MODULE_ROOT")]
    module_root: Option<PathBuf>,
    /// Directory holding `scripts/` and `config/` (defaults to the module root)
    #[arg(long, env = "SCRIPTKIT_FILES_DIR")]
    files_dir: Option<PathBuf>,
    /// Locate the host project from this directory instead of the module position
    #[arg(long)]
    cwd: Option<PathBuf>,
    /// Enable debug mode and debug logging
    #[arg(long)]
    debug: bool,
    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: Level,
    /// Return instead of exiting when the script finishes
    #[arg(long)]
    no_exit: bool,
    /// Script to run followed by the arguments forwarded to it, verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "SCRIPT [ARGS]")]
    command: Vec<String>,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    init_tracing(log_filter(rust_log.as_deref(), cli.log_level, cli.debug));

    if let Err(e) = run_script(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(filter: EnvFilter) {
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();
}

/// `RUST_LOG` when set, `--log-level` otherwise; `--debug` wins over both.
fn log_filter(rust_log: Option<&str>, level: Level, debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::default().add_directive(Level::DEBUG.into());
    }
    match rust_log.filter(|directives| !directives.trim().is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::default().add_directive(level.into()),
    }
}

fn run_script(cli: Cli) -> Result<(), AppError> {
    let mut options = ProjectOptions::new().debug(cli.debug);
    if let Some(module_root) = cli.module_root {
        options = options.module_root(module_root);
    }
    if let Some(files_dir) = cli.files_dir {
        options = options.files_dir(files_dir);
    }
    if let Some(cwd) = cli.cwd {
        options = options.cwd(cwd);
    }
    let mut project = Project::new(options)?;

    let launcher = std::env::args().next().unwrap_or_else(|| DEFAULT_LAUNCHER.to_string());
    let argv: Vec<String> = std::iter::once(launcher).chain(cli.command).collect();

    let dispatcher = Dispatcher::new(InterpreterLoader::default(), TerminalConsole);
    if let Some(outcome) = execute_from_cli(&dispatcher, &mut project, &argv, !cli.no_exit) {
        let statuses: Vec<i32> = outcome.results().iter().map(|result| result.status).collect();
        tracing::debug!(?statuses, "script finished without exit");
    }
    Ok(())
}
