//! CLI dispatch: resolve a script from an argument vector, run it, decide the exit code.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, warn};

use crate::app::Project;
use crate::app::script_kit::run_script_file;
use crate::domain::{AppError, ScriptError, ScriptOutcome};
use crate::ports::{Console, ScriptLoader};

/// What the caller should do once a dispatch finishes.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Terminate the process with this code.
    Exit(i32),
    /// The script ran and exit was suppressed; its results are handed back.
    Completed(ScriptOutcome),
    /// No script was resolved and exit was suppressed.
    Unresolved,
}

impl DispatchOutcome {
    /// Exit code for a process that has to end now, whatever the variant.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchOutcome::Exit(code) => *code,
            DispatchOutcome::Completed(outcome) => i32::from(!outcome.is_success()),
            DispatchOutcome::Unresolved => 1,
        }
    }
}

/// Runs the script named on the command line through a [`ScriptLoader`].
pub struct Dispatcher<L, C>
where
    L: ScriptLoader,
    C: Console,
{
    loader: L,
    console: C,
}

impl<L, C> Dispatcher<L, C>
where
    L: ScriptLoader,
    C: Console,
{
    pub fn new(loader: L, console: C) -> Self {
        Self { loader, console }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Dispatch `argv`, laid out as `<launcher> [script] [args...]`.
    ///
    /// Pending changes are saved on every path that reaches the script,
    /// including an entry point that panics; the panic is resumed afterwards.
    /// An error returned by the entry point is wrapped with the invoked
    /// command line and returned after being logged.
    pub fn dispatch(
        &self,
        project: &mut Project,
        argv: &[String],
        exit_on_finish: bool,
    ) -> Result<DispatchOutcome, AppError> {
        let launcher = argv.first().map(|bin| launcher_name(bin)).unwrap_or_default();
        let script = argv.get(1).map(String::as_str).unwrap_or_default();
        let args = argv.get(2..).unwrap_or_default();
        let command = command_message(&launcher, script, args);

        if script.is_empty() || project.has_script(script).is_none() {
            if !script.is_empty() {
                self.console.log_error(&format!("Script cannot be found: {script}"));
            }
            self.console.print(&usage(&launcher, &project.list_scripts()?));
            return Ok(if exit_on_finish {
                DispatchOutcome::Exit(1)
            } else {
                DispatchOutcome::Unresolved
            });
        }

        debug!(command = %command, "dispatching script");
        let run = panic::catch_unwind(AssertUnwindSafe(|| run_script_file(project, &self.loader, script, args)));
        let outcome = match run {
            Ok(Ok(outcome)) => outcome,
            Err(payload) => {
                if let Err(err) = project.save_changes() {
                    warn!(error = %err, "failed to save changes");
                }
                panic::resume_unwind(payload);
            }
            Ok(Err(source)) => {
                if let Err(err) = project.save_changes() {
                    warn!(error = %err, "failed to save changes");
                }
                let error = AppError::ScriptAborted { command, source };
                self.console.log_error(&error.to_string());
                return Err(error);
            }
        };

        let success = outcome.is_success();
        let mut should_exit = exit_on_finish;
        let mut queued: Vec<&ScriptError> = Vec::new();
        let mut silent_failure = false;

        for result in outcome.results() {
            should_exit = should_exit && result.allows_exit();
            match &result.error {
                Some(error) if error.is_structured() => {
                    self.console.log_error(&error.to_string());
                    queued.push(error);
                }
                Some(error) => self.console.log_error(&error.to_string()),
                None if !result.is_success() => silent_failure = true,
                None => {}
            }
        }

        if silent_failure {
            self.console.log_error(&format!(
                "{script} finished with error (no error message) in command: {command}"
            ));
        }

        project.save_changes()?;
        for error in queued {
            self.console.report_error(error);
        }

        if should_exit {
            return Ok(DispatchOutcome::Exit(if success { 0 } else { 1 }));
        }
        Ok(DispatchOutcome::Completed(outcome))
    }
}

/// Dispatch `argv` and terminate the process when the outcome asks for it.
///
/// Unexpected script errors end the process with status 1.
pub fn execute_from_cli<L, C>(
    dispatcher: &Dispatcher<L, C>,
    project: &mut Project,
    argv: &[String],
    exit_on_finish: bool,
) -> Option<ScriptOutcome>
where
    L: ScriptLoader,
    C: Console,
{
    match settle(dispatcher.dispatch(project, argv, exit_on_finish)) {
        Ok(outcome) => outcome,
        Err(code) => std::process::exit(code),
    }
}

/// Exit code to terminate with, or the results to hand back to the caller.
fn settle(dispatched: Result<DispatchOutcome, AppError>) -> Result<Option<ScriptOutcome>, i32> {
    match dispatched {
        Ok(DispatchOutcome::Exit(code)) => Err(code),
        Ok(DispatchOutcome::Completed(outcome)) => Ok(Some(outcome)),
        Ok(DispatchOutcome::Unresolved) => Ok(None),
        Err(err) => {
            eprintln!("Error: {}", err);
            Err(1)
        }
    }
}

fn launcher_name(bin: &str) -> String {
    Path::new(bin).file_name().map(|name| name.to_string_lossy().to_string()).unwrap_or_default()
}

/// Quoted `launcher script args...` line used in failure messages.
fn command_message(launcher: &str, script: &str, args: &[String]) -> String {
    let invoked = format!("{script} {}", args.join(" "));
    format!("\"{launcher} {}\"", invoked.trim())
}

fn usage(launcher: &str, scripts: &[String]) -> String {
    format!(
        "\nUsage: {launcher} [script] [--flags]\n\n\
         Available Scripts:\n  {}\n\n\
         Options:\n  All options depend on the script and args you pass will be forwarded to the respective tool that's being run under the hood.\n",
        scripts.join("\n  ")
    )
}
