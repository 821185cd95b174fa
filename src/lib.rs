//! scriptkit: run a host project's build, test and lint scripts from a separately installed scripts module.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use adapters::{CommandProcessRunner, InterpreterLoader, ScriptCatalog, ScriptRegistry, TerminalConsole};
pub use app::env::{env_is_set, parse_env};
pub use app::{
    DispatchOutcome, Dispatcher, ExecutionEngine, Project, ProjectOptions, ScriptKit, execute_from_cli,
    replace_argument_name, run_script_file,
};
pub use domain::{
    AppError, CommandGroup, Executable, Invocation, ScriptError, ScriptFailure, ScriptOutcome, ScriptResult,
    SpawnOptions, StdioMode,
};
pub use ports::{ChangeStore, Console, ProcessRunner, Script, ScriptLoader};
