//! Serial and concurrent composition of executables.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::domain::concurrent::{self, CONCURRENT_RUNNER};
use crate::domain::{Executable, ScriptResult, SpawnOptions};
use crate::ports::{ProcessRequest, ProcessRunner};

/// Runs executables through a [`ProcessRunner`].
///
/// Every call blocks until the spawned processes exit.
#[derive(Clone)]
pub struct ExecutionEngine {
    runner: Arc<dyn ProcessRunner>,
    concurrent_runner: String,
    path_prefix: Vec<PathBuf>,
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("concurrent_runner", &self.concurrent_runner)
            .field("path_prefix", &self.path_prefix)
            .finish_non_exhaustive()
    }
}

impl ExecutionEngine {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner, concurrent_runner: CONCURRENT_RUNNER.to_string(), path_prefix: Vec::new() }
    }

    /// Program invoked for concurrent groups.
    pub fn with_concurrent_runner(mut self, program: impl Into<String>) -> Self {
        self.concurrent_runner = program.into();
        self
    }

    /// Directories searched before the inherited `PATH`.
    pub fn with_path_prefix(mut self, dirs: Vec<PathBuf>) -> Self {
        self.path_prefix = dirs;
        self
    }

    pub fn concurrent_runner(&self) -> &str {
        &self.concurrent_runner
    }

    /// Run executables in order, stopping at the first failure.
    ///
    /// Absent entries are skipped. With more than one entry the returned
    /// result carries the earlier successes in `previous_results`; a failing
    /// entry is returned as-is with them attached and later entries never start.
    pub fn run<I, E>(&self, executables: I) -> ScriptResult
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<Executable>>,
    {
        let executables: Vec<Option<Executable>> = executables.into_iter().map(Into::into).collect();

        match executables.as_slice() {
            [] | [None] => ScriptResult::success(),
            [Some(executable)] => self.run_one(executable),
            _ => self.run_serial(executables.iter().flatten()),
        }
    }

    /// Like [`run`](Self::run), but the result never terminates the process by itself.
    pub fn run_without_exit<I, E>(&self, executables: I) -> ScriptResult
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<Executable>>,
    {
        self.run(executables).without_exit()
    }

    fn run_serial<'a>(&self, executables: impl Iterator<Item = &'a Executable>) -> ScriptResult {
        let mut results = Vec::new();
        for executable in executables {
            let mut result = self.run_one(executable);
            if !result.is_success() {
                result.previous_results = Some(results);
                return result;
            }
            results.push(result);
        }
        ScriptResult { previous_results: Some(results), ..ScriptResult::success() }
    }

    fn run_one(&self, executable: &Executable) -> ScriptResult {
        match executable {
            Executable::Command(program) => {
                self.spawn(program.clone(), Vec::new(), SpawnOptions::default())
            }
            Executable::CommandWithOptions(invocation) => self.spawn(
                invocation.program.clone(),
                invocation.args.clone(),
                invocation.options.clone().unwrap_or_default(),
            ),
            Executable::Group(group) => {
                if group.is_empty() {
                    return ScriptResult::success();
                }
                let args = concurrent::runner_args(group);
                self.spawn(self.concurrent_runner.clone(), args, SpawnOptions::default())
            }
        }
    }

    fn spawn(&self, program: String, args: Vec<String>, options: SpawnOptions) -> ScriptResult {
        let request = ProcessRequest { program, args, options, path_prefix: self.path_prefix.clone() };
        debug!(command = %request.command_line(), "executing");
        self.runner.run(&request)
    }
}
