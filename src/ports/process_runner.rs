use std::path::PathBuf;

use crate::domain::{ScriptResult, SpawnOptions};

/// One child process to spawn and wait for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub program: String,
    pub args: Vec<String>,
    pub options: SpawnOptions,
    /// Directories placed in front of the inherited `PATH`.
    pub path_prefix: Vec<PathBuf>,
}

impl ProcessRequest {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Port for blocking process execution.
pub trait ProcessRunner: Send + Sync {
    /// Spawn the process, block until it exits and map the outcome.
    ///
    /// Launch failures are reported in the returned result, never as a panic.
    fn run(&self, request: &ProcessRequest) -> ScriptResult;
}
