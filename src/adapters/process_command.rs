use std::env;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::domain::{CapturedOutput, ScriptError, ScriptResult, StdioMode};
use crate::ports::{ProcessRequest, ProcessRunner};

/// Status reported when a command cannot be launched at all.
const LAUNCH_FAILURE_STATUS: i32 = 1;

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct CommandProcessRunner;

impl CommandProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn build(&self, request: &ProcessRequest) -> Command {
        let mut command = Command::new(&request.program);
        command.args(&request.args);

        if let Some(cwd) = &request.options.cwd {
            command.current_dir(cwd);
        }
        if let Some(path) = prefixed_path(&request.path_prefix) {
            command.env("PATH", path);
        }
        command.envs(&request.options.env);

        let (stdout, stderr) = match request.options.stdio {
            StdioMode::Inherit => (Stdio::inherit(), Stdio::inherit()),
            StdioMode::Pipe => (Stdio::piped(), Stdio::piped()),
            StdioMode::Ignore => (Stdio::null(), Stdio::null()),
        };
        command.stdout(stdout).stderr(stderr);
        if request.options.stdio == StdioMode::Ignore {
            command.stdin(Stdio::null());
        }
        command
    }
}

impl ProcessRunner for CommandProcessRunner {
    fn run(&self, request: &ProcessRequest) -> ScriptResult {
        let command_line = request.command_line();
        debug!(command = %command_line, "spawning");

        let mut command = self.build(request);
        let outcome = match request.options.stdio {
            StdioMode::Pipe => command.output().map(|output| {
                let encoding = request.options.encoding.unwrap_or_default();
                let captured = CapturedOutput {
                    stdout: encoding.decode(&output.stdout),
                    stderr: encoding.decode(&output.stderr),
                };
                (output.status, Some(captured))
            }),
            StdioMode::Inherit | StdioMode::Ignore => command.status().map(|status| (status, None)),
        };

        match outcome {
            Ok((status, output)) => {
                let mut result = map_status(&command_line, status);
                result.output = output;
                result
            }
            Err(err) => {
                debug!(command = %command_line, error = %err, "launch failed");
                ScriptResult::failure(LAUNCH_FAILURE_STATUS).with_error(ScriptError::structured(err))
            }
        }
    }
}

fn map_status(command_line: &str, status: ExitStatus) -> ScriptResult {
    if let Some(code) = status.code() {
        if code == 0 {
            return ScriptResult::success();
        }
        return ScriptResult::failure(code)
            .with_error(ScriptError::message(format!("`{command_line}` exited with status {code}")));
    }
    let signal = termination_signal(status);
    ScriptResult::failure(128 + signal.unwrap_or(0)).with_error(ScriptError::message(match signal {
        Some(signal) => format!("`{command_line}` was terminated by signal {signal}"),
        None => format!("`{command_line}` terminated abnormally"),
    }))
}

#[cfg(unix)]
fn termination_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: ExitStatus) -> Option<i32> {
    None
}

fn prefixed_path(prefix: &[PathBuf]) -> Option<OsString> {
    if prefix.is_empty() {
        return None;
    }
    let inherited = env::var_os("PATH").unwrap_or_default();
    let dirs = prefix.iter().cloned().chain(env::split_paths(&inherited));
    env::join_paths(dirs).ok()
}

/// First regular file named `program` in the directories of the inherited `PATH`.
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    find_in_dirs(program, &env::var_os("PATH")?)
}

fn find_in_dirs(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path).map(|dir| dir.join(program)).find(|candidate| candidate.is_file())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::{SpawnOptions, TextEncoding};

    fn request(program: &str, args: &[&str], options: SpawnOptions) -> ProcessRequest {
        ProcessRequest {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            options,
            path_prefix: Vec::new(),
        }
    }

    #[test]
    fn successful_command_has_no_error() {
        let result = CommandProcessRunner::new().run(&request("true", &[], SpawnOptions::default()));
        assert_eq!(result.status, 0);
        assert!(result.error.is_none());
    }

    #[test]
    fn non_zero_exit_populates_message() {
        let result = CommandProcessRunner::new()
            .run(&request("sh", &["-c", "exit 3"], SpawnOptions::default()));
        assert_eq!(result.status, 3);
        assert!(matches!(result.error, Some(ScriptError::Message(ref m)) if m.contains("status 3")));
    }

    #[test]
    fn missing_program_is_structured_launch_failure() {
        let result = CommandProcessRunner::new()
            .run(&request("scriptkit-definitely-missing-bin", &[], SpawnOptions::default()));
        assert_eq!(result.status, LAUNCH_FAILURE_STATUS);
        assert!(result.error.as_ref().is_some_and(ScriptError::is_structured));
    }

    #[test]
    fn piped_output_is_captured_and_decoded() {
        let options = SpawnOptions::piped().with_encoding(TextEncoding::Utf8).with_env("GREETING", "hi");
        let result =
            CommandProcessRunner::new().run(&request("sh", &["-c", "echo $GREETING; echo err >&2"], options));

        let output = result.output.expect("piped output should be captured");
        assert_eq!(output.stdout.trim(), "hi");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[test]
    fn path_prefix_is_searched_first() {
        let dir = tempfile::TempDir::new().unwrap();
        let prefix = prefixed_path(&[dir.path().to_path_buf()]).unwrap();
        let first = env::split_paths(&prefix).next().unwrap();
        assert_eq!(first, dir.path());
    }

    #[test]
    fn lookup_takes_the_first_directory_holding_the_program() {
        let empty = tempfile::TempDir::new().unwrap();
        let first = tempfile::TempDir::new().unwrap();
        let second = tempfile::TempDir::new().unwrap();
        std::fs::write(first.path().join("tsc"), "").unwrap();
        std::fs::write(second.path().join("tsc"), "").unwrap();
        std::fs::create_dir(empty.path().join("eslint")).unwrap();

        let search = env::join_paths([empty.path(), first.path(), second.path()]).unwrap();
        assert_eq!(find_in_dirs("tsc", &search), Some(first.path().join("tsc")));
        assert_eq!(find_in_dirs("eslint", &search), None);
    }
}
