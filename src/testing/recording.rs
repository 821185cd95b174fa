use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{AppError, ScriptError, ScriptResult};
use crate::ports::{ChangeStore, Console, ProcessRequest, ProcessRunner};

/// Process runner that records requests instead of spawning anything.
#[derive(Default)]
pub struct RecordingRunner {
    requests: Mutex<Vec<ProcessRequest>>,
    failures: HashMap<String, i32>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request for `program` with `status`.
    pub fn fail_on(mut self, program: impl Into<String>, status: i32) -> Self {
        self.failures.insert(program.into(), status);
        self
    }

    pub fn requests(&self) -> Vec<ProcessRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.program).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, request: &ProcessRequest) -> ScriptResult {
        self.requests.lock().unwrap().push(request.clone());
        match self.failures.get(&request.program) {
            Some(&status) => ScriptResult::failure(status).with_error(ScriptError::message(format!(
                "`{}` exited with status {status}",
                request.command_line()
            ))),
            None => ScriptResult::success(),
        }
    }
}

/// Console that keeps every line for assertions.
#[derive(Default)]
pub struct RecordingConsole {
    errors: Mutex<Vec<String>>,
    reports: Mutex<Vec<String>>,
    printed: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }

    pub fn printed(&self) -> Vec<String> {
        self.printed.lock().unwrap().clone()
    }
}

impl Console for RecordingConsole {
    fn log_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn report_error(&self, error: &ScriptError) {
        self.reports.lock().unwrap().push(error.to_string());
    }

    fn print(&self, text: &str) {
        self.printed.lock().unwrap().push(text.to_string());
    }
}

/// Change store counting saves in a counter shared with the test.
#[derive(Default, Clone)]
pub struct RecordingChangeStore {
    saves: Arc<AtomicUsize>,
}

impl RecordingChangeStore {
    pub fn new(saves: Arc<AtomicUsize>) -> Self {
        Self { saves }
    }
}

impl ChangeStore for RecordingChangeStore {
    fn save(&mut self) -> Result<(), AppError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
