use std::fmt;
use std::sync::Arc;

/// Failure detail attached to a [`ScriptResult`].
#[derive(Debug, Clone)]
pub enum ScriptError {
    /// Typed error, e.g. the I/O error raised when a command cannot be launched.
    Structured(Arc<dyn std::error::Error + Send + Sync + 'static>),
    /// Plain failure message.
    Message(String),
}

impl ScriptError {
    pub fn structured<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ScriptError::Structured(Arc::new(error))
    }

    pub fn message(message: impl Into<String>) -> Self {
        ScriptError::Message(message.into())
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ScriptError::Structured(_))
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Structured(error) => write!(f, "{}", error),
            ScriptError::Message(message) => f.write_str(message),
        }
    }
}

/// Output captured from a piped child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Outcome of running one or more commands.
#[derive(Debug, Clone, Default)]
pub struct ScriptResult {
    /// Exit status, `0` on success.
    pub status: i32,
    pub error: Option<ScriptError>,
    /// Results of commands that completed before this one in a serial run.
    pub previous_results: Option<Vec<ScriptResult>>,
    /// `Some(false)` keeps this result from terminating the process on its own.
    pub exit: Option<bool>,
    pub output: Option<CapturedOutput>,
}

impl ScriptResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failure(status: i32) -> Self {
        Self { status, ..Self::default() }
    }

    pub fn with_error(mut self, error: ScriptError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn without_exit(mut self) -> Self {
        self.exit = Some(false);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Whether this result allows process termination (unset means yes).
    pub fn allows_exit(&self) -> bool {
        self.exit.unwrap_or(true)
    }
}

/// Value returned by a script entry point: one result or an ordered list.
#[derive(Debug, Clone)]
pub enum ScriptOutcome {
    Single(ScriptResult),
    Many(Vec<ScriptResult>),
}

impl ScriptOutcome {
    /// Normalized view: a single result becomes a one-element slice.
    pub fn results(&self) -> &[ScriptResult] {
        match self {
            ScriptOutcome::Single(result) => std::slice::from_ref(result),
            ScriptOutcome::Many(results) => results,
        }
    }

    pub fn is_success(&self) -> bool {
        self.results().iter().all(ScriptResult::is_success)
    }
}

impl From<ScriptResult> for ScriptOutcome {
    fn from(result: ScriptResult) -> Self {
        ScriptOutcome::Single(result)
    }
}

impl From<Vec<ScriptResult>> for ScriptOutcome {
    fn from(results: Vec<ScriptResult>) -> Self {
        ScriptOutcome::Many(results)
    }
}
