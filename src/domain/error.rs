use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by a script entry point.
pub type ScriptFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Library-wide error type for scriptkit operations.
///
/// Failing child processes are never reported through this type; they are
/// data carried by [`crate::domain::ScriptResult`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Project or module root could not be determined.
    #[error("{0}")]
    Boundary(String),

    /// A manifest file exists but cannot be read as a package manifest.
    #[error("Invalid manifest {}: {details}", path.display())]
    Manifest { path: PathBuf, details: String },

    /// No script with the given name exists in the scripts directory.
    #[error("Script \"{name}\" cannot be found in \"{}\"", dir.display())]
    ScriptNotFound { name: String, dir: PathBuf },

    /// The resolved script does not provide a usable entry point.
    #[error("Script file {} does not provide a script entry point: {reason}", path.display())]
    ScriptContract { path: PathBuf, reason: String },

    /// A script entry point failed; wraps the cause with the invoked command line.
    #[error("Cannot finish execution of {command}")]
    ScriptAborted {
        command: String,
        #[source]
        source: ScriptFailure,
    },

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn boundary<S: Into<String>>(message: S) -> Self {
        AppError::Boundary(message.into())
    }

    /// Provide an `io::ErrorKind`-like view for callers that branch on it.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::Manifest { .. }
            | AppError::ScriptContract { .. }
            | AppError::JsonParseError(_)
            | AppError::TomlParseError(_) => io::ErrorKind::InvalidInput,
            AppError::Boundary(_) | AppError::ScriptNotFound { .. } => io::ErrorKind::NotFound,
            AppError::ScriptAborted { .. } => io::ErrorKind::Other,
        }
    }
}
