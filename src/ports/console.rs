use crate::domain::ScriptError;

/// Port for user-facing diagnostics emitted by dispatch.
pub trait Console {
    /// Log an error line.
    fn log_error(&self, message: &str);

    /// Report a structured error on the error console.
    fn report_error(&self, error: &ScriptError);

    /// Print plain text, e.g. the usage block.
    fn print(&self, text: &str);
}
