use crate::domain::ScriptError;
use crate::ports::Console;

/// [`Console`] writing log lines through `tracing` and reports to stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn log_error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    fn report_error(&self, error: &ScriptError) {
        match error {
            ScriptError::Structured(err) => eprintln!("{err:?}"),
            ScriptError::Message(message) => eprintln!("{message}"),
        }
    }

    fn print(&self, text: &str) {
        println!("{text}");
    }
}
