pub mod config_filesystem;
pub mod interpreter_loader;
pub mod manifest_filesystem;
pub mod process_command;
pub mod script_catalog;
pub mod script_filesystem;
pub mod terminal_console;

pub use interpreter_loader::InterpreterLoader;
pub use process_command::CommandProcessRunner;
pub use script_catalog::ScriptCatalog;
pub use script_filesystem::ScriptRegistry;
pub use terminal_console::TerminalConsole;
