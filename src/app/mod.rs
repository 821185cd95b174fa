pub mod args;
pub mod boundary;
pub mod cli;
pub mod dispatch;
pub mod engine;
pub mod env;
pub mod paths;
pub mod project;
pub mod script_kit;

pub use args::replace_argument_name;
pub use dispatch::{DispatchOutcome, Dispatcher, execute_from_cli};
pub use engine::ExecutionEngine;
pub use project::{Project, ProjectOptions};
pub use script_kit::{ScriptKit, run_script_file};
