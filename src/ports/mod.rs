mod change_store;
mod console;
mod process_runner;
mod script;

pub use change_store::{ChangeStore, NoopChangeStore};
pub use console::Console;
pub use process_runner::{ProcessRequest, ProcessRunner};
pub use script::{Script, ScriptLoader};
