pub mod boundary;
pub mod concurrent;
pub mod error;
pub mod executable;
pub mod manifest;
pub mod module_config;
pub mod script_result;
pub mod script_unit;

pub use boundary::ProjectBoundary;
pub use error::{AppError, ScriptFailure};
pub use executable::{
    CommandGroup, Executable, GroupEntry, Invocation, SpawnOptions, StdioMode, TextEncoding,
};
pub use manifest::{BinField, MANIFEST_FILE, Manifest};
pub use module_config::ModuleConfig;
pub use script_result::{CapturedOutput, ScriptError, ScriptOutcome, ScriptResult};
pub use script_unit::{SCRIPT_EXTENSIONS, ScriptUnit};
