//! Script files executed as external programs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::{Project, ScriptKit};
use crate::domain::{AppError, Executable, ScriptFailure, ScriptOutcome, SpawnOptions};
use crate::ports::{Script, ScriptLoader};

pub const PROJECT_ROOT_VAR: &str = "SCRIPTKIT_PROJECT_ROOT";
pub const MODULE_ROOT_VAR: &str = "SCRIPTKIT_MODULE_ROOT";
pub const CONFIG_DIR_VAR: &str = "SCRIPTKIT_CONFIG_DIR";
pub const SCRIPT_DIR_VAR: &str = "SCRIPTKIT_SCRIPT_DIR";

/// Loads script files by pairing them with an interpreter chosen by extension.
///
/// Files without an extension are executed directly.
#[derive(Debug, Clone)]
pub struct InterpreterLoader {
    interpreters: BTreeMap<String, String>,
}

impl Default for InterpreterLoader {
    fn default() -> Self {
        Self::new().interpreter("js", "node").interpreter("ts", "ts-node").interpreter("sh", "sh")
    }
}

impl InterpreterLoader {
    /// A loader with no interpreters registered.
    pub fn new() -> Self {
        Self { interpreters: BTreeMap::new() }
    }

    pub fn interpreter(mut self, extension: impl Into<String>, program: impl Into<String>) -> Self {
        self.interpreters.insert(extension.into(), program.into());
        self
    }
}

impl ScriptLoader for InterpreterLoader {
    fn load(&self, _scripts_dir: &Path, file: &Path) -> Result<Arc<dyn Script>, AppError> {
        if !file.is_file() {
            return Err(AppError::ScriptContract {
                path: file.to_path_buf(),
                reason: "entry point file does not exist".to_string(),
            });
        }

        let interpreter = match file.extension().map(|ext| ext.to_string_lossy()) {
            None => None,
            Some(ext) => match self.interpreters.get(ext.as_ref()) {
                Some(program) => Some(program.clone()),
                None => {
                    return Err(AppError::ScriptContract {
                        path: file.to_path_buf(),
                        reason: format!("no interpreter is configured for .{ext} files"),
                    });
                }
            },
        };

        Ok(Arc::new(InterpretedScript { interpreter, file: file.to_path_buf() }))
    }
}

struct InterpretedScript {
    interpreter: Option<String>,
    file: PathBuf,
}

impl InterpretedScript {
    fn executable(&self, project: &Project, args: &[String], kit: &ScriptKit<'_>) -> Executable {
        let file = self.file.to_string_lossy().to_string();
        let (program, mut argv) = match &self.interpreter {
            Some(interpreter) => (interpreter.clone(), vec![file]),
            None => (file, Vec::new()),
        };
        argv.extend(args.iter().cloned());

        let options = SpawnOptions::default()
            .with_env(PROJECT_ROOT_VAR, project.root().to_string_lossy())
            .with_env(MODULE_ROOT_VAR, project.module_root().to_string_lossy())
            .with_env(CONFIG_DIR_VAR, kit.config_dir().to_string_lossy())
            .with_env(SCRIPT_DIR_VAR, kit.dir().to_string_lossy());

        Executable::with_options(program, argv, options)
    }
}

impl Script for InterpretedScript {
    fn run(
        &self,
        project: &mut Project,
        args: &[String],
        kit: &ScriptKit<'_>,
    ) -> Result<ScriptOutcome, ScriptFailure> {
        let executable = self.executable(project, args, kit);
        Ok(project.execute([executable]).into())
    }
}
