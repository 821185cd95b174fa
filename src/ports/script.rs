use std::path::Path;
use std::sync::Arc;

use crate::app::{Project, ScriptKit};
use crate::domain::{AppError, ScriptFailure, ScriptOutcome};

/// Entry point of one script unit.
pub trait Script: Send + Sync {
    fn run(
        &self,
        project: &mut Project,
        args: &[String],
        kit: &ScriptKit<'_>,
    ) -> Result<ScriptOutcome, ScriptFailure>;
}

impl<F> Script for F
where
    F: Fn(&mut Project, &[String], &ScriptKit<'_>) -> Result<ScriptOutcome, ScriptFailure>
        + Send
        + Sync,
{
    fn run(
        &self,
        project: &mut Project,
        args: &[String],
        kit: &ScriptKit<'_>,
    ) -> Result<ScriptOutcome, ScriptFailure> {
        self(project, args, kit)
    }
}

/// Port that turns a resolved script file into a callable entry point.
pub trait ScriptLoader {
    /// Load the entry point of `file`, an absolute path inside `scripts_dir`.
    ///
    /// Returns [`AppError::ScriptContract`] when the file has no usable entry point.
    fn load(&self, scripts_dir: &Path, file: &Path) -> Result<Arc<dyn Script>, AppError>;
}
