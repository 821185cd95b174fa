use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::script_filesystem::entry_point;
use crate::app::Project;
use crate::app::paths::dot_relative;
use crate::domain::{AppError, ScriptFailure, ScriptOutcome};
use crate::ports::ScriptLoader;

/// Helper handed to a script entry point, scoped to that script's file.
pub struct ScriptKit<'a> {
    loader: &'a dyn ScriptLoader,
    name: String,
    file: PathBuf,
    scripts_dir: PathBuf,
}

impl std::fmt::Debug for ScriptKit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptKit").field("name", &self.name).field("file", &self.file).finish()
    }
}

impl<'a> ScriptKit<'a> {
    /// Resolve `name` in the project's scripts directory.
    ///
    /// A directory resolves to its `index` entry point.
    pub fn new(project: &Project, name: &str, loader: &'a dyn ScriptLoader) -> Result<Self, AppError> {
        let unit = project.scripts().require(name)?;
        Ok(Self {
            loader,
            name: unit.name,
            file: entry_point(&unit.file_path),
            scripts_dir: project.scripts_dir(),
        })
    }

    /// Name the script was requested with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry point file of the script.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Directory of the script's entry point.
    pub fn dir(&self) -> &Path {
        self.file.parent().unwrap_or(self.scripts_dir.as_path())
    }

    /// `config` directory next to the nearest enclosing `scripts` directory.
    ///
    /// Works the same for source and compiled script trees, e.g.
    /// `lib/scripts/build` maps to `lib/config`.
    /// A script outside any `scripts` directory gets the relative `config`.
    pub fn config_dir(&self) -> PathBuf {
        sibling_config_dir(self.dir())
    }

    /// Extension of the entry point without the leading dot; empty when there is none.
    pub fn extension(&self) -> &str {
        self.file.extension().and_then(|ext| ext.to_str()).unwrap_or("")
    }

    /// Absolute path of `parts` joined under the script's directory.
    pub fn here<I, P>(&self, parts: I) -> PathBuf
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        parts.into_iter().fold(self.dir().to_path_buf(), |path, part| path.join(part))
    }

    /// `./`-prefixed path of [`here`](Self::here) relative to the current directory.
    pub fn here_relative<I, P>(&self, parts: I) -> Result<PathBuf, AppError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let cwd = env::current_dir()?;
        Ok(dot_relative(&cwd, &self.here(parts)))
    }

    /// Run a script that lives next to this one, e.g. `tsc` from `build/index`.
    pub fn execute_sub_script(
        &self,
        project: &mut Project,
        name: &str,
        args: &[String],
    ) -> Result<ScriptOutcome, ScriptFailure> {
        let relative = self.dir().strip_prefix(&self.scripts_dir).unwrap_or(Path::new(""));
        let sub_script: Vec<String> = relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy().to_string())
            .chain(std::iter::once(name.to_string()))
            .collect();
        run_script_file(project, self.loader, &sub_script.join("/"), args)
    }
}

/// Load the script `name` from the project's scripts directory and call its entry point.
///
/// Resolution and loading errors are returned as failures of the call.
pub fn run_script_file(
    project: &mut Project,
    loader: &dyn ScriptLoader,
    name: &str,
    args: &[String],
) -> Result<ScriptOutcome, ScriptFailure> {
    let kit = ScriptKit::new(project, name, loader)?;
    let script = loader.load(&kit.scripts_dir, &kit.file)?;
    debug!(script = name, file = %kit.file.display(), "running script");
    script.run(project, args, &kit)
}

fn sibling_config_dir(dir: &Path) -> PathBuf {
    dir.ancestors()
        .find(|ancestor| ancestor.file_name().is_some_and(|name| name == "scripts"))
        .and_then(Path::parent)
        .map_or_else(|| PathBuf::from("config"), |parent| parent.join("config"))
}
