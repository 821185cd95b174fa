use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::adapters::config_filesystem::load_module_config;
use crate::adapters::manifest_filesystem::read_manifest;
use crate::adapters::process_command::find_on_path;
use crate::adapters::{CommandProcessRunner, ScriptRegistry};
use crate::app::boundary;
use crate::app::engine::ExecutionEngine;
use crate::app::paths::dot_relative;
use crate::domain::concurrent::CONCURRENT_RUNNER;
use crate::domain::manifest::MANIFEST_FILE;
use crate::domain::{AppError, Executable, Manifest, ModuleConfig, ProjectBoundary, ScriptResult};
use crate::ports::{ChangeStore, NoopChangeStore, ProcessRunner};

/// Directory of installed package binaries, relative to a package root.
pub const BIN_DIR: &str = "node_modules/.bin";

/// Dependencies that mark a project as compiled with Babel.
const BABEL_DEPS: [&str; 2] = ["babel-cli", "babel-preset-env"];

/// Options for [`Project::new`]. Everything is optional.
#[derive(Default)]
pub struct ProjectOptions {
    /// Directory holding `scripts/` and `config/`; defaults to the module root.
    pub files_dir: Option<PathBuf>,
    /// Any path inside the scripts module; found from the running executable otherwise.
    pub module_root: Option<PathBuf>,
    /// Working directory used to locate the project instead of the module position.
    pub cwd: Option<PathBuf>,
    pub debug: bool,
    pub process_runner: Option<Arc<dyn ProcessRunner>>,
    pub change_store: Option<Box<dyn ChangeStore>>,
    /// Program used for concurrent groups.
    pub concurrent_runner: Option<String>,
}

impl ProjectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_root = Some(path.into());
        self
    }

    pub fn files_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.files_dir = Some(path.into());
        self
    }

    pub fn cwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.cwd = Some(path.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn process_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.process_runner = Some(runner);
        self
    }

    pub fn change_store(mut self, store: Box<dyn ChangeStore>) -> Self {
        self.change_store = Some(store);
        self
    }

    pub fn concurrent_runner(mut self, program: impl Into<String>) -> Self {
        self.concurrent_runner = Some(program.into());
        self
    }
}

/// Handle on the host project, handed to every script.
pub struct Project {
    boundary: ProjectBoundary,
    manifest: Manifest,
    module_manifest: Manifest,
    config: ModuleConfig,
    config_file: Option<PathBuf>,
    files_dir: PathBuf,
    debug: bool,
    engine: ExecutionEngine,
    changes: Box<dyn ChangeStore>,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("boundary", &self.boundary)
            .field("files_dir", &self.files_dir)
            .field("config_file", &self.config_file)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl Project {
    /// Resolve the boundary, read manifests and configuration, and wire the engine.
    pub fn new(options: ProjectOptions) -> Result<Self, AppError> {
        let resolved = boundary::resolve(options.module_root.as_deref(), options.cwd.as_deref())?;
        let boundary = resolved.boundary;

        let loaded = load_module_config(
            boundary.project_root(),
            &resolved.project_manifest,
            boundary.module_name(),
        )?;

        let bin_dir = boundary.project_root().join(BIN_DIR);
        let concurrent_runner = options.concurrent_runner.unwrap_or_else(|| {
            let installed = bin_dir.join(CONCURRENT_RUNNER);
            if installed.is_file() {
                installed.to_string_lossy().to_string()
            } else {
                CONCURRENT_RUNNER.to_string()
            }
        });
        let runner =
            options.process_runner.unwrap_or_else(|| Arc::new(CommandProcessRunner::new()));
        let engine = ExecutionEngine::new(runner)
            .with_concurrent_runner(concurrent_runner)
            .with_path_prefix(vec![bin_dir]);

        if options.debug {
            warn!("Debug mode is on");
        }

        Ok(Self {
            files_dir: options.files_dir.unwrap_or_else(|| boundary.module_root().to_path_buf()),
            boundary,
            manifest: resolved.project_manifest,
            module_manifest: resolved.module_manifest,
            config: loaded.config,
            config_file: loaded.file,
            debug: options.debug,
            engine,
            changes: options.change_store.unwrap_or_else(|| Box::new(NoopChangeStore)),
        })
    }

    /// Name of the host project.
    pub fn name(&self) -> &str {
        self.boundary.project_name()
    }

    /// Name of the scripts module.
    pub fn module_name(&self) -> &str {
        self.boundary.module_name()
    }

    pub fn root(&self) -> &Path {
        self.boundary.project_root()
    }

    pub fn module_root(&self) -> &Path {
        self.boundary.module_root()
    }

    pub fn boundary(&self) -> &ProjectBoundary {
        &self.boundary
    }

    /// The host project's manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn module_manifest(&self) -> &Manifest {
        &self.module_manifest
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.files_dir.join("scripts")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.files_dir.join("config")
    }

    pub fn from_root(&self, part: impl AsRef<Path>) -> PathBuf {
        self.root().join(part)
    }

    pub fn from_module_root(&self, part: impl AsRef<Path>) -> PathBuf {
        self.module_root().join(part)
    }

    pub fn from_config_dir(&self, part: impl AsRef<Path>) -> PathBuf {
        self.config_dir().join(part)
    }

    pub fn from_scripts_dir(&self, part: impl AsRef<Path>) -> PathBuf {
        self.scripts_dir().join(part)
    }

    /// Registry over this project's scripts directory.
    pub fn scripts(&self) -> ScriptRegistry {
        ScriptRegistry::new(self.scripts_dir())
    }

    pub fn list_scripts(&self) -> Result<Vec<String>, AppError> {
        self.scripts().list()
    }

    /// Resolved path of a script, if it exists.
    pub fn has_script(&self, name: &str) -> Option<PathBuf> {
        self.scripts().resolve(name)
    }

    /// `./`-relative path of an executable in the project's bin directory.
    pub fn bin(&self, executable: &str) -> Result<PathBuf, AppError> {
        let cwd = env::current_dir()?;
        Ok(dot_relative(&cwd, &self.from_root(BIN_DIR).join(executable)))
    }

    /// Package directory of the installed module `name`.
    ///
    /// `node_modules` is searched from the scripts module upwards, then from
    /// the project root upwards.
    pub fn resolve_module(&self, name: &str) -> Result<PathBuf, AppError> {
        self.module_root()
            .ancestors()
            .chain(self.root().ancestors())
            .map(|dir| dir.join("node_modules").join(name))
            .find(|dir| dir.join(MANIFEST_FILE).is_file())
            .ok_or_else(|| AppError::config_error(format!("Cannot find module {name}")))
    }

    /// Command for `executable` (defaults to `module`) declared in the `bin` field of `module`.
    ///
    /// The bare executable name is returned when the declared binary is the
    /// one found on `PATH`, or when the module cannot be read but `PATH` has
    /// the executable. Otherwise the declared path is returned, `./`-relative
    /// when it lies under the current directory.
    pub fn resolve_bin(&self, module: &str, executable: Option<&str>) -> Result<PathBuf, AppError> {
        let executable = executable.unwrap_or(module);
        let from_path = find_on_path(executable).and_then(|found| fs::canonicalize(found).ok());

        let declared = match self.resolve_module(module).and_then(|dir| declared_bin(&dir, executable)) {
            Ok(declared) => declared,
            Err(err) => {
                return match from_path {
                    Some(_) => Ok(PathBuf::from(executable)),
                    None => Err(err),
                };
            }
        };
        if from_path.is_some() && fs::canonicalize(&declared).ok() == from_path {
            return Ok(PathBuf::from(executable));
        }
        let cwd = env::current_dir()?;
        Ok(under_cwd(&cwd, declared))
    }

    /// Command that runs the scripts module's own binary.
    ///
    /// A self-hosted project runs its module's entry file; any other project
    /// resolves the module's binary by name.
    pub fn resolve_scripts_bin(&self) -> Result<PathBuf, AppError> {
        if self.name() == self.module_name() {
            let main = self.module_root().join(self.module_manifest().main_file());
            let cwd = env::current_dir()?;
            return Ok(under_cwd(&cwd, main));
        }
        self.resolve_bin(self.module_name(), None)
    }

    pub fn has_any_dep<S: AsRef<str>>(&self, deps: &[S]) -> bool {
        self.manifest.has_any_dep(deps)
    }

    /// The project publishes type declarations.
    pub fn is_typescript(&self) -> bool {
        self.manifest.types.is_some()
    }

    /// The project is compiled by TypeScript or Babel.
    pub fn is_compiled(&self) -> bool {
        self.is_typescript() || self.has_any_dep(&BABEL_DEPS)
    }

    pub fn is_opted_in(&self, key: &str) -> bool {
        self.config.is_opted_in(key)
    }

    pub fn is_opted_out(&self, key: &str) -> bool {
        self.config.is_opted_out(key)
    }

    /// Run executables serially; see [`ExecutionEngine::run`].
    pub fn execute<I, E>(&self, executables: I) -> ScriptResult
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<Executable>>,
    {
        self.engine.run(executables)
    }

    /// Run executables; the result never terminates the process by itself.
    pub fn execute_without_exit<I, E>(&self, executables: I) -> ScriptResult
    where
        I: IntoIterator<Item = E>,
        E: Into<Option<Executable>>,
    {
        self.engine.run_without_exit(executables)
    }

    /// Persist pending tracked-file changes.
    pub fn save_changes(&mut self) -> Result<(), AppError> {
        self.changes.save()
    }
}

/// Absolute path of `executable` declared in the `bin` field of the package at `module_dir`.
fn declared_bin(module_dir: &Path, executable: &str) -> Result<PathBuf, AppError> {
    let manifest = read_manifest(module_dir)?;
    manifest
        .bin
        .as_ref()
        .and_then(|bin| bin.path_for(executable))
        .map(|path| module_dir.join(path))
        .ok_or_else(|| {
            AppError::config_error(format!(
                "Package {} does not declare a binary named {executable}",
                module_dir.display()
            ))
        })
}

/// `./`-prefixed remainder of `path` when it lies under `cwd`, `path` otherwise.
fn under_cwd(cwd: &Path, path: PathBuf) -> PathBuf {
    match path.strip_prefix(cwd) {
        Ok(rest) => Path::new(".").join(rest),
        Err(_) => path,
    }
}
