use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use super::{RecordingChangeStore, RecordingRunner};
use crate::app::{Project, ProjectOptions};

/// Host project `app` with the scripts module `kit` installed under `node_modules`.
pub struct TestProject {
    _root: TempDir,
    project_root: PathBuf,
    module_root: PathBuf,
    pub runner: Arc<RecordingRunner>,
    saves: Arc<AtomicUsize>,
}

impl TestProject {
    pub fn new() -> Self {
        Self::with_project_manifest(r#"{ "name": "app" }"#)
    }

    pub fn with_project_manifest(manifest: &str) -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let project_root = root.path().join("app");
        let module_root = project_root.join("node_modules/kit");

        fs::create_dir_all(module_root.join("scripts")).unwrap();
        fs::write(project_root.join("package.json"), manifest).unwrap();
        fs::write(module_root.join("package.json"), r#"{ "name": "kit" }"#).unwrap();

        Self {
            _root: root,
            project_root,
            module_root,
            runner: Arc::new(RecordingRunner::new()),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn module_root(&self) -> &Path {
        &self.module_root
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.module_root.join("scripts")
    }

    /// Write a file under the scripts directory, creating parent directories.
    pub fn write_script(&self, name: &str, content: &str) -> PathBuf {
        let path = self.scripts_dir().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Project wired to this fixture's recording runner and change store.
    pub fn project(&self) -> Project {
        let options = ProjectOptions::new()
            .module_root(&self.module_root)
            .process_runner(self.runner.clone())
            .change_store(Box::new(RecordingChangeStore::new(self.saves.clone())));
        Project::new(options).expect("fixture project should resolve")
    }

    /// Number of times a project built from this fixture saved its changes.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}
