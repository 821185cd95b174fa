//! Shared testing harness for `scriptkit` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A host project `app` with the scripts module `kit` installed in `node_modules`.
pub(crate) struct TestContext {
    root: TempDir,
    project_dir: PathBuf,
    module_dir: PathBuf,
}

impl TestContext {
    /// Create a new isolated project layout.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let project_dir = root.path().join("app");
        let module_dir = project_dir.join("node_modules").join("kit");

        fs::create_dir_all(module_dir.join("scripts")).expect("Failed to create scripts directory");
        fs::write(project_dir.join("package.json"), r#"{ "name": "app" }"#)
            .expect("Failed to write project manifest");
        fs::write(module_dir.join("package.json"), r#"{ "name": "kit", "bin": { "kit": "lib/index.js" } }"#)
            .expect("Failed to write module manifest");

        Self { root, project_dir, module_dir }
    }

    /// Directory of the host project.
    pub(crate) fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Directory of the installed scripts module.
    pub(crate) fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    pub(crate) fn scripts_dir(&self) -> PathBuf {
        self.module_dir.join("scripts")
    }

    /// Write a script file relative to the scripts directory.
    pub(crate) fn write_script(&self, name: &str, content: &str) -> PathBuf {
        let path = self.scripts_dir().join(name);
        fs::create_dir_all(path.parent().expect("script path has a parent"))
            .expect("Failed to create script directory");
        fs::write(&path, content).expect("Failed to write script");
        path
    }

    /// Write a file relative to the project directory.
    pub(crate) fn write_project_file(&self, name: &str, content: &str) {
        fs::write(self.project_dir.join(name), content).expect("Failed to write project file");
    }

    /// Build a command for invoking the compiled `scriptkit` binary from the project directory.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("scriptkit").expect("Failed to locate scriptkit binary");
        cmd.current_dir(&self.project_dir)
            .env("SCRIPTKIT_MODULE_ROOT", &self.module_dir)
            .env_remove("SCRIPTKIT_FILES_DIR")
            .env_remove("RUST_LOG")
            .env_remove("npm_lifecycle_event");
        cmd
    }
}
