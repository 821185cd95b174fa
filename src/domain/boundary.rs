use std::path::{Path, PathBuf};

/// The host project and the scripts module, resolved once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectBoundary {
    project_root: PathBuf,
    project_name: String,
    module_root: PathBuf,
    module_name: String,
}

impl ProjectBoundary {
    pub fn new(
        project_root: PathBuf,
        project_name: impl Into<String>,
        module_root: PathBuf,
        module_name: impl Into<String>,
    ) -> Self {
        Self {
            project_root,
            project_name: project_name.into(),
            module_root,
            module_name: module_name.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn module_root(&self) -> &Path {
        &self.module_root
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// The scripts module is running against itself.
    pub fn is_self_hosted(&self) -> bool {
        self.project_root == self.module_root
    }
}
