use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::script_unit::{has_extension, script_name};
use crate::domain::{AppError, SCRIPT_EXTENSIONS, ScriptUnit};

/// Names and files of the scripts in one scripts directory.
///
/// Nothing is cached; every call reads the filesystem.
#[derive(Debug, Clone)]
pub struct ScriptRegistry {
    dir: PathBuf,
}

impl ScriptRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Available script names, sorted and de-duplicated.
    ///
    /// A missing scripts directory yields an empty list.
    pub fn list(&self) -> Result<Vec<String>, AppError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = BTreeSet::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if let Some(name) = script_name(&file_name) {
                names.insert(name.to_string());
            }
        }
        Ok(names.into_iter().collect())
    }

    /// Resolve `name` to an existing file or directory.
    ///
    /// An exact match wins; an extensionless name is then tried as `.ts`, then `.js`.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let path = self.dir.join(name);
        if path.exists() {
            return Some(path);
        }
        if has_extension(name) {
            return None;
        }
        SCRIPT_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{name}.{ext}")))
            .find(|candidate| candidate.is_file())
    }

    pub fn resolve_unit(&self, name: &str) -> Option<ScriptUnit> {
        self.resolve(name).map(|path| ScriptUnit::new(name, path))
    }

    pub fn require(&self, name: &str) -> Result<ScriptUnit, AppError> {
        self.resolve_unit(name)
            .ok_or_else(|| AppError::ScriptNotFound { name: name.to_string(), dir: self.dir.clone() })
    }
}

/// File executed for a script unit: the file itself, or `index.*` inside a directory.
pub fn entry_point(path: &Path) -> PathBuf {
    if !path.is_dir() {
        return path.to_path_buf();
    }
    SCRIPT_EXTENSIONS
        .iter()
        .map(|ext| path.join(format!("index.{ext}")))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| path.join("index"))
}
