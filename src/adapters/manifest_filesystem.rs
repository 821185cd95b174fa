//! Package manifest lookup on the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, MANIFEST_FILE, Manifest};

/// Read and parse `<dir>/package.json`.
pub fn read_manifest(dir: &Path) -> Result<Manifest, AppError> {
    let path = dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path)?;
    serde_json::from_str(&content)
        .map_err(|err| AppError::Manifest { path, details: err.to_string() })
}

/// Whether `dir` directly contains a manifest file.
pub fn has_manifest(dir: &Path) -> bool {
    dir.join(MANIFEST_FILE).is_file()
}

/// Nearest directory at or above `start` that contains a manifest.
pub fn find_manifest_dir(start: &Path) -> Option<PathBuf> {
    start.ancestors().find(|dir| has_manifest(dir)).map(Path::to_path_buf)
}

/// Nearest manifest at or above `start`, parsed, with its directory.
pub fn find_manifest(start: &Path) -> Result<Option<(Manifest, PathBuf)>, AppError> {
    match find_manifest_dir(start) {
        Some(dir) => Ok(Some((read_manifest(&dir)?, dir))),
        None => Ok(None),
    }
}
