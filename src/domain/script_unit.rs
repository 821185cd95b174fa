use std::path::{Path, PathBuf};

/// Extensions tried, in order, for a script name given without one.
pub const SCRIPT_EXTENSIONS: [&str; 2] = ["ts", "js"];

/// Directory names that hold tests for scripts rather than scripts.
const TEST_DIRS: [&str; 2] = ["__tests__", "tests"];

/// Suffixes of generated artifacts that sit next to scripts.
const ARTIFACT_SUFFIXES: [&str; 3] = [".d.ts", ".map", ".d.mts"];

/// A named script resolved to a file or directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptUnit {
    pub name: String,
    pub file_path: PathBuf,
}

impl ScriptUnit {
    pub fn new(name: impl Into<String>, file_path: PathBuf) -> Self {
        Self { name: name.into(), file_path }
    }
}

/// Script name for a scripts-directory entry, or `None` if the entry is not a script.
pub fn script_name(entry: &str) -> Option<&str> {
    if entry.is_empty() || TEST_DIRS.contains(&entry) {
        return None;
    }
    if ARTIFACT_SUFFIXES.iter().any(|suffix| entry.ends_with(suffix)) {
        return None;
    }
    let name = SCRIPT_EXTENSIONS
        .iter()
        .find_map(|ext| entry.strip_suffix(ext).and_then(|rest| rest.strip_suffix('.')))
        .unwrap_or(entry);
    (!name.is_empty()).then_some(name)
}

/// Whether the last path segment of `name` carries an extension.
pub fn has_extension(name: &str) -> bool {
    Path::new(name).extension().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_extensions() {
        assert_eq!(script_name("build.js"), Some("build"));
        assert_eq!(script_name("lint.ts"), Some("lint"));
        assert_eq!(script_name("release"), Some("release"));
        assert_eq!(script_name("notes.md"), Some("notes.md"));
    }

    #[test]
    fn rejects_artifacts_and_test_dirs() {
        assert_eq!(script_name("build.d.ts"), None);
        assert_eq!(script_name("build.js.map"), None);
        assert_eq!(script_name("__tests__"), None);
        assert_eq!(script_name("tests"), None);
        assert_eq!(script_name(".js"), None);
    }

    #[test]
    fn extension_detection_uses_last_segment() {
        assert!(has_extension("build.js"));
        assert!(has_extension("build/tsc.ts"));
        assert!(!has_extension("build"));
        assert!(!has_extension("v1.2/build"));
    }
}
