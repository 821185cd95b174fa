use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::app::{Project, ScriptKit};
use crate::domain::{AppError, ScriptFailure, ScriptOutcome};
use crate::ports::{Script, ScriptLoader};

/// In-process entry points keyed by script path.
///
/// Keys are paths relative to the scripts directory without extension,
/// joined with `/`: `build`, `build/tsc`. A directory script is looked up
/// as `build/index` first, then `build`. The file must still exist on disk.
#[derive(Default, Clone)]
pub struct ScriptCatalog {
    scripts: BTreeMap<String, Arc<dyn Script>>,
}

impl ScriptCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, key: impl Into<String>, script: F) -> Self
    where
        F: Fn(&mut Project, &[String], &ScriptKit<'_>) -> Result<ScriptOutcome, ScriptFailure>
            + Send
            + Sync
            + 'static,
    {
        self.register_script(key, Arc::new(script))
    }

    /// Register an entry point that is already shared, e.g. one script under two keys.
    pub fn register_script(mut self, key: impl Into<String>, script: Arc<dyn Script>) -> Self {
        self.scripts.insert(key.into(), script);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ScriptCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptCatalog").field("keys", &self.keys().collect::<Vec<_>>()).finish()
    }
}

impl ScriptLoader for ScriptCatalog {
    fn load(&self, scripts_dir: &Path, file: &Path) -> Result<Arc<dyn Script>, AppError> {
        let key = catalog_key(scripts_dir, file).ok_or_else(|| AppError::ScriptContract {
            path: file.to_path_buf(),
            reason: format!("file is outside the scripts directory {}", scripts_dir.display()),
        })?;

        let found = self.scripts.get(&key).or_else(|| {
            key.strip_suffix("/index").and_then(|dir_key| self.scripts.get(dir_key))
        });

        found.cloned().ok_or_else(|| AppError::ScriptContract {
            path: file.to_path_buf(),
            reason: format!("no entry point is registered for \"{key}\""),
        })
    }
}

fn catalog_key(scripts_dir: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(scripts_dir).ok()?.with_extension("");
    let parts: Vec<_> =
        relative.components().map(|part| part.as_os_str().to_string_lossy().to_string()).collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScriptResult;
    use std::path::PathBuf;

    fn ok(_: &mut Project, _: &[String], _: &ScriptKit<'_>) -> Result<ScriptOutcome, ScriptFailure> {
        Ok(ScriptResult::success().into())
    }

    #[test]
    fn keys_drop_extension_and_use_forward_slashes() {
        let dir = PathBuf::from("/m/scripts");
        assert_eq!(catalog_key(&dir, &dir.join("build.ts")), Some("build".into()));
        assert_eq!(catalog_key(&dir, &dir.join("build").join("tsc.js")), Some("build/tsc".into()));
        assert_eq!(catalog_key(&dir, Path::new("/elsewhere/x.js")), None);
    }

    #[test]
    fn directory_index_falls_back_to_directory_key() {
        let dir = PathBuf::from("/m/scripts");
        let catalog = ScriptCatalog::new().register("build", ok);

        assert!(catalog.load(&dir, &dir.join("build/index.js")).is_ok());
    }

    #[test]
    fn unregistered_file_is_a_contract_error() {
        let dir = PathBuf::from("/m/scripts");
        let catalog = ScriptCatalog::new().register("build", ok);

        let err = catalog.load(&dir, &dir.join("lint.ts")).err().unwrap();
        assert!(matches!(err, AppError::ScriptContract { ref reason, .. } if reason.contains("\"lint\"")));
    }

    #[test]
    fn shared_entry_point_answers_every_key() {
        let dir = PathBuf::from("/m/scripts");
        let shared: Arc<dyn Script> = Arc::new(ok);
        let catalog = ScriptCatalog::new()
            .register_script("test", shared.clone())
            .register_script("validate/test", shared)
            .register("build", ok);

        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["build", "test", "validate/test"]);
        assert!(catalog.load(&dir, &dir.join("validate/test.js")).is_ok());
        assert_eq!(format!("{catalog:?}"), r#"ScriptCatalog { keys: ["build", "test", "validate/test"] }"#);
    }
}
