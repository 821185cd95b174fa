//! Resolution of the host project root and the scripts module root.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::manifest_filesystem::{find_manifest, find_manifest_dir, has_manifest, read_manifest};
use crate::domain::{AppError, Manifest, ProjectBoundary};

/// Environment variable naming the package-manager lifecycle event being run.
pub const LIFECYCLE_EVENT_VAR: &str = "npm_lifecycle_event";

/// Source directory of this library; origins inside it are never a caller.
pub const LIBRARY_ROOT: &str = env!("CARGO_MANIFEST_DIR");

/// Both roots with the manifests read while resolving them.
#[derive(Debug, Clone)]
pub struct ResolvedBoundary {
    pub boundary: ProjectBoundary,
    pub project_manifest: Manifest,
    pub module_manifest: Manifest,
}

/// Resolve the module root and the project root.
///
/// An explicit `module_root` is walked upward to its manifest; without one,
/// the module is found from [`default_origins`]. An explicit `cwd` selects the
/// working-directory convention of [`package_and_dir`] for the project root.
pub fn resolve(module_root: Option<&Path>, cwd: Option<&Path>) -> Result<ResolvedBoundary, AppError> {
    let module_root = match module_root {
        Some(start) => find_manifest_dir(start).ok_or_else(|| {
            AppError::boundary(format!("Cannot find module root at or above {}", start.display()))
        })?,
        None => resolve_module_root(&default_origins(), Path::new(LIBRARY_ROOT))?,
    };
    let module_manifest = read_manifest(&module_root)?;

    let (project_root, project_manifest) = match cwd {
        Some(cwd) => {
            let (manifest, dir) = package_and_dir(cwd, 0)?;
            (dir, manifest)
        }
        None => resolve_project_root(&module_root, &module_manifest)?,
    };

    debug!(
        project_root = %project_root.display(),
        module_root = %module_root.display(),
        "resolved project boundary"
    );

    let boundary = ProjectBoundary::new(
        project_root,
        project_manifest.name(),
        module_root,
        module_manifest.name(),
    );
    Ok(ResolvedBoundary { boundary, project_manifest, module_manifest })
}

/// Locations used to find the calling module when none is given explicitly.
pub fn default_origins() -> Vec<PathBuf> {
    env::current_exe().ok().and_then(|exe| fs::canonicalize(exe).ok()).into_iter().collect()
}

/// Module root of the first origin that lies outside `own_root`.
///
/// Fails when every origin is inside `own_root` or no manifest sits above the
/// chosen origin.
pub fn resolve_module_root(origins: &[PathBuf], own_root: &Path) -> Result<PathBuf, AppError> {
    let origin = origins
        .iter()
        .find(|origin| !origin.starts_with(own_root))
        .ok_or_else(|| AppError::boundary("Cannot find module root: no caller outside the library"))?;

    find_manifest_dir(origin).ok_or_else(|| {
        AppError::boundary(format!("Cannot find module root above {}", origin.display()))
    })
}

/// Project root for a module: the nearest manifest above `module_root`, or
/// the module itself when it runs against its own package.
pub fn resolve_project_root(
    module_root: &Path,
    module_manifest: &Manifest,
) -> Result<(PathBuf, Manifest), AppError> {
    if let Some(parent) = module_root.parent()
        && let Some((manifest, dir)) = find_manifest(parent)?
    {
        return Ok((dir, manifest));
    }

    if has_manifest(module_root) {
        let manifest = read_manifest(module_root)?;
        if manifest.name.is_some() && manifest.name() == module_manifest.name() {
            return Ok((module_root.to_path_buf(), manifest));
        }
    }

    Err(AppError::boundary(format!(
        "Cannot find project root for module {}",
        module_root.display()
    )))
}

/// Nearest manifest starting `level` directories above `cwd`.
///
/// Lifecycle events with a known working directory override `level`.
pub fn package_and_dir(cwd: &Path, level: usize) -> Result<(Manifest, PathBuf), AppError> {
    let event = env::var(LIFECYCLE_EVENT_VAR).ok();
    package_and_dir_for_event(cwd, level, event.as_deref())
}

fn package_and_dir_for_event(
    cwd: &Path,
    level: usize,
    event: Option<&str>,
) -> Result<(Manifest, PathBuf), AppError> {
    let up = lifecycle_levels(event).unwrap_or(level);
    let mut start = cwd.to_path_buf();
    for _ in 0..up {
        start.push("..");
    }
    let start = fs::canonicalize(&start).map_err(|err| {
        AppError::boundary(format!("Cannot find project directory from {}: {err}", start.display()))
    })?;

    find_manifest(&start)?.ok_or_else(|| {
        AppError::boundary(format!("Project directory cannot be found in cwd: {}", start.display()))
    })
}

/// Levels between the working directory of a lifecycle event and the project.
///
/// `preinstall` runs inside `project/node_modules/<module>`, `postinstall` one level lower.
pub fn lifecycle_levels(event: Option<&str>) -> Option<usize> {
    match event? {
        "preinstall" => Some(2),
        "postinstall" => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("package.json"), format!(r#"{{ "name": "{name}" }}"#)).unwrap();
    }

    /// `<tmp>/app` with the module installed under `node_modules/kit`.
    fn installed_layout() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("app");
        let module = project.join("node_modules/kit");
        write_manifest(&project, "app");
        write_manifest(&module, "kit");
        fs::create_dir_all(module.join("lib/scripts")).unwrap();
        (tmp, project, module)
    }

    #[test]
    fn project_root_is_nearest_manifest_above_module() {
        let (_tmp, project, module) = installed_layout();
        let module_manifest = read_manifest(&module).unwrap();

        let (root, manifest) = resolve_project_root(&module, &module_manifest).unwrap();
        assert_eq!(root, project);
        assert_eq!(manifest.name(), "app");
    }

    #[test]
    fn module_running_against_itself_is_its_own_project() {
        let tmp = TempDir::new().unwrap();
        let module = tmp.path().join("kit");
        write_manifest(&module, "kit");
        let module_manifest = read_manifest(&module).unwrap();

        let (root, manifest) = resolve_project_root(&module, &module_manifest).unwrap();
        assert_eq!(root, module);
        assert_eq!(manifest.name(), "kit");
    }

    #[test]
    fn project_root_fails_without_any_manifest() {
        let tmp = TempDir::new().unwrap();
        let module = tmp.path().join("kit");
        fs::create_dir_all(&module).unwrap();
        let module_manifest: Manifest = serde_json::from_str(r#"{ "name": "kit" }"#).unwrap();

        let err = resolve_project_root(&module, &module_manifest).unwrap_err();
        assert!(matches!(err, AppError::Boundary(ref m) if m.contains("Cannot find project root")));
    }

    #[test]
    fn module_root_skips_origins_inside_the_library() {
        let (tmp, _project, module) = installed_layout();
        let library = tmp.path().join("library");
        let origins = vec![library.join("src/lib.rs"), module.join("lib/index.js")];

        assert_eq!(resolve_module_root(&origins, &library).unwrap(), module);
    }

    #[test]
    fn module_root_fails_when_library_is_outermost_caller() {
        let tmp = TempDir::new().unwrap();
        let origins = vec![tmp.path().join("src/main.rs")];

        let err = resolve_module_root(&origins, tmp.path()).unwrap_err();
        assert!(matches!(err, AppError::Boundary(_)));
    }

    #[test]
    fn cwd_variant_walks_requested_levels() {
        let (_tmp, project, module) = installed_layout();
        let project = fs::canonicalize(project).unwrap();

        let (manifest, dir) = package_and_dir_for_event(&module, 0, None).unwrap();
        assert_eq!(manifest.name(), "kit");

        let (manifest, dir_up) = package_and_dir_for_event(&module, 2, None).unwrap();
        assert_eq!(manifest.name(), "app");
        assert_eq!(dir_up, project);
        assert_ne!(dir, dir_up);
    }

    #[test]
    fn lifecycle_event_overrides_level() {
        let (_tmp, project, module) = installed_layout();
        let project = fs::canonicalize(project).unwrap();

        let (_, dir) = package_and_dir_for_event(&module, 0, Some("preinstall")).unwrap();
        assert_eq!(dir, project);
        let (_, dir) = package_and_dir_for_event(&module, 0, Some("postinstall")).unwrap();
        assert_eq!(dir, project);
        let (_, dir) = package_and_dir_for_event(&module, 0, Some("test")).unwrap();
        assert_ne!(dir, project);
    }

    #[test]
    fn explicit_module_root_resolves_both_sides() {
        let (_tmp, project, module) = installed_layout();

        let resolved = resolve(Some(&module.join("lib/scripts")), None).unwrap();
        assert_eq!(resolved.boundary.module_root(), module);
        assert_eq!(resolved.boundary.project_root(), project);
        assert_eq!(resolved.boundary.module_name(), "kit");
        assert_eq!(resolved.boundary.project_name(), "app");
        assert!(!resolved.boundary.is_self_hosted());
    }
}
