//! Discovery of the scripts module's configuration inside the host project.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, MANIFEST_FILE, Manifest, ModuleConfig};

/// Configuration found for a module, with the file it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: ModuleConfig,
    pub file: Option<PathBuf>,
}

enum Format {
    Json,
    Toml,
}

/// Load the module's configuration from the project root.
///
/// Sources, first match wins: the `<module>` key of the project manifest,
/// `.<name>rc.toml`, `.<name>rc.json`, `.<name>rc`, `<name>.config.toml`.
pub fn load_module_config(
    project_root: &Path,
    project_manifest: &Manifest,
    module_name: &str,
) -> Result<LoadedConfig, AppError> {
    if let Some(value) = project_manifest.get(module_name) {
        let config = serde_json::from_value(value.clone())?;
        return Ok(LoadedConfig { config, file: Some(project_root.join(MANIFEST_FILE)) });
    }

    let base = unscoped(module_name);
    let candidates = [
        (format!(".{base}rc.toml"), Format::Toml),
        (format!(".{base}rc.json"), Format::Json),
        (format!(".{base}rc"), Format::Json),
        (format!("{base}.config.toml"), Format::Toml),
    ];

    for (file_name, format) in candidates {
        let path = project_root.join(file_name);
        if !path.is_file() {
            continue;
        }
        let content = fs::read_to_string(&path)?;
        let config = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        return Ok(LoadedConfig { config, file: Some(path) });
    }

    Ok(LoadedConfig::default())
}

fn unscoped(module_name: &str) -> &str {
    match module_name.strip_prefix('@') {
        Some(scoped) => scoped.split_once('/').map_or(scoped, |(_, name)| name),
        None => module_name,
    }
}
