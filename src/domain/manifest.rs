use std::collections::BTreeMap;

use serde::Deserialize;

/// File name of a package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// `bin` field: a single path or a name-to-path map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BinField {
    Single(String),
    Map(BTreeMap<String, String>),
}

impl BinField {
    /// Relative path of `executable` inside the package.
    pub fn path_for(&self, executable: &str) -> Option<&str> {
        match self {
            BinField::Single(path) => Some(path),
            BinField::Map(map) => map.get(executable).map(String::as_str),
        }
    }
}

/// The subset of a package manifest this crate reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub bin: Option<BinField>,
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "peerDependencies")]
    pub peer_dependencies: BTreeMap<String, String>,
    /// Every other top-level key.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Manifest {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Entry file of the package, `index.js` when `main` is absent.
    pub fn main_file(&self) -> &str {
        self.main.as_deref().unwrap_or("index.js")
    }

    /// Whether `dep` is listed in dependencies, devDependencies or peerDependencies.
    pub fn has_dep(&self, dep: &str) -> bool {
        self.dependencies.contains_key(dep)
            || self.dev_dependencies.contains_key(dep)
            || self.peer_dependencies.contains_key(dep)
    }

    pub fn has_any_dep<S: AsRef<str>>(&self, deps: &[S]) -> bool {
        deps.iter().any(|dep| self.has_dep(dep.as_ref()))
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}
