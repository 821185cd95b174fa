use serde::Deserialize;

/// Per-project configuration of the scripts module.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModuleConfig {
    #[serde(default, rename = "optIn")]
    pub opt_in: Vec<String>,
    #[serde(default, rename = "optOut")]
    pub opt_out: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ModuleConfig {
    pub fn is_opted_in(&self, key: &str) -> bool {
        self.opt_in.iter().any(|k| k == key)
    }

    pub fn is_opted_out(&self, key: &str) -> bool {
        self.opt_out.iter().any(|k| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}
