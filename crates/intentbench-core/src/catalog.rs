//! Model profiles and the catalog of models under test.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::error::EvalError;

/// Inference settings for one model under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Catalog key (e.g. `"qwen3_1_7b"`).
    pub key: String,

    /// Identifier understood by the backend (e.g. `"qwen3:1.7b"`).
    pub name: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus-sampling threshold.
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Per-attempt time limit in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts made when the backend reports a transient error.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub description: String,
}

fn default_temperature() -> f32 {
    defaults::TEMPERATURE
}

fn default_top_p() -> f32 {
    defaults::TOP_P
}

fn default_timeout_secs() -> u64 {
    defaults::TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    defaults::MAX_RETRIES
}

impl ModelProfile {
    /// Create a profile with default sampling, timeout and retry settings.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            temperature: defaults::TEMPERATURE,
            top_p: defaults::TOP_P,
            timeout_secs: defaults::TIMEOUT_SECS,
            max_retries: defaults::MAX_RETRIES,
            description: String::new(),
        }
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Get the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    models: Vec<ModelProfile>,
}

/// Ordered, read-only set of model profiles.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    profiles: Vec<ModelProfile>,
}

impl ModelCatalog {
    /// Build a catalog, rejecting duplicate keys.
    pub fn new(profiles: Vec<ModelProfile>) -> Result<Self, EvalError> {
        for (i, profile) in profiles.iter().enumerate() {
            if profiles[..i].iter().any(|p| p.key == profile.key) {
                return Err(EvalError::Config(format!(
                    "duplicate model key '{}'",
                    profile.key
                )));
            }
        }
        Ok(Self { profiles })
    }

    /// The models evaluated by default.
    pub fn builtin() -> Self {
        let profiles = vec![
            ModelProfile::new("gemma3_1b", "gemma3:1b")
                .with_description("gemma3 1b - Simple, lightweight and fast"),
            ModelProfile::new("qwen3_1_7b", "qwen3:1.7b")
                .with_description("qwen3 1.7b - Superior human preference alignment"),
            ModelProfile::new("qwen3_0_6b", "qwen3:0.6b")
                .with_description("qwen3 0.6b - Superior human preference alignment"),
            ModelProfile::new("qwen3_0_6b_mod", "goekdenizguelmez/JOSIEFIED-Qwen3:0.6b")
                .with_description("qwen3 0.6b JOSIEFIED - Modified version of Qwen3 0.6b"),
        ];
        Self { profiles }
    }

    /// Parse a catalog from TOML (`[[models]]` tables, declaration order kept).
    pub fn from_toml_str(content: &str) -> Result<Self, EvalError> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| EvalError::Config(e.to_string()))?;
        if file.models.is_empty() {
            return Err(EvalError::Config("catalog defines no models".to_string()));
        }
        Self::new(file.models)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EvalError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EvalError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn get(&self, key: &str) -> Result<&ModelProfile, EvalError> {
        self.profiles
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| EvalError::UnknownModel(key.to_string()))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(
            catalog.keys(),
            vec!["gemma3_1b", "qwen3_1_7b", "qwen3_0_6b", "qwen3_0_6b_mod"]
        );

        let profile = catalog.get("qwen3_1_7b").unwrap();
        assert_eq!(profile.name, "qwen3:1.7b");
        assert_eq!(profile.temperature, 0.1);
        assert_eq!(profile.top_p, 0.95);
        assert_eq!(profile.timeout(), Duration::from_secs(10));
        assert_eq!(profile.max_retries, 3);
    }

    #[test]
    fn test_unknown_key() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(
            catalog.get("llama_70b"),
            Err(EvalError::UnknownModel("llama_70b".to_string()))
        );
    }

    #[test]
    fn test_from_toml_keeps_order_and_defaults() {
        let toml = r#"
            [[models]]
            key = "phi"
            name = "phi4-mini"
            timeout_secs = 30

            [[models]]
            key = "llama"
            name = "llama3.2:1b"
            temperature = 0.0
            description = "baseline"
        "#;
        let catalog = ModelCatalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.keys(), vec!["phi", "llama"]);

        let phi = catalog.get("phi").unwrap();
        assert_eq!(phi.timeout_secs, 30);
        assert_eq!(phi.max_retries, defaults::MAX_RETRIES);

        let llama = catalog.get("llama").unwrap();
        assert_eq!(llama.temperature, 0.0);
        assert_eq!(llama.top_p, defaults::TOP_P);
        assert_eq!(llama.description, "baseline");
    }

    #[test]
    fn test_from_toml_rejects_duplicates_and_empty() {
        let dup = r#"
            [[models]]
            key = "a"
            name = "x"
            [[models]]
            key = "a"
            name = "y"
        "#;
        assert!(matches!(
            ModelCatalog::from_toml_str(dup),
            Err(EvalError::Config(_))
        ));
        assert!(matches!(
            ModelCatalog::from_toml_str(""),
            Err(EvalError::Config(_))
        ));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.toml");
        std::fs::write(&path, "[[models]]\nkey = \"m\"\nname = \"m:1b\"\n").unwrap();

        let catalog = ModelCatalog::from_toml_file(&path).unwrap();
        assert_eq!(catalog.len(), 1);

        let missing = ModelCatalog::from_toml_file(dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(EvalError::Config(_))));
    }
}
