//! The two operations the engine needs from a model-serving backend.
//!
//! Backends normalise whatever their wire format looks like at this boundary:
//! `list_models` always yields plain identifiers and `generate` plain text.

use serde::{Deserialize, Serialize};

use crate::catalog::ModelProfile;
use crate::error::InferenceError;

/// One completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    /// Structured output hint (e.g. `"json"`), if the backend supports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl GenerationRequest {
    /// Build a request using the sampling parameters of `profile`.
    pub fn for_profile(profile: &ModelProfile, prompt: impl Into<String>) -> Self {
        Self {
            model: profile.name.clone(),
            prompt: prompt.into(),
            temperature: profile.temperature,
            top_p: profile.top_p,
            format: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// A network-reachable model server.
#[async_trait::async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Identifier of the backend type (e.g. `"ollama"`).
    fn backend_id(&self) -> &str;

    /// Identifiers of the models the backend can serve.
    async fn list_models(&self) -> Result<Vec<String>, InferenceError>;

    /// Generate a completion and return its text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, InferenceError>;

    /// Release a model's resources on the backend. Default: nothing to release.
    async fn unload_model(&self, _model: &str) -> Result<(), InferenceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_takes_profile_parameters() {
        let profile = ModelProfile::new("qwen3_0_6b", "qwen3:0.6b")
            .with_sampling(0.2, 0.9)
            .with_description("small");
        let request = GenerationRequest::for_profile(&profile, "hello").with_format("json");

        assert_eq!(request.model, "qwen3:0.6b");
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.top_p, 0.9);
        assert_eq!(request.format.as_deref(), Some("json"));
    }
}
