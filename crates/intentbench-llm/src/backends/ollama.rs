//! Ollama backend implementation.
//!
//! Ollama is a local model runner. This backend talks to its native API:
//! `GET /api/tags` for the installed models and `POST /api/generate` for
//! non-streaming completions.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use intentbench_core::config::{self, defaults, endpoints, normalize_ollama_endpoint};
use intentbench_core::{GenerationRequest, InferenceBackend, InferenceError};

/// Ollama configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OllamaConfig {
    /// Ollama endpoint (default: http://localhost:11434)
    pub endpoint: String,

    /// Connection timeout in seconds. Request duration is bounded by the
    /// client's timeout policy, not here.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    defaults::CONNECT_TIMEOUT_SECS
}

impl OllamaConfig {
    pub fn new() -> Self {
        Self {
            endpoint: endpoints::OLLAMA.to_string(),
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
        }
    }

    /// Endpoint from `INTENTBENCH_OLLAMA_ENDPOINT`, or the local default.
    pub fn from_env() -> Self {
        Self::new().with_endpoint(config::ollama_endpoint())
    }

    /// Set a custom endpoint. A `/v1` suffix is stripped.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = normalize_ollama_endpoint(endpoint.into());
        self
    }

    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `GET /api/tags` response. Entries carry `name`, `model`, or both.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

impl TagsResponse {
    fn into_identifiers(self) -> Vec<String> {
        self.models
            .into_iter()
            .filter_map(|entry| entry.name.or(entry.model))
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct UnloadBody<'a> {
    model: &'a str,
    keep_alive: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Ollama model server.
pub struct OllamaBackend {
    config: OllamaConfig,
    client: Client,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Result<Self, InferenceError> {
        tracing::debug!("Creating Ollama backend with endpoint: {}", config.endpoint);

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| InferenceError::BackendUnavailable(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    async fn post_generate<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<reqwest::Response, InferenceError> {
        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(body)
            .send()
            .await
            .map_err(request_error)?;
        ensure_success(response).await
    }
}

fn request_error(err: reqwest::Error) -> InferenceError {
    if err.is_connect() {
        InferenceError::BackendUnavailable(err.to_string())
    } else {
        InferenceError::Backend {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, InferenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), text))
}

/// Error for a non-2xx answer; the message comes from Ollama's `{"error": ...}`
/// body when there is one.
fn status_error(status: u16, body: String) -> InferenceError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    InferenceError::from_status(status, message)
}

#[async_trait::async_trait]
impl InferenceBackend for OllamaBackend {
    fn backend_id(&self) -> &str {
        "ollama"
    }

    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(request_error)?;
        let response = ensure_success(response).await?;
        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;
        Ok(tags.into_identifiers())
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, InferenceError> {
        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            format: request.format.as_deref(),
            options: SamplingOptions {
                temperature: request.temperature,
                top_p: request.top_p,
            },
        };
        let response = self.post_generate(&body).await?;
        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;
        Ok(generated.response)
    }

    async fn unload_model(&self, model: &str) -> Result<(), InferenceError> {
        self.post_generate(&UnloadBody {
            model,
            keep_alive: 0,
        })
        .await?;
        tracing::debug!(model = %model, "Model unloaded");
        Ok(())
    }
}
