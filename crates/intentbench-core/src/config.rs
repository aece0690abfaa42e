//! Shared configuration constants and environment lookups.
//!
//! Every crate reads its defaults from here so that endpoints, timeouts and the
//! evaluation criteria are defined once.

use std::path::PathBuf;
use std::time::Duration;

/// Default endpoint constants.
pub mod endpoints {
    pub const OLLAMA: &str = "http://localhost:11434";
}

/// Environment variable names.
pub mod env_vars {
    pub const OLLAMA_ENDPOINT: &str = "INTENTBENCH_OLLAMA_ENDPOINT";
    pub const RESULTS_DIR: &str = "INTENTBENCH_RESULTS_DIR";
    pub const MODELS_FILE: &str = "INTENTBENCH_MODELS_FILE";
    pub const LOG_JSON: &str = "INTENTBENCH_LOG_JSON";
}

/// Run defaults.
pub mod defaults {
    use std::time::Duration;

    /// Per-attempt inference timeout in seconds.
    pub const TIMEOUT_SECS: u64 = 10;
    /// Attempts made for transient backend errors.
    pub const MAX_RETRIES: u32 = 3;
    pub const TEMPERATURE: f32 = 0.1;
    pub const TOP_P: f32 = 0.95;
    /// Attempt `i` waits `RETRY_BASE_DELAY * 2^i` before the next one.
    pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
    /// Connect timeout for HTTP backends.
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
    pub const RESULTS_DIR: &str = "results";
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
    pub const PROMPT_VARIANT: &str = "production";
    /// Prompt sent once before a suite to confirm the model answers at all.
    pub const PROBE_PROMPT: &str = "Test";
}

/// Evaluation criteria applied to every model response.
pub mod criteria {
    /// Top-level fields a response must carry.
    pub const REQUIRED_FIELDS: [&str; 3] = ["intent", "entities", "confidence"];

    /// The entity slot vocabulary.
    pub const ENTITY_FIELDS: [&str; 7] = [
        "employee_name",
        "shift_day",
        "shift_time",
        "shift_name",
        "optimization_preference",
        "time_period",
        "urgency",
    ];

    /// Inclusive confidence bounds.
    pub const CONFIDENCE_RANGE: (f64, f64) = (0.0, 1.0);
}

/// Ollama endpoint from the environment, or the local default.
pub fn ollama_endpoint() -> String {
    std::env::var(env_vars::OLLAMA_ENDPOINT)
        .map(normalize_ollama_endpoint)
        .unwrap_or_else(|_| endpoints::OLLAMA.to_string())
}

/// Results directory from the environment, or `./results`.
pub fn results_dir() -> PathBuf {
    std::env::var(env_vars::RESULTS_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(defaults::RESULTS_DIR))
}

/// Model catalog override file, if configured.
pub fn models_file() -> Option<PathBuf> {
    std::env::var(env_vars::MODELS_FILE).ok().map(PathBuf::from)
}

/// Whether logs should be emitted as JSON.
pub fn json_logging() -> bool {
    std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

/// Backoff before retrying after attempt `attempt` (0-indexed).
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}

/// Normalize an Ollama endpoint (drop the `/v1` suffix and trailing slashes).
///
/// Ollama is driven through its native API, which has no `/v1` prefix.
pub fn normalize_ollama_endpoint(endpoint: String) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    trimmed
        .strip_suffix("/v1")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}
