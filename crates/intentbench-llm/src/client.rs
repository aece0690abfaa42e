//! Resilient inference client.
//!
//! Two independent policies wrap every backend call:
//! - [`TimeoutPolicy`] bounds one attempt. The backend call runs on its own
//!   task; when the timer fires first the task is detached, not killed, so the
//!   backend may keep working on an abandoned request.
//! - [`RetryPolicy`] repeats attempts that failed with a transient backend
//!   error, sleeping `base * 2^attempt` between them. Timeouts and malformed
//!   responses are returned immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use intentbench_core::config::{backoff_delay, defaults};
use intentbench_core::{GenerationRequest, InferenceBackend, InferenceError, ModelProfile};

/// Bounds the wall-clock time of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    limit: Duration,
}

impl TimeoutPolicy {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Run `attempt` on a separate task and wait at most `limit` for it.
    pub async fn run<F, T>(&self, attempt: F) -> Result<T, InferenceError>
    where
        F: Future<Output = Result<T, InferenceError>> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::spawn(attempt);
        match tokio::time::timeout(self.limit, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(InferenceError::TaskFailed(join_error.to_string())),
            Err(_) => {
                // The JoinHandle was dropped with the timeout future: the task
                // is detached and left to finish on its own.
                warn!(
                    timeout_secs = self.limit.as_secs_f64(),
                    "Inference attempt timed out, abandoning backend call"
                );
                Err(InferenceError::Timeout(self.limit))
            }
        }
    }
}

/// Repeats attempts that failed with a transient error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first attempt; zero is treated as one.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay slept after failed attempt `attempt` (0-indexed).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        backoff_delay(self.base_delay, attempt)
    }

    /// Call `attempt_fn(i)` for `i = 0, 1, ...` until it succeeds, fails with a
    /// non-transient error, or the attempts run out.
    pub async fn run<F, Fut, T>(&self, mut attempt_fn: F) -> Result<T, InferenceError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, InferenceError>>,
    {
        let mut attempt = 0;
        loop {
            let err = match attempt_fn(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() => err,
                Err(err) => return Err(err),
            };

            if attempt + 1 >= self.max_attempts {
                return Err(InferenceError::RetriesExhausted {
                    attempts: self.max_attempts,
                    last: err.to_string(),
                });
            }

            let delay = self.delay_after(attempt);
            warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Transient backend error, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Outcome of the advisory model-list check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelAvailability {
    Listed,
    NotListed { available: Vec<String> },
    /// The backend could not be asked.
    Unknown(String),
}

impl ModelAvailability {
    pub fn is_listed(&self) -> bool {
        matches!(self, ModelAvailability::Listed)
    }
}

/// Client for one model on one backend.
pub struct InferenceClient {
    backend: Arc<dyn InferenceBackend>,
    profile: ModelProfile,
    retry_base_delay: Duration,
    format: Option<String>,
}

impl InferenceClient {
    pub fn new(backend: Arc<dyn InferenceBackend>, profile: &ModelProfile) -> Self {
        Self {
            backend,
            profile: profile.clone(),
            retry_base_delay: defaults::RETRY_BASE_DELAY,
            format: None,
        }
    }

    /// Base of the exponential backoff between retries.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Ask the backend for structured output (e.g. `"json"`).
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn profile(&self) -> &ModelProfile {
        &self.profile
    }

    pub fn backend_id(&self) -> &str {
        self.backend.backend_id()
    }

    /// Generate with the profile's timeout and retry count.
    pub async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        self.generate_with(prompt, self.profile.timeout(), self.profile.max_retries)
            .await
    }

    /// Generate with an explicit per-attempt timeout and attempt count.
    pub async fn generate_with(
        &self,
        prompt: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<String, InferenceError> {
        let timeout = TimeoutPolicy::new(timeout);
        let retry = RetryPolicy::new(max_retries, self.retry_base_delay);
        let mut request = GenerationRequest::for_profile(&self.profile, prompt);
        request.format = self.format.clone();

        retry
            .run(|attempt| {
                let backend = Arc::clone(&self.backend);
                let request = request.clone();
                debug!(model = %self.profile.name, attempt, "Sending generation request");
                async move {
                    let started = Instant::now();
                    let result = timeout
                        .run(async move { backend.generate(request).await })
                        .await;
                    debug!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        ok = result.is_ok(),
                        "Generation attempt finished"
                    );
                    result
                }
            })
            .await
    }

    /// Check whether the backend lists this model. Advisory only: a negative or
    /// unknown answer is logged and the caller proceeds anyway.
    pub async fn check_model_listed(&self) -> ModelAvailability {
        let name = self.profile.name.as_str();
        let availability = match self.backend.list_models().await {
            Ok(models) => {
                if models.iter().any(|m| model_matches(m, name)) {
                    ModelAvailability::Listed
                } else {
                    ModelAvailability::NotListed { available: models }
                }
            }
            Err(err) => ModelAvailability::Unknown(err.to_string()),
        };

        match &availability {
            ModelAvailability::Listed => {
                info!(model = %name, backend = self.backend_id(), "Model available");
            }
            ModelAvailability::NotListed { available } => {
                warn!(
                    model = %name,
                    available = ?available,
                    "Model not listed by backend, proceeding anyway"
                );
            }
            ModelAvailability::Unknown(reason) => {
                warn!(
                    model = %name,
                    %reason,
                    "Could not check model availability, proceeding without validation"
                );
            }
        }
        availability
    }

    /// Single short generation confirming the model can answer at all.
    pub async fn probe(&self) -> Result<(), InferenceError> {
        self.generate_with(defaults::PROBE_PROMPT, self.profile.timeout(), 1)
            .await
            .map(|_| ())
    }

    /// Release the model's resources on the backend.
    pub async fn unload(&self) -> Result<(), InferenceError> {
        info!(model = %self.profile.name, "Unloading model");
        self.backend.unload_model(&self.profile.name).await
    }
}

fn model_matches(listed: &str, wanted: &str) -> bool {
    listed == wanted
        || listed.strip_suffix(":latest") == Some(wanted)
        || wanted.strip_suffix(":latest") == Some(listed)
}
