//! Inference backends for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use intentbench_core::{GenerationRequest, InferenceBackend, InferenceError};

type Responder = Box<dyn Fn(&GenerationRequest) -> Result<String, InferenceError> + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Backend that answers from a script, then from a responder function.
///
/// Every request is recorded so tests can assert on prompts and parameters.
pub struct ScriptedBackend {
    models: Result<Vec<String>, InferenceError>,
    script: Mutex<VecDeque<Result<String, InferenceError>>>,
    responder: Responder,
    requests: Mutex<Vec<GenerationRequest>>,
    unloaded: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    /// Always answer with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_fn(move |_| Ok(text.clone()))
    }

    /// Answer with each entry of `replies` in turn; afterwards fail with a
    /// non-transient error.
    pub fn sequence(replies: Vec<Result<String, InferenceError>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            ..Self::from_fn(|_| {
                Err(InferenceError::MalformedResponse(
                    "script exhausted".to_string(),
                ))
            })
        }
    }

    /// Answer every request through `responder`.
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<String, InferenceError> + Send + Sync + 'static,
    {
        Self {
            models: Ok(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            unloaded: Mutex::new(Vec::new()),
        }
    }

    /// Models reported by `list_models`.
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = Ok(models.into_iter().map(Into::into).collect());
        self
    }

    /// Make `list_models` fail.
    pub fn with_list_error(mut self, error: InferenceError) -> Self {
        self.models = Err(error);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn unloaded(&self) -> Vec<String> {
        lock(&self.unloaded).clone()
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    fn backend_id(&self) -> &str {
        "scripted"
    }

    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        self.models.clone()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, InferenceError> {
        lock(&self.requests).push(request.clone());
        let scripted = lock(&self.script).pop_front();
        match scripted {
            Some(reply) => reply,
            None => (self.responder)(&request),
        }
    }

    async fn unload_model(&self, model: &str) -> Result<(), InferenceError> {
        lock(&self.unloaded).push(model.to_string());
        Ok(())
    }
}

/// Backend whose completions never finish.
#[derive(Default)]
pub struct HangingBackend {
    started: AtomicUsize,
}

impl HangingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of generate calls that were started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for HangingBackend {
    fn backend_id(&self) -> &str {
        "hanging"
    }

    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        Ok(Vec::new())
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<String, InferenceError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Err(InferenceError::TaskFailed("unreachable".to_string()))
    }
}

/// Backend that cannot be reached at all.
#[derive(Default)]
pub struct UnreachableBackend;

#[async_trait]
impl InferenceBackend for UnreachableBackend {
    fn backend_id(&self) -> &str {
        "unreachable"
    }

    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        Err(InferenceError::BackendUnavailable(
            "connection refused".to_string(),
        ))
    }

    async fn generate(&self, _request: GenerationRequest) -> Result<String, InferenceError> {
        Err(InferenceError::BackendUnavailable(
            "connection refused".to_string(),
        ))
    }
}
