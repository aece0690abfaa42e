//! Inference client and model-serving backends.
//!
//! `InferenceClient` wraps any `InferenceBackend` with a per-attempt timeout,
//! a retry policy for transient backend errors and an advisory availability
//! check. Backends live under [`backends`].

pub mod backends;
pub mod client;

pub use client::{InferenceClient, ModelAvailability, RetryPolicy, TimeoutPolicy};

#[cfg(feature = "ollama")]
pub use backends::ollama::{OllamaBackend, OllamaConfig};
