//! Model-serving backends.

#[cfg(feature = "ollama")]
pub mod ollama;
