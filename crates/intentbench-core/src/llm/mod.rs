//! Inference backend abstraction.

pub mod backend;

pub use backend::{GenerationRequest, InferenceBackend};
