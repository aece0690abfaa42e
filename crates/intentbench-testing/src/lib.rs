//! Testing utilities for IntentBench
//!
//! This crate provides test doubles for the evaluation engine:
//! - Scripted, hanging and unreachable inference backends
//! - A fixed resource sampler
//! - Response, corpus and summary fixtures

pub mod backends;
pub mod fixtures;
pub mod sampler;

pub use backends::{HangingBackend, ScriptedBackend, UnreachableBackend};
pub use fixtures::{raw_response, small_corpus, summary_fixture};
pub use sampler::FixedSampler;
