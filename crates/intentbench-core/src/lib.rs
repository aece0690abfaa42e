//! Core traits and types for IntentBench.
//!
//! This crate defines the vocabulary shared by the evaluation engine: the closed
//! intent set, test cases and model profiles, the records produced by a run, the
//! error kinds, and the backend abstraction the inference client talks to.

pub mod catalog;
pub mod config;
pub mod corpus;
pub mod error;
pub mod intent;
pub mod llm;
pub mod outcome;
pub mod prompt;
pub mod report;
pub mod summary;

pub use catalog::{ModelCatalog, ModelProfile};
pub use corpus::{CorpusOverview, TestCase, TestCorpus};
pub use error::{EvalError, InferenceError, ValidationError};
pub use intent::{Intent, IntentAccuracy, IntentVerdict};
pub use llm::backend::{GenerationRequest, InferenceBackend};
pub use outcome::{
    CaseOutcome, EntityAccuracy, IncorrectValue, ResourceDelta, ResourceSample, ResourceSampler,
};
pub use prompt::{PromptLibrary, PromptVariant};
pub use report::{
    BalancedPick, ComparativeReport, ConfidenceRank, GroupAnalysis, GroupScore, OverallRank,
    PerformanceRow, Rankings, ReportSummary, SpeedRank,
};
pub use summary::{Distribution, GroupStats, ModelSummary, RunKey};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::config::{criteria, defaults, endpoints, env_vars, normalize_ollama_endpoint};
    pub use crate::error::{EvalError, InferenceError, ValidationError};
    pub use crate::intent::{Intent, IntentAccuracy, IntentVerdict};
    pub use crate::llm::backend::{GenerationRequest, InferenceBackend};
    pub use crate::{
        CaseOutcome, ComparativeReport, ModelCatalog, ModelProfile, ModelSummary, PromptLibrary,
        TestCase, TestCorpus,
    };
}
