//! Error types shared across the workspace.
//!
//! Per-case failures (`InferenceError`, `ValidationError`) are recorded into the
//! case outcome and persisted with it, so both are serialisable. `EvalError`
//! covers the conditions that stop a suite or an analysis before it starts.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single inference call.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum InferenceError {
    /// Backend could not be reached at all.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The attempt did not finish within the time limit.
    #[error("Request timed out after {:.1}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Error reported by the backend itself. Retried.
    #[error("Backend error{}: {message}", .status.map(|s| format!(" {}", s)).unwrap_or_default())]
    Backend {
        status: Option<u16>,
        message: String,
    },

    /// The backend refused the request itself (bad request, unknown model).
    /// Not retried: the same request fails the same way.
    #[error("Backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Every attempt failed with a retryable error.
    #[error("Failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    /// Backend answered with something that is not a completion.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// The task driving the backend call died before answering.
    #[error("Inference task failed: {0}")]
    TaskFailed(String),
}

impl InferenceError {
    /// Classify an HTTP error status: 429 and 5xx are transient, any other
    /// status is a rejection.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 429 || status >= 500 {
            InferenceError::Backend {
                status: Some(status),
                message,
            }
        } else {
            InferenceError::Rejected { status, message }
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, InferenceError::Backend { .. })
    }

    /// Short kind tag used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::BackendUnavailable(_) => "backend_unavailable",
            InferenceError::Timeout(_) => "timeout",
            InferenceError::Backend { .. } => "transient_backend_error",
            InferenceError::Rejected { .. } => "request_rejected",
            InferenceError::RetriesExhausted { .. } => "retries_exhausted",
            InferenceError::MalformedResponse(_) => "malformed_response",
            InferenceError::TaskFailed(_) => "task_failed",
        }
    }
}

/// Why a model response was rejected.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("No JSON found in output")]
    NoJsonFound,

    #[error("Invalid JSON: {0}")]
    MalformedJson(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    #[error("Confidence {0} is not a number within [0.0, 1.0]")]
    ConfidenceOutOfRange(serde_json::Value),

    #[error("Entities must be a key-value map")]
    EntitiesNotAMap,
}

impl ValidationError {
    /// Short kind tag used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::NoJsonFound => "no_json_found",
            ValidationError::MalformedJson(_) => "malformed_json",
            ValidationError::MissingFields(_) => "missing_fields",
            ValidationError::InvalidIntent(_) => "invalid_intent",
            ValidationError::ConfidenceOutOfRange(_) => "confidence_out_of_range",
            ValidationError::EntitiesNotAMap => "entities_not_a_map",
        }
    }
}

/// Conditions that prevent a suite, summary or analysis from being produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Test corpus is empty")]
    EmptyCorpus,

    #[error("No outcomes to summarize")]
    NoOutcomes,

    #[error("Model {model} is not available: {reason}")]
    ModelUnavailable { model: String, reason: String },

    #[error("Unknown prompt variant: {0}")]
    UnknownPromptVariant(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Nothing to analyze: no model summaries were provided")]
    NothingToAnalyze,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EvalError {
    /// Whether the error means a suite could not start (as opposed to a later stage).
    pub fn is_suite_precondition(&self) -> bool {
        matches!(
            self,
            EvalError::EmptyCorpus
                | EvalError::ModelUnavailable { .. }
                | EvalError::UnknownPromptVariant(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_backend_errors_are_transient() {
        assert!(InferenceError::Backend {
            status: Some(500),
            message: "boom".to_string()
        }
        .is_transient());
        assert!(!InferenceError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(!InferenceError::MalformedResponse("x".to_string()).is_transient());
        assert!(!InferenceError::BackendUnavailable("down".to_string()).is_transient());
    }

    #[test]
    fn test_status_classification() {
        assert!(InferenceError::from_status(503, "loading").is_transient());
        assert!(InferenceError::from_status(500, "boom").is_transient());
        assert!(InferenceError::from_status(429, "slow down").is_transient());

        let not_found = InferenceError::from_status(404, "model 'x' not found");
        assert!(!not_found.is_transient());
        assert_eq!(not_found.kind(), "request_rejected");
        assert_eq!(
            not_found.to_string(),
            "Backend rejected request (404): model 'x' not found"
        );
        assert!(!InferenceError::from_status(400, "bad").is_transient());
    }

    #[test]
    fn test_timeout_message() {
        let err = InferenceError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Request timed out after 10.0s");
    }

    #[test]
    fn test_backend_message_with_and_without_status() {
        let with = InferenceError::Backend {
            status: Some(404),
            message: "model not found".to_string(),
        };
        assert_eq!(with.to_string(), "Backend error 404: model not found");

        let without = InferenceError::Backend {
            status: None,
            message: "busy".to_string(),
        };
        assert_eq!(without.to_string(), "Backend error: busy");
    }

    #[test]
    fn test_missing_fields_lists_every_field() {
        let err = ValidationError::MissingFields(vec![
            "entities".to_string(),
            "confidence".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required fields: entities, confidence"
        );
    }

    #[test]
    fn test_errors_serialize_with_kind_tag() {
        let err = ValidationError::InvalidIntent("greeting".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "invalid_intent");
        assert_eq!(json["detail"], "greeting");

        let back: ValidationError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_suite_preconditions() {
        assert!(EvalError::EmptyCorpus.is_suite_precondition());
        assert!(EvalError::ModelUnavailable {
            model: "m".to_string(),
            reason: "down".to_string()
        }
        .is_suite_precondition());
        assert!(!EvalError::NothingToAnalyze.is_suite_precondition());
    }
}
