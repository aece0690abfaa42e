//! Per-case records produced by a suite run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InferenceError, ValidationError};
use crate::intent::{Intent, IntentAccuracy};

/// An expected entity that was extracted with a different value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncorrectValue {
    pub entity: String,
    /// `None` when the case expected a null.
    pub expected: Option<String>,
    pub actual: Value,
}

/// Entity-level comparison of one parsed response against its test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAccuracy {
    pub correct: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
    pub incorrect: Vec<IncorrectValue>,
    /// Fraction of expected entities extracted with the exact value.
    pub score: f64,
}

/// Process resource reading at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub cpu_percent: f32,
    pub memory_percent: f32,
}

/// Source of process resource readings.
///
/// Sampling is taken around each inference call; implementations must be cheap
/// enough not to distort the timing they bracket.
pub trait ResourceSampler: Send {
    fn sample(&mut self) -> ResourceSample;
}

/// Resource increase observed across one inference call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDelta {
    pub cpu_percent: f32,
    pub memory_percent: f32,
}

impl ResourceDelta {
    /// Difference `after - before`, floored at zero per field.
    pub fn between(before: ResourceSample, after: ResourceSample) -> Self {
        Self {
            cpu_percent: (after.cpu_percent - before.cpu_percent).max(0.0),
            memory_percent: (after.memory_percent - before.memory_percent).max(0.0),
        }
    }
}

/// Full record of one test case run against one model and prompt variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub model_name: String,
    pub prompt_variant: String,
    pub case_index: usize,

    pub input: String,
    pub expected_intent: Intent,
    pub expected_entities: BTreeMap<String, Option<String>>,
    pub language: String,
    pub difficulty: String,
    pub category: String,

    /// The model answered (regardless of answer quality).
    pub success: bool,
    pub inference_time_secs: f64,
    pub raw_output: Option<String>,

    pub json_valid: bool,
    pub parsed_json: Option<Value>,
    pub validation_error: Option<ValidationError>,

    pub intent_match: bool,
    pub actual_intent: Option<Intent>,
    pub intent_accuracy: Option<IntentAccuracy>,
    pub entity_accuracy: Option<EntityAccuracy>,
    pub confidence: Option<f64>,

    pub resources: ResourceDelta,
    pub error: Option<InferenceError>,
}

impl CaseOutcome {
    /// Human-readable one-word verdict for progress output.
    pub fn verdict(&self) -> &'static str {
        if !self.success {
            "failed"
        } else if !self.json_valid {
            "invalid_json"
        } else if self.intent_match {
            "correct"
        } else {
            "wrong_intent"
        }
    }

    /// Kind tag of the error that stopped the case from scoring.
    pub fn failure_kind(&self) -> Option<&'static str> {
        match (&self.error, &self.validation_error) {
            (Some(err), _) => Some(err.kind()),
            (None, Some(err)) => Some(err.kind()),
            (None, None) => None,
        }
    }

    /// Reason the case did not score, if it did not.
    pub fn failure_reason(&self) -> Option<String> {
        if let Some(err) = &self.error {
            return Some(err.to_string());
        }
        self.validation_error.as_ref().map(|e| e.to_string())
    }
}
