//! Accuracy scoring of parsed responses.
//!
//! Entity values compare by exact equality: no case folding, trimming or
//! fuzzy matching. A model that answers `"anna"` for `"Anna"` is scored wrong.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use intentbench_core::{EntityAccuracy, IncorrectValue, Intent, IntentAccuracy, IntentVerdict};

/// Compare an expected intent with the parsed one.
pub fn classify(expected: Intent, actual: Intent) -> IntentVerdict {
    let kind = if expected == actual {
        IntentAccuracy::Exact
    } else if expected.is_unknown() {
        IntentAccuracy::Better
    } else if actual.is_unknown() {
        IntentAccuracy::Worse
    } else {
        IntentAccuracy::Different
    };
    IntentVerdict {
        is_match: kind == IntentAccuracy::Exact,
        kind,
    }
}

/// Diff the expected entity map against the extracted one.
///
/// Null values in `actual` count as not extracted. An expected null can
/// therefore never be correct. Extra keys are reported but do not lower the
/// score.
pub fn score_entities(
    expected: &BTreeMap<String, Option<String>>,
    actual: &Map<String, Value>,
) -> EntityAccuracy {
    let extracted: BTreeMap<&str, &Value> = actual
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.as_str(), value))
        .collect();

    let mut correct = Vec::new();
    let mut missing = Vec::new();
    let mut incorrect = Vec::new();

    for (entity, expected_value) in expected {
        match extracted.get(entity.as_str()) {
            Some(value)
                if expected_value.is_some() && value.as_str() == expected_value.as_deref() =>
            {
                correct.push(entity.clone());
            }
            Some(value) => incorrect.push(IncorrectValue {
                entity: entity.clone(),
                expected: expected_value.clone(),
                actual: (*value).clone(),
            }),
            None => missing.push(entity.clone()),
        }
    }

    let extra: Vec<String> = extracted
        .keys()
        .filter(|key| !expected.contains_key(**key))
        .map(|key| key.to_string())
        .collect();

    let score = if expected.is_empty() {
        if extracted.is_empty() {
            1.0
        } else {
            0.0
        }
    } else {
        correct.len() as f64 / expected.len() as f64
    };

    EntityAccuracy {
        correct,
        missing,
        extra,
        incorrect,
        score,
    }
}
