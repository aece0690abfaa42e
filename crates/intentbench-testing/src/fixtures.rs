//! Response, corpus and summary fixtures.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use intentbench_core::{Distribution, Intent, ModelSummary, TestCase, TestCorpus};

/// Model output wrapping a schema-shaped JSON object in chatter.
pub fn raw_response(intent: &str, entities: Value, confidence: f64) -> String {
    let body = json!({
        "intent": intent,
        "entities": entities,
        "confidence": confidence,
        "missing_info": [],
        "suggested_question": null,
    });
    format!("Sure! Here is the parse:\n{}\nLet me know if you need more.", body)
}

/// Four cases covering English, German and an unknown-intent edge case.
pub fn small_corpus() -> TestCorpus {
    TestCorpus::from_cases(vec![
        TestCase::new(
            "Anna can't work Friday",
            Intent::EmergencyReplacement,
            &[("employee_name", "Anna"), ("shift_day", "Friday")],
            "English",
            "Easy",
            "emergency",
        ),
        TestCase::new(
            "Show me this week's schedule",
            Intent::ViewSchedule,
            &[("time_period", "this_week")],
            "English",
            "Medium",
            "view",
        ),
        TestCase::new(
            "Sarah ist krank",
            Intent::EmergencyReplacement,
            &[("employee_name", "Sarah")],
            "German",
            "Medium",
            "emergency",
        ),
        TestCase::new("Hello there", Intent::Unknown, &[], "English", "Hard", "edge"),
    ])
}

/// Summary with the given headline rates and an optional mean inference time.
///
/// Group breakdowns are empty and confidence is undefined; tests set what they
/// need on the returned value.
pub fn summary_fixture(
    model: &str,
    variant: &str,
    intent_accuracy_rate: f64,
    json_validity_rate: f64,
    mean_time_secs: Option<f64>,
) -> ModelSummary {
    ModelSummary {
        model_name: model.to_string(),
        model_description: String::new(),
        prompt_variant: variant.to_string(),
        total_cases: 10,
        success_rate: 1.0,
        json_validity_rate,
        intent_accuracy_rate,
        mean_entity_accuracy: None,
        timing: mean_time_secs.map(|t| Distribution {
            mean: t,
            median: t,
            min: t,
            max: t,
        }),
        total_inference_secs: mean_time_secs.map(|t| t * 10.0).unwrap_or(0.0),
        confidence: None,
        by_language: BTreeMap::new(),
        by_difficulty: BTreeMap::new(),
        by_category: BTreeMap::new(),
        failure_kinds: BTreeMap::new(),
    }
}
