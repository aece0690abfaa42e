//! JSON extraction and schema validation of model output.
//!
//! Checks run in a fixed order and stop at the first failure, except that all
//! missing required fields are collected before failing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use intentbench_core::config::criteria;
use intentbench_core::{Intent, ValidationError};

/// Greedy brace block: first `{` through last `}`, newlines included.
static JSON_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{.*\}").unwrap_or_else(|e| panic!("invalid JSON block pattern: {}", e))
});

/// A response that passed every schema check.
///
/// Wraps the parsed object unchanged; accessors read the checked fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    object: Map<String, Value>,
}

impl ParsedResponse {
    pub fn intent(&self) -> Intent {
        self.object
            .get("intent")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(Intent::Unknown)
    }

    pub fn entities(&self) -> &Map<String, Value> {
        static EMPTY: Lazy<Map<String, Value>> = Lazy::new(Map::new);
        self.object
            .get("entities")
            .and_then(Value::as_object)
            .unwrap_or(&*EMPTY)
    }

    pub fn confidence(&self) -> Option<f64> {
        self.object.get("confidence").and_then(Value::as_f64)
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.object
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.object)
    }
}

/// A rejected response: the reason, plus whatever parsed before the failing check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub error: ValidationError,
    pub partial: Option<Value>,
}

impl ValidationFailure {
    fn without_json(error: ValidationError) -> Self {
        Self {
            error,
            partial: None,
        }
    }

    fn with_partial(error: ValidationError, object: Map<String, Value>) -> Self {
        Self {
            error,
            partial: Some(Value::Object(object)),
        }
    }
}

/// Extract the JSON object from `raw` and check it against the response schema.
pub fn validate(raw: &str) -> Result<ParsedResponse, ValidationFailure> {
    let block = JSON_BLOCK
        .find(raw)
        .ok_or_else(|| ValidationFailure::without_json(ValidationError::NoJsonFound))?;

    let value: Value = serde_json::from_str(block.as_str()).map_err(|e| {
        ValidationFailure::without_json(ValidationError::MalformedJson(e.to_string()))
    })?;
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(ValidationFailure {
                error: ValidationError::MalformedJson("top-level value is not an object".into()),
                partial: Some(other),
            })
        }
    };

    let missing: Vec<String> = criteria::REQUIRED_FIELDS
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationFailure::with_partial(
            ValidationError::MissingFields(missing),
            object,
        ));
    }

    if let Some(error) = check_intent(&object["intent"]) {
        return Err(ValidationFailure::with_partial(error, object));
    }

    if let Some(error) = check_confidence(&object["confidence"]) {
        return Err(ValidationFailure::with_partial(error, object));
    }

    if !object["entities"].is_object() {
        return Err(ValidationFailure::with_partial(
            ValidationError::EntitiesNotAMap,
            object,
        ));
    }

    Ok(ParsedResponse { object })
}

fn check_intent(value: &Value) -> Option<ValidationError> {
    match value.as_str() {
        Some(s) if s.parse::<Intent>().is_ok() => None,
        Some(s) => Some(ValidationError::InvalidIntent(s.to_string())),
        None => Some(ValidationError::InvalidIntent(value.to_string())),
    }
}

fn check_confidence(value: &Value) -> Option<ValidationError> {
    let (low, high) = criteria::CONFIDENCE_RANGE;
    match value.as_f64() {
        Some(c) if (low..=high).contains(&c) => None,
        _ => Some(ValidationError::ConfidenceOutOfRange(value.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_of(raw: &str) -> ValidationError {
        validate(raw).unwrap_err().error
    }

    #[test]
    fn test_extracts_json_from_chatter() {
        let raw = "Sure! {\"intent\":\"view_schedule\",\"entities\":{},\"confidence\":0.9}";
        let parsed = validate(raw).unwrap();
        assert_eq!(parsed.intent(), Intent::ViewSchedule);
        assert!(parsed.entities().is_empty());
        assert_eq!(parsed.confidence(), Some(0.9));
    }

    #[test]
    fn test_spans_newlines_and_nested_objects() {
        let raw = "Result:\n{\n  \"intent\": \"emergency_replacement\",\n  \"entities\": {\"employee_name\": \"Anna\"},\n  \"confidence\": 1\n}\nDone.";
        let parsed = validate(raw).unwrap();
        assert_eq!(parsed.entities()["employee_name"], "Anna");
        assert_eq!(parsed.confidence(), Some(1.0));
    }

    #[test]
    fn test_no_json() {
        assert_eq!(error_of("no json here"), ValidationError::NoJsonFound);
        assert_eq!(error_of(""), ValidationError::NoJsonFound);
    }

    #[test]
    fn test_greedy_block_across_two_objects_is_malformed() {
        let raw = "{\"a\": 1} and then {\"b\": 2}";
        assert!(matches!(error_of(raw), ValidationError::MalformedJson(_)));
    }

    #[test]
    fn test_missing_fields_collects_all() {
        let failure = validate("{\"intent\": \"information\"}").unwrap_err();
        assert_eq!(
            failure.error,
            ValidationError::MissingFields(vec!["entities".to_string(), "confidence".to_string()])
        );
        assert_eq!(failure.partial, Some(json!({"intent": "information"})));
    }

    #[test]
    fn test_invalid_intent() {
        let raw = r#"{"intent": "greeting", "entities": {}, "confidence": 0.5}"#;
        assert_eq!(
            error_of(raw),
            ValidationError::InvalidIntent("greeting".to_string())
        );

        let raw = r#"{"intent": 3, "entities": {}, "confidence": 0.5}"#;
        assert_eq!(error_of(raw), ValidationError::InvalidIntent("3".to_string()));
    }

    #[test]
    fn test_confidence_bounds() {
        for ok in ["0", "0.0", "1", "1.0", "0.5"] {
            let raw = format!(r#"{{"intent": "unknown", "entities": {{}}, "confidence": {}}}"#, ok);
            assert!(validate(&raw).is_ok(), "{}", ok);
        }
        for bad in ["1.01", "-0.1", "\"0.9\"", "null"] {
            let raw = format!(r#"{{"intent": "unknown", "entities": {{}}, "confidence": {}}}"#, bad);
            assert!(
                matches!(error_of(&raw), ValidationError::ConfidenceOutOfRange(_)),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_intent_checked_before_confidence() {
        let raw = r#"{"intent": "nope", "entities": [], "confidence": 7}"#;
        assert!(matches!(error_of(raw), ValidationError::InvalidIntent(_)));
    }

    #[test]
    fn test_entities_must_be_a_map() {
        for entities in ["[]", "\"Anna\"", "null", "3"] {
            let raw = format!(
                r#"{{"intent": "information", "entities": {}, "confidence": 0.7}}"#,
                entities
            );
            assert_eq!(error_of(&raw), ValidationError::EntitiesNotAMap, "{}", entities);
        }
    }

    #[test]
    fn test_parsed_object_is_unchanged() {
        let raw = r#"{"intent": "information", "entities": {"shift_day": null}, "confidence": 0.7, "missing_info": ["x"]}"#;
        let parsed = validate(raw).unwrap();
        assert_eq!(
            parsed.into_value(),
            json!({
                "intent": "information",
                "entities": {"shift_day": null},
                "confidence": 0.7,
                "missing_info": ["x"]
            })
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        for raw in [
            "junk",
            "{\"intent\": \"x\"}",
            r#"{"intent": "information", "entities": {}, "confidence": 0.7}"#,
        ] {
            assert_eq!(validate(raw), validate(raw));
        }
    }
}
