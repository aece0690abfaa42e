//! Test cases and the multilingual scheduling corpus.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::intent::Intent;

/// One utterance with its expected parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_intent: Intent,
    /// Expected entity slots; keys come from the entity vocabulary. A `None`
    /// value expects nothing to be extracted and never scores as correct.
    pub expected_entities: BTreeMap<String, Option<String>>,
    pub language: String,
    pub difficulty: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl TestCase {
    pub fn new(
        input: impl Into<String>,
        expected_intent: Intent,
        expected_entities: &[(&str, &str)],
        language: impl Into<String>,
        difficulty: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            expected_intent,
            expected_entities: expected_entities
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
            language: language.into(),
            difficulty: difficulty.into(),
            category: category.into(),
            description: String::new(),
        }
    }

    /// Expect `entity` to be present but null.
    pub fn with_null_entity(mut self, entity: impl Into<String>) -> Self {
        self.expected_entities.insert(entity.into(), None);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Case counts per tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusOverview {
    pub total_cases: usize,
    pub by_language: BTreeMap<String, usize>,
    pub by_difficulty: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
}

/// Ordered, immutable sequence of test cases.
#[derive(Debug, Clone, Default)]
pub struct TestCorpus {
    cases: Vec<TestCase>,
}

impl TestCorpus {
    pub fn from_cases(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// The fixed scheduling corpus, grouped by category.
    pub fn builtin() -> Self {
        let mut cases = Vec::new();
        cases.extend(emergency_cases());
        cases.extend(creation_cases());
        cases.extend(information_cases());
        cases.extend(view_cases());
        cases.extend(modification_cases());
        cases.extend(analysis_cases());
        cases.extend(edge_cases());
        Self { cases }
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn by_language(&self, language: &str) -> Vec<&TestCase> {
        self.cases.iter().filter(|c| c.language == language).collect()
    }

    pub fn by_difficulty(&self, difficulty: &str) -> Vec<&TestCase> {
        self.cases
            .iter()
            .filter(|c| c.difficulty == difficulty)
            .collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<&TestCase> {
        self.cases.iter().filter(|c| c.category == category).collect()
    }

    pub fn overview(&self) -> CorpusOverview {
        let mut overview = CorpusOverview {
            total_cases: self.cases.len(),
            by_language: BTreeMap::new(),
            by_difficulty: BTreeMap::new(),
            by_category: BTreeMap::new(),
        };
        for case in &self.cases {
            *overview.by_language.entry(case.language.clone()).or_default() += 1;
            *overview
                .by_difficulty
                .entry(case.difficulty.clone())
                .or_default() += 1;
            *overview.by_category.entry(case.category.clone()).or_default() += 1;
        }
        overview
    }
}

fn emergency_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "Anna can't work Friday evening, who can replace her?",
            Intent::EmergencyReplacement,
            &[
                ("employee_name", "Anna"),
                ("shift_day", "Friday"),
                ("shift_time", "Evening"),
                ("urgency", "emergency"),
            ],
            "English",
            "Medium",
            "emergency",
        )
        .with_description("Basic emergency replacement with specific time"),
        TestCase::new(
            "Sarah ist krank und kann morgen nicht arbeiten",
            Intent::EmergencyReplacement,
            &[
                ("employee_name", "Sarah"),
                ("time_period", "tomorrow"),
                ("urgency", "emergency"),
            ],
            "German",
            "Hard",
            "emergency",
        )
        .with_description("German emergency with illness context"),
        TestCase::new(
            "Jean-Pierre ne peut pas venir dimanche matin",
            Intent::EmergencyReplacement,
            &[
                ("employee_name", "Jean-Pierre"),
                ("shift_day", "Sunday"),
                ("shift_time", "Morning"),
                ("urgency", "emergency"),
            ],
            "French",
            "Hard",
            "emergency",
        )
        .with_description("French emergency with hyphenated name"),
        TestCase::new(
            "Marco non può lavorare martedì pomeriggio",
            Intent::EmergencyReplacement,
            &[
                ("employee_name", "Marco"),
                ("shift_day", "Tuesday"),
                ("shift_time", "Afternoon"),
                ("urgency", "emergency"),
            ],
            "Italian",
            "Hard",
            "emergency",
        )
        .with_description("Italian emergency replacement scenario"),
        TestCase::new(
            "We need someone to cover the night shift tonight",
            Intent::EmergencyReplacement,
            &[
                ("shift_time", "Night"),
                ("time_period", "today"),
                ("urgency", "emergency"),
            ],
            "English",
            "Medium",
            "emergency",
        )
        .with_description("Emergency without specific employee name"),
    ]
}

fn creation_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "Create next week's schedule optimizing for cost",
            Intent::CreateSchedule,
            &[
                ("time_period", "next_week"),
                ("optimization_preference", "cost"),
            ],
            "English",
            "Easy",
            "creation",
        )
        .with_description("Basic schedule creation with cost optimization"),
        TestCase::new(
            "Build a schedule that makes employees happy",
            Intent::CreateSchedule,
            &[("optimization_preference", "preference")],
            "English",
            "Medium",
            "creation",
        )
        .with_description("Schedule creation focusing on employee satisfaction"),
        TestCase::new(
            "Erstelle einen Schichtplan für nächste Woche",
            Intent::CreateSchedule,
            &[("time_period", "next_week")],
            "German",
            "Medium",
            "creation",
        )
        .with_description("German schedule creation request"),
        TestCase::new(
            "Générer un planning équilibré pour cette semaine",
            Intent::CreateSchedule,
            &[
                ("time_period", "this_week"),
                ("optimization_preference", "balanced"),
            ],
            "French",
            "Hard",
            "creation",
        )
        .with_description("French balanced schedule generation"),
    ]
}

fn information_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "List all available employees",
            Intent::Information,
            &[],
            "English",
            "Easy",
            "information",
        )
        .with_description("Simple employee list request"),
        TestCase::new(
            "Show me the staff with training in bartending",
            Intent::Information,
            &[],
            "English",
            "Medium",
            "information",
        )
        .with_description("Filtered staff information request"),
        TestCase::new(
            "Wer ist heute verfügbar?",
            Intent::Information,
            &[("time_period", "today")],
            "German",
            "Medium",
            "information",
        )
        .with_description("German availability inquiry"),
    ]
}

fn view_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "Show me who's working this weekend",
            Intent::ViewSchedule,
            &[("time_period", "this_week")],
            "English",
            "Easy",
            "view",
        )
        .with_description("Weekend schedule view request"),
        TestCase::new(
            "What's the current schedule for Monday?",
            Intent::ViewSchedule,
            &[("shift_day", "Monday")],
            "English",
            "Easy",
            "view",
        )
        .with_description("Specific day schedule inquiry"),
        TestCase::new(
            "Mostra il turno di domani sera",
            Intent::ViewSchedule,
            &[("time_period", "tomorrow"), ("shift_time", "Evening")],
            "Italian",
            "Hard",
            "view",
        )
        .with_description("Italian schedule view for tomorrow evening"),
    ]
}

fn modification_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "Move Sarah from Monday morning to Tuesday afternoon",
            Intent::ModifySchedule,
            &[
                ("employee_name", "Sarah"),
                ("shift_day", "Monday"),
                ("shift_time", "Morning"),
            ],
            "English",
            "Hard",
            "modification",
        )
        .with_description("Complex shift modification request"),
        TestCase::new(
            "Swap Anna and Felix for Friday shifts",
            Intent::ModifySchedule,
            &[("employee_name", "Anna"), ("shift_day", "Friday")],
            "English",
            "Hard",
            "modification",
        )
        .with_description("Employee shift swap request"),
    ]
}

fn analysis_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "What if we move Sarah from Monday morning to Tuesday afternoon?",
            Intent::AnalyzeScenario,
            &[
                ("employee_name", "Sarah"),
                ("shift_day", "Monday"),
                ("shift_time", "Morning"),
            ],
            "English",
            "Hard",
            "analysis",
        )
        .with_description("Hypothetical scenario analysis"),
        TestCase::new(
            "Analyze the impact of adding an extra evening shift",
            Intent::AnalyzeScenario,
            &[("shift_time", "Evening")],
            "English",
            "Hard",
            "analysis",
        )
        .with_description("Impact analysis request"),
    ]
}

fn edge_cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "Mike",
            Intent::Unknown,
            &[("employee_name", "Mike")],
            "English",
            "Hard",
            "edge",
        )
        .with_description("Single name input - ambiguous intent"),
        TestCase::new("", Intent::Unknown, &[], "English", "Hard", "edge")
            .with_description("Empty input handling"),
        TestCase::new(
            "Anna-Maria kann nur sonntags von 8-16 Uhr mit Kellner-Fähigkeiten",
            Intent::Information,
            &[("employee_name", "Anna-Maria"), ("shift_day", "Sunday")],
            "German",
            "Very Hard",
            "edge",
        )
        .with_description("Complex German input with constraints"),
        TestCase::new(
            "Help me with something",
            Intent::Unknown,
            &[],
            "English",
            "Medium",
            "edge",
        )
        .with_description("Vague request without scheduling context"),
        TestCase::new(
            "Schedule meeting for 3pm tomorrow",
            Intent::Unknown,
            &[("time_period", "tomorrow")],
            "English",
            "Medium",
            "edge",
        )
        .with_description("Non-shift scheduling request"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::criteria;

    #[test]
    fn test_builtin_corpus_shape() {
        let corpus = TestCorpus::builtin();
        let overview = corpus.overview();

        assert_eq!(overview.total_cases, 24);
        assert_eq!(overview.by_category["emergency"], 5);
        assert_eq!(overview.by_category["creation"], 4);
        assert_eq!(overview.by_category["edge"], 5);
        assert_eq!(overview.by_language["German"], 4);
        assert_eq!(overview.by_language["French"], 2);
        assert_eq!(overview.by_language["Italian"], 2);
        assert_eq!(overview.by_difficulty["Very Hard"], 1);
    }

    #[test]
    fn test_builtin_entities_use_vocabulary() {
        for case in TestCorpus::builtin().cases() {
            for key in case.expected_entities.keys() {
                assert!(
                    criteria::ENTITY_FIELDS.contains(&key.as_str()),
                    "case '{}' uses unknown entity '{}'",
                    case.input,
                    key
                );
            }
        }
    }

    #[test]
    fn test_null_expectation_deserializes() {
        let case: TestCase = serde_json::from_str(
            r#"{"input":"x","expected_intent":"emergency_replacement","expected_entities":{"shift_day":null,"employee_name":"Anna"},"language":"English","difficulty":"Easy","category":"emergency"}"#,
        )
        .unwrap();
        assert_eq!(case.expected_entities["shift_day"], None);
        assert_eq!(
            case.expected_entities["employee_name"].as_deref(),
            Some("Anna")
        );

        let built = TestCase::new("x", Intent::Unknown, &[], "English", "Easy", "edge")
            .with_null_entity("shift_day");
        assert_eq!(built.expected_entities.get("shift_day"), Some(&None));
    }

    #[test]
    fn test_filters() {
        let corpus = TestCorpus::builtin();
        assert_eq!(corpus.by_language("Italian").len(), 2);
        assert_eq!(corpus.by_difficulty("Easy").len(), 4);
        assert_eq!(corpus.by_category("view").len(), 3);
        assert!(corpus.by_language("Klingon").is_empty());
    }

    #[test]
    fn test_corpus_order_is_category_grouped() {
        let corpus = TestCorpus::builtin();
        assert_eq!(corpus.cases()[0].category, "emergency");
        assert_eq!(corpus.cases()[5].category, "creation");
        assert_eq!(corpus.cases().last().map(|c| c.category.as_str()), Some("edge"));
    }
}
