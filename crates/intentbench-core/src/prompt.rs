//! Prompt variants for the scheduling parser.
//!
//! A `PromptLibrary` is built explicitly and handed to whoever renders prompts;
//! there is no process-wide registry. Templates carry two placeholders,
//! `{user_input}` and `{context_str}`, and rendering is plain substitution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

const USER_INPUT: &str = "{user_input}";
const CONTEXT_STR: &str = "{context_str}";

/// One named template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptVariant {
    pub name: String,
    pub template: String,
    pub description: String,
    pub best_for: String,
}

impl PromptVariant {
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        description: impl Into<String>,
        best_for: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            description: description.into(),
            best_for: best_for.into(),
        }
    }

    /// Fill both placeholders in one left-to-right pass; substituted text is
    /// never scanned again.
    pub fn render(&self, user_input: &str, context: &str) -> String {
        let mut out =
            String::with_capacity(self.template.len() + user_input.len() + context.len());
        let mut rest = self.template.as_str();
        loop {
            let next = [(CONTEXT_STR, context), (USER_INPUT, user_input)]
                .into_iter()
                .filter_map(|(placeholder, value)| {
                    rest.find(placeholder).map(|at| (at, placeholder, value))
                })
                .min_by_key(|(at, _, _)| *at);
            match next {
                Some((at, placeholder, value)) => {
                    out.push_str(&rest[..at]);
                    out.push_str(value);
                    rest = &rest[at + placeholder.len()..];
                }
                None => {
                    out.push_str(rest);
                    return out;
                }
            }
        }
    }
}

/// Ordered set of prompt variants.
#[derive(Debug, Clone, Default)]
pub struct PromptLibrary {
    variants: Vec<PromptVariant>,
}

impl PromptLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The five built-in variants.
    pub fn builtin() -> Self {
        Self::empty()
            .with_variant(PromptVariant::new(
                "production",
                PRODUCTION_TEMPLATE,
                "Current production prompt from semantic parser config",
                "Production baseline comparison",
            ))
            .with_variant(PromptVariant::new(
                "multilingual",
                MULTILINGUAL_TEMPLATE,
                "Enhanced multilingual support with examples",
                "International teams, complex multilingual parsing",
            ))
            .with_variant(PromptVariant::new(
                "concise",
                CONCISE_TEMPLATE,
                "Streamlined prompt for faster inference",
                "Speed-critical applications, simple inputs",
            ))
            .with_variant(PromptVariant::new(
                "structured",
                STRUCTURED_TEMPLATE,
                "Highly organized with clear sections",
                "Consistent parsing, clear requirements",
            ))
            .with_variant(PromptVariant::new(
                "chain_of_thought",
                CHAIN_OF_THOUGHT_TEMPLATE,
                "Step-by-step reasoning approach",
                "Complex scenarios, accuracy-critical tasks",
            ))
    }

    /// Add a variant, replacing any existing one with the same name in place.
    pub fn with_variant(mut self, variant: PromptVariant) -> Self {
        match self.variants.iter_mut().find(|v| v.name == variant.name) {
            Some(existing) => *existing = variant,
            None => self.variants.push(variant),
        }
        self
    }

    /// Replace the production template with the one stored in a semantic-parser
    /// config file (`parsing_prompt.template`). Keeps the built-in template if
    /// the file cannot be used.
    pub fn with_production_template_file(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match load_parsing_template(path) {
            Ok(template) => {
                tracing::info!(path = %path.display(), "Loaded production prompt template");
                let variant = self
                    .get("production")
                    .cloned()
                    .map(|mut v| {
                        v.template = template.clone();
                        v
                    })
                    .unwrap_or_else(|| {
                        PromptVariant::new(
                            "production",
                            template,
                            "Current production prompt from semantic parser config",
                            "Production baseline comparison",
                        )
                    });
                self.with_variant(variant)
            }
            Err(reason) => {
                tracing::warn!(
                    path = %path.display(),
                    %reason,
                    "Could not load production prompt, keeping built-in template"
                );
                self
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PromptVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Render `variant` for one input.
    pub fn render(&self, variant: &str, user_input: &str, context: &str) -> Result<String, EvalError> {
        self.get(variant)
            .map(|v| v.render(user_input, context))
            .ok_or_else(|| EvalError::UnknownPromptVariant(variant.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptVariant> {
        self.variants.iter()
    }

    /// `(name, description)` pairs in registration order.
    pub fn variants(&self) -> Vec<(&str, &str)> {
        self.variants
            .iter()
            .map(|v| (v.name.as_str(), v.description.as_str()))
            .collect()
    }
}

#[derive(Deserialize)]
struct ParserConfig {
    parsing_prompt: ParsingPrompt,
}

#[derive(Deserialize)]
struct ParsingPrompt {
    template: String,
}

fn load_parsing_template(path: &Path) -> Result<String, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let config: ParserConfig = serde_json::from_str(&content).map_err(|e| e.to_string())?;
    // Config templates escape literal braces by doubling them.
    Ok(config
        .parsing_prompt
        .template
        .replace("{{", "{")
        .replace("}}", "}"))
}

const PRODUCTION_TEMPLATE: &str = r#"You are a semantic parser for a staff scheduling system. Parse the user input into structured JSON.

{context_str}User Input: "{user_input}"

Extract information and output ONLY valid JSON in this exact format:
{
  "intent": "view_schedule" | "emergency_replacement" | "create_schedule" | "modify_schedule" | "analyze_scenario" | "information" | "unknown",
  "entities": {
    "employee_name": "extracted name or null",
    "shift_day": "Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday or null",
    "shift_time": "Morning|Afternoon|Evening|Night or null",
    "shift_name": "exact shift name if mentioned or null",
    "optimization_preference": "cost|preference|training|balanced or null",
    "time_period": "this_week|next_week|today|tomorrow or null",
    "urgency": "emergency|planned or null"
  },
  "confidence": 0.0 to 1.0,
  "missing_info": ["list of missing required fields"],
  "suggested_question": "clear question to get missing info or null",
  "conversation_hint": "brief helpful context or null"
}

Intent classification rules:
- "view_schedule": Show, display, see, what is, check current schedule or assignments
- "emergency_replacement": Someone can't work, needs replacement, cover, substitute
- "create_schedule": Create, build, optimize, generate, plan schedule for period
- "modify_schedule": Change, replace, move, swap, add, remove from existing schedule
- "analyze_scenario": What if, analyze, scenarios, alternatives, options
- "information": List employees, show available staff, general information
- "unknown": Cannot clearly classify

Entity extraction:
- employee_name: Extract proper names (Anna, Felix, Sarah Mueller, etc.)
- shift_day: Map day references to standard format
- shift_time: Map time references (morning, evening, afternoon, night)
- optimization_preference: Detect cost focus, employee satisfaction, training opportunities
- urgency: Emergency indicates immediate need, planned for future scheduling

Output ONLY the JSON, no other text:"#;

const MULTILINGUAL_TEMPLATE: &str = r#"Parse scheduling input to JSON. Output ONLY JSON.

Input: "{user_input}"
{context_str}

JSON Format:
{
  "intent": "view_schedule|emergency_replacement|create_schedule|modify_schedule|analyze_scenario|information|unknown",
  "entities": {
    "employee_name": null,
    "shift_day": null,
    "shift_time": null,
    "shift_name": null,
    "optimization_preference": null,
    "time_period": null,
    "urgency": null
  },
  "confidence": 0.0,
  "missing_info": [],
  "suggested_question": null,
  "conversation_hint": null
}

Intents:
- view_schedule: show, display, see, who's working
- emergency_replacement: can't work, sick, replace, emergency, cover
- create_schedule: create, build, optimize, generate schedule
- modify_schedule: change, move, swap, replace shifts
- analyze_scenario: what if, analyze, scenarios
- information: list, available, employees
- unknown: unclear input

Multilingual Keywords:
EN: can't work, sick, replace, schedule
DE: kann nicht, krank, ersetzen, Schichtplan
FR: ne peut pas, malade, remplacer, horaire
IT: non può, malato, sostituire, turno

Examples:
"Anna can't work Friday" → {"intent":"emergency_replacement","entities":{"employee_name":"Anna","shift_day":"Friday","urgency":"emergency"},"confidence":0.9,"missing_info":[],"suggested_question":null,"conversation_hint":null}

"Sarah ist krank" → {"intent":"emergency_replacement","entities":{"employee_name":"Sarah","urgency":"emergency"},"confidence":0.85,"missing_info":["shift_day","shift_time"],"suggested_question":"Which shift can't Sarah work?","conversation_hint":null}

JSON only:"#;

const CONCISE_TEMPLATE: &str = r#"Convert to JSON. Output JSON only.

Input: "{user_input}"
{context_str}

{
  "intent": "view_schedule|emergency_replacement|create_schedule|modify_schedule|analyze_scenario|information|unknown",
  "entities": {
    "employee_name": null,
    "shift_day": null,
    "shift_time": null,
    "optimization_preference": null,
    "time_period": null,
    "urgency": null
  },
  "confidence": 0.0,
  "missing_info": [],
  "suggested_question": null
}

Intent mapping:
- show/display/see → view_schedule
- can't work/sick/emergency → emergency_replacement
- create/build/optimize → create_schedule
- change/move/swap → modify_schedule
- what if/analyze → analyze_scenario
- list/available → information
- unclear → unknown

Extract names, days (Monday-Sunday), times (Morning/Afternoon/Evening/Night), urgency.

JSON:"#;

const STRUCTURED_TEMPLATE: &str = r#"TASK: Parse scheduling text to JSON
INPUT: "{user_input}"
{context_str}

OUTPUT FORMAT:
{
  "intent": "emergency_replacement|create_schedule|view_schedule|modify_schedule|analyze_scenario|information|unknown",
  "entities": {
    "employee_name": "Name or null",
    "shift_day": "Monday-Sunday or null",
    "shift_time": "Morning|Afternoon|Evening|Night or null",
    "optimization_preference": "cost|preference|training|balanced or null",
    "time_period": "this_week|next_week|today|tomorrow or null",
    "urgency": "emergency|planned or null"
  },
  "confidence": 0.0-1.0,
  "missing_info": [],
  "suggested_question": "Question or null"
}

CLASSIFICATION RULES:
1. emergency_replacement: "can't work", "sick", "replace", "cover", "emergency"
2. create_schedule: "create", "build", "optimize", "generate", "plan schedule"
3. view_schedule: "show", "display", "see", "who's working", "current schedule"
4. modify_schedule: "change", "move", "swap", "replace shifts"
5. analyze_scenario: "what if", "analyze", "scenarios", "alternatives"
6. information: "list", "available", "employees", "staff info"
7. unknown: Ambiguous or unclear requests

ENTITY EXTRACTION:
- Names: Capitalize first letters (anna → Anna)
- Days: Map to standard format (heute → today, vendredi → Friday)
- Times: Group into periods (8-16 → Morning, evening → Evening)
- Urgency: Emergency words indicate "emergency", planning words indicate "planned"

MULTILINGUAL: Support DE/FR/IT variations of keywords.

OUTPUT: JSON only, no text."#;

const CHAIN_OF_THOUGHT_TEMPLATE: &str = r#"Parse scheduling request step by step, then output JSON.

Input: "{user_input}"
{context_str}

Steps:
1. Identify main action (show, create, emergency, etc.)
2. Extract person names (proper nouns)
3. Find time references (days, periods)
4. Detect urgency signals
5. Determine missing information

JSON Output:
{
  "intent": "view_schedule|emergency_replacement|create_schedule|modify_schedule|analyze_scenario|information|unknown",
  "entities": {
    "employee_name": null,
    "shift_day": null,
    "shift_time": null,
    "optimization_preference": null,
    "time_period": null,
    "urgency": null
  },
  "confidence": 0.0,
  "missing_info": [],
  "suggested_question": null
}

Example Process:
Input: "Anna kann nicht Freitag arbeiten"
1. Action: "kann nicht" = can't work → emergency_replacement
2. Person: "Anna" → employee_name: "Anna"
3. Time: "Freitag" = Friday → shift_day: "Friday"
4. Urgency: "kann nicht" indicates emergency → urgency: "emergency"
5. Missing: No specific time → missing_info: ["shift_time"]

Result: {"intent":"emergency_replacement","entities":{"employee_name":"Anna","shift_day":"Friday","urgency":"emergency"},"confidence":0.9,"missing_info":["shift_time"],"suggested_question":"What time on Friday can't Anna work?"}

Process the input and output ONLY the final JSON:"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_variants_in_order() {
        let library = PromptLibrary::builtin();
        let names: Vec<&str> = library.variants().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "production",
                "multilingual",
                "concise",
                "structured",
                "chain_of_thought"
            ]
        );
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let library = PromptLibrary::builtin();
        for (name, _) in library.variants() {
            let prompt = library
                .render(name, "Anna can't work Friday", "Context: none\n")
                .unwrap();
            assert!(prompt.contains("Anna can't work Friday"), "{}", name);
            assert!(!prompt.contains(USER_INPUT), "{}", name);
            assert!(!prompt.contains(CONTEXT_STR), "{}", name);
        }
    }

    #[test]
    fn test_render_does_not_rescan_substituted_text() {
        let variant = PromptVariant::new(
            "plain",
            "{context_str}Request: {user_input}",
            "plain",
            "tests",
        );
        assert_eq!(
            variant.render("Anna is sick", "Known: {user_input}. "),
            "Known: {user_input}. Request: Anna is sick"
        );
        assert_eq!(
            variant.render("say {context_str}", "ctx. "),
            "ctx. Request: say {context_str}"
        );
        assert_eq!(variant.render("x", ""), "Request: x");
    }

    #[test]
    fn test_render_unknown_variant() {
        let library = PromptLibrary::builtin();
        assert_eq!(
            library.render("haiku", "x", ""),
            Err(EvalError::UnknownPromptVariant("haiku".to_string()))
        );
    }

    #[test]
    fn test_production_template_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("semantic_parser_config.json");
        std::fs::write(
            &path,
            r#"{"parsing_prompt": {"template": "Parse {user_input} as {{\"intent\": ...}}"}}"#,
        )
        .unwrap();

        let library = PromptLibrary::builtin().with_production_template_file(&path);
        let prompt = library.render("production", "hello", "").unwrap();
        assert_eq!(prompt, "Parse hello as {\"intent\": ...}");
        assert_eq!(library.variants().len(), 5);
    }

    #[test]
    fn test_production_template_file_missing_keeps_builtin() {
        let library = PromptLibrary::builtin()
            .with_production_template_file("/definitely/not/here.json");
        let prompt = library.render("production", "hello", "").unwrap();
        assert!(prompt.starts_with("You are a semantic parser"));
    }
}
