//! The closed intent set and intent-classification verdicts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Purpose of a scheduling utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ViewSchedule,
    EmergencyReplacement,
    CreateSchedule,
    ModifySchedule,
    AnalyzeScenario,
    Information,
    Unknown,
}

impl Intent {
    pub const ALL: [Intent; 7] = [
        Intent::ViewSchedule,
        Intent::EmergencyReplacement,
        Intent::CreateSchedule,
        Intent::ModifySchedule,
        Intent::AnalyzeScenario,
        Intent::Information,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ViewSchedule => "view_schedule",
            Intent::EmergencyReplacement => "emergency_replacement",
            Intent::CreateSchedule => "create_schedule",
            Intent::ModifySchedule => "modify_schedule",
            Intent::AnalyzeScenario => "analyze_scenario",
            Intent::Information => "information",
            Intent::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Intent::Unknown)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// How a parsed intent relates to the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentAccuracy {
    /// Same intent.
    Exact,
    /// Expected `unknown`, model committed to a specific intent.
    Better,
    /// Expected a specific intent, model answered `unknown`.
    Worse,
    /// Both specific, but different.
    Different,
}

impl IntentAccuracy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentAccuracy::Exact => "exact",
            IntentAccuracy::Better => "better",
            IntentAccuracy::Worse => "worse",
            IntentAccuracy::Different => "different",
        }
    }
}

impl fmt::Display for IntentAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing an expected intent with a parsed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentVerdict {
    pub is_match: bool,
    pub kind: IntentAccuracy,
}
