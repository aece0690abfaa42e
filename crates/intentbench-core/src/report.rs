//! Cross-model comparison records.
//!
//! A `ComparativeReport` carries no timestamp; it is a function of the
//! summaries it was computed from. Persistence adds the generation time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub models_analyzed: usize,
    /// Distinct case counts across the analysed runs, ascending.
    pub test_cases_per_model: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRank {
    pub key: String,
    pub model_name: String,
    pub prompt_variant: String,
    pub score: f64,
    pub intent_accuracy_rate: f64,
    pub json_validity_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedRank {
    pub key: String,
    pub mean_time_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRank {
    pub key: String,
    pub mean_confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub overall: Vec<OverallRank>,
    pub speed: Vec<SpeedRank>,
    pub confidence: Vec<ConfidenceRank>,
}

/// One row per analysed run, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub key: String,
    pub model_name: String,
    pub prompt_variant: String,
    pub success_rate: f64,
    pub json_validity_rate: f64,
    pub intent_accuracy_rate: f64,
    pub mean_time_secs: Option<f64>,
    pub mean_confidence: Option<f64>,
}

/// Group accuracy of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub key: String,
    pub accuracy: f64,
}

/// Per-group comparison (one language or one difficulty level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAnalysis {
    pub best: String,
    pub best_accuracy: f64,
    pub average_accuracy: f64,
    /// Runs with data for the group, in input order.
    pub scores: Vec<GroupScore>,
}

/// Production pick trading accuracy against speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedPick {
    pub key: String,
    pub score: f64,
    pub intent_accuracy_rate: f64,
    pub speed_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeReport {
    pub summary: ReportSummary,
    pub rankings: Rankings,
    pub performance_matrix: Vec<PerformanceRow>,
    pub language_analysis: BTreeMap<String, GroupAnalysis>,
    pub difficulty_analysis: BTreeMap<String, GroupAnalysis>,
    pub balanced_pick: Option<BalancedPick>,
    pub recommendations: Vec<String>,
}

impl ComparativeReport {
    /// Key of the top overall entry.
    pub fn best_overall(&self) -> Option<&str> {
        self.rankings.overall.first().map(|r| r.key.as_str())
    }

    /// Key of the fastest entry with timing data.
    pub fn fastest(&self) -> Option<&str> {
        self.rankings.speed.first().map(|r| r.key.as_str())
    }
}
