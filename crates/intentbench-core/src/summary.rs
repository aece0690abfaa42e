//! Aggregate statistics for one (model, prompt variant) run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a run by model and prompt variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunKey {
    pub model: String,
    pub variant: String,
}

impl RunKey {
    pub fn new(model: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            variant: variant.into(),
        }
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.model, self.variant)
    }
}

/// Mean, median, min and max of a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl Distribution {
    /// `None` for an empty sample set. NaN samples are ignored.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        Some(Self {
            mean,
            median,
            min: sorted[0],
            max: sorted[n - 1],
        })
    }
}

/// Case count and intent-match rate for one language, difficulty or category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
}

impl GroupStats {
    pub fn new(total: usize, correct: usize) -> Self {
        let accuracy = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        };
        Self {
            total,
            correct,
            accuracy,
        }
    }
}

/// Aggregate over every case outcome of one run.
///
/// Derived data: always recomputable from the outcomes it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_name: String,
    #[serde(default)]
    pub model_description: String,
    pub prompt_variant: String,
    pub total_cases: usize,

    pub success_rate: f64,
    pub json_validity_rate: f64,
    pub intent_accuracy_rate: f64,
    pub mean_entity_accuracy: Option<f64>,

    /// Over successful calls only.
    pub timing: Option<Distribution>,
    pub total_inference_secs: f64,
    /// Over valid responses that reported a confidence.
    pub confidence: Option<Distribution>,

    pub by_language: BTreeMap<String, GroupStats>,
    pub by_difficulty: BTreeMap<String, GroupStats>,
    pub by_category: BTreeMap<String, GroupStats>,

    /// Failed cases counted by error kind (e.g. `timeout`, `no_json_found`).
    #[serde(default)]
    pub failure_kinds: BTreeMap<String, usize>,
}

impl ModelSummary {
    pub fn key(&self) -> RunKey {
        RunKey::new(&self.model_name, &self.prompt_variant)
    }

    pub fn mean_time_secs(&self) -> Option<f64> {
        self.timing.map(|d| d.mean)
    }

    pub fn mean_confidence(&self) -> Option<f64> {
        self.confidence.map(|d| d.mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_odd_and_even() {
        let odd = Distribution::from_samples(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(odd.median, 2.0);
        assert_eq!(odd.mean, 2.0);
        assert_eq!(odd.min, 1.0);
        assert_eq!(odd.max, 3.0);

        let even = Distribution::from_samples(&[4.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.mean, 2.5);
    }

    #[test]
    fn test_distribution_empty() {
        assert!(Distribution::from_samples(&[]).is_none());
        assert!(Distribution::from_samples(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_group_stats() {
        let stats = GroupStats::new(4, 3);
        assert_eq!(stats.accuracy, 0.75);
        assert_eq!(GroupStats::new(0, 0).accuracy, 0.0);
    }

    #[test]
    fn test_run_key_display() {
        let key = RunKey::new("qwen3:1.7b", "production");
        assert_eq!(key.to_string(), "qwen3:1.7b_production");
    }
}
