//! Cross-model ranking.
//!
//! `analyze` is a pure function of its input: no clock, no randomness, and ties
//! always resolve to the entry that came first.

use std::collections::{BTreeMap, BTreeSet};

use intentbench_core::{
    BalancedPick, ComparativeReport, ConfidenceRank, EvalError, GroupAnalysis, GroupScore,
    GroupStats, ModelSummary, OverallRank, PerformanceRow, Rankings, ReportSummary, RunKey,
    SpeedRank,
};

const INTENT_WEIGHT: f64 = 0.7;
const JSON_WEIGHT: f64 = 0.3;
const BALANCED_INTENT_WEIGHT: f64 = 0.6;
const BALANCED_SPEED_WEIGHT: f64 = 0.4;

/// Weighted headline score used for the overall ranking.
pub fn overall_score(intent_accuracy_rate: f64, json_validity_rate: f64) -> f64 {
    INTENT_WEIGHT * intent_accuracy_rate + JSON_WEIGHT * json_validity_rate
}

/// Rank the given runs. Later summaries replace earlier ones with the same
/// (model, prompt variant) key, keeping the earlier position.
pub fn analyze(summaries: &[ModelSummary]) -> Result<ComparativeReport, EvalError> {
    let entries = dedupe(summaries);
    if entries.is_empty() {
        return Err(EvalError::NothingToAnalyze);
    }

    let rankings = Rankings {
        overall: rank_overall(&entries),
        speed: rank_speed(&entries),
        confidence: rank_confidence(&entries),
    };
    let language_analysis = analyze_groups(&entries, |s| &s.by_language);
    let difficulty_analysis = analyze_groups(&entries, |s| &s.by_difficulty);
    let balanced_pick = balanced_pick(&entries);

    let recommendations =
        recommendations(&rankings, &language_analysis, balanced_pick.as_ref());

    Ok(ComparativeReport {
        summary: ReportSummary {
            models_analyzed: entries.len(),
            test_cases_per_model: entries
                .iter()
                .map(|(_, s)| s.total_cases)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        },
        rankings,
        performance_matrix: entries.iter().map(|(key, s)| performance_row(key, s)).collect(),
        language_analysis,
        difficulty_analysis,
        balanced_pick,
        recommendations,
    })
}

/// Identity is the (model, variant) pair; the joined label is only for display.
fn dedupe(summaries: &[ModelSummary]) -> Vec<(String, &ModelSummary)> {
    let mut entries: Vec<(RunKey, &ModelSummary)> = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let key = summary.key();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = summary,
            None => entries.push((key, summary)),
        }
    }
    entries
        .into_iter()
        .map(|(key, summary)| (key.to_string(), summary))
        .collect()
}

fn rank_overall(entries: &[(String, &ModelSummary)]) -> Vec<OverallRank> {
    let mut ranks: Vec<OverallRank> = entries
        .iter()
        .map(|(key, s)| OverallRank {
            key: key.clone(),
            model_name: s.model_name.clone(),
            prompt_variant: s.prompt_variant.clone(),
            score: overall_score(s.intent_accuracy_rate, s.json_validity_rate),
            intent_accuracy_rate: s.intent_accuracy_rate,
            json_validity_rate: s.json_validity_rate,
        })
        .collect();
    // Stable: equal scores keep input order.
    ranks.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranks
}

fn rank_speed(entries: &[(String, &ModelSummary)]) -> Vec<SpeedRank> {
    let mut ranks: Vec<SpeedRank> = entries
        .iter()
        .filter_map(|(key, s)| {
            s.mean_time_secs().map(|mean_time_secs| SpeedRank {
                key: key.clone(),
                mean_time_secs,
            })
        })
        .collect();
    ranks.sort_by(|a, b| a.mean_time_secs.total_cmp(&b.mean_time_secs));
    ranks
}

fn rank_confidence(entries: &[(String, &ModelSummary)]) -> Vec<ConfidenceRank> {
    let mut ranks: Vec<ConfidenceRank> = entries
        .iter()
        .filter_map(|(key, s)| {
            s.mean_confidence()
                .filter(|c| *c > 0.0)
                .map(|mean_confidence| ConfidenceRank {
                    key: key.clone(),
                    mean_confidence,
                })
        })
        .collect();
    ranks.sort_by(|a, b| b.mean_confidence.total_cmp(&a.mean_confidence));
    ranks
}

fn performance_row(key: &str, s: &ModelSummary) -> PerformanceRow {
    PerformanceRow {
        key: key.to_string(),
        model_name: s.model_name.clone(),
        prompt_variant: s.prompt_variant.clone(),
        success_rate: s.success_rate,
        json_validity_rate: s.json_validity_rate,
        intent_accuracy_rate: s.intent_accuracy_rate,
        mean_time_secs: s.mean_time_secs(),
        mean_confidence: s.mean_confidence(),
    }
}

fn analyze_groups<F>(
    entries: &[(String, &ModelSummary)],
    groups: F,
) -> BTreeMap<String, GroupAnalysis>
where
    F: Fn(&ModelSummary) -> &BTreeMap<String, GroupStats>,
{
    let names: BTreeSet<&String> = entries.iter().flat_map(|(_, s)| groups(*s).keys()).collect();

    let mut analyses = BTreeMap::new();
    for name in names {
        let mut best: Option<(&str, f64)> = None;
        let mut scores = Vec::new();
        for (key, summary) in entries {
            let Some(stats) = groups(*summary).get(name).filter(|g| g.total > 0) else {
                continue;
            };
            scores.push(GroupScore {
                key: key.clone(),
                accuracy: stats.accuracy,
            });
            if best.map_or(true, |(_, acc)| stats.accuracy > acc) {
                best = Some((key.as_str(), stats.accuracy));
            }
        }
        if let Some((best_key, best_accuracy)) = best {
            let average_accuracy =
                scores.iter().map(|s| s.accuracy).sum::<f64>() / scores.len() as f64;
            analyses.insert(
                name.clone(),
                GroupAnalysis {
                    best: best_key.to_string(),
                    best_accuracy,
                    average_accuracy,
                    scores,
                },
            );
        }
    }
    analyses
}

fn balanced_pick(entries: &[(String, &ModelSummary)]) -> Option<BalancedPick> {
    let timed: Vec<(&String, &ModelSummary, f64)> = entries
        .iter()
        .filter_map(|(key, s)| s.mean_time_secs().map(|t| (key, *s, t)))
        .collect();
    let max_time = timed.iter().map(|(_, _, t)| *t).fold(f64::NEG_INFINITY, f64::max);

    let mut best: Option<BalancedPick> = None;
    for (key, summary, time) in timed {
        let speed_score = if max_time > 0.0 {
            1.0 - time / max_time
        } else {
            0.0
        };
        let score = BALANCED_INTENT_WEIGHT * summary.intent_accuracy_rate
            + BALANCED_SPEED_WEIGHT * speed_score;
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(BalancedPick {
                key: key.clone(),
                score,
                intent_accuracy_rate: summary.intent_accuracy_rate,
                speed_score,
            });
        }
    }
    best
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn recommendations(
    rankings: &Rankings,
    languages: &BTreeMap<String, GroupAnalysis>,
    balanced: Option<&BalancedPick>,
) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(best) = rankings.overall.first() {
        lines.push(format!(
            "Best overall: {} (score {}, intent accuracy {}, JSON validity {})",
            best.key,
            percent(best.score),
            percent(best.intent_accuracy_rate),
            percent(best.json_validity_rate)
        ));
    }
    if let Some(fastest) = rankings.speed.first() {
        lines.push(format!(
            "Fastest: {} ({:.2}s average inference time)",
            fastest.key, fastest.mean_time_secs
        ));
    }
    for (language, analysis) in languages {
        lines.push(format!(
            "Best for {}: {} ({} intent accuracy)",
            language,
            analysis.best,
            percent(analysis.best_accuracy)
        ));
    }
    if let Some(pick) = balanced {
        lines.push(format!(
            "Production pick (accuracy and speed): {} (balanced score {:.3}, intent accuracy {})",
            pick.key,
            pick.score,
            percent(pick.intent_accuracy_rate)
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentbench_core::Distribution;

    fn summary(model: &str, intent: f64, json: f64, time: Option<f64>) -> ModelSummary {
        ModelSummary {
            model_name: model.to_string(),
            model_description: String::new(),
            prompt_variant: "production".to_string(),
            total_cases: 24,
            success_rate: 1.0,
            json_validity_rate: json,
            intent_accuracy_rate: intent,
            mean_entity_accuracy: None,
            timing: time.map(|t| Distribution {
                mean: t,
                median: t,
                min: t,
                max: t,
            }),
            total_inference_secs: 0.0,
            confidence: None,
            by_language: BTreeMap::new(),
            by_difficulty: BTreeMap::new(),
            by_category: BTreeMap::new(),
            failure_kinds: BTreeMap::new(),
        }
    }

    #[test]
    fn test_empty_input_is_nothing_to_analyze() {
        assert_eq!(analyze(&[]), Err(EvalError::NothingToAnalyze));
    }

    #[test]
    fn test_overall_ties_keep_input_order() {
        let report = analyze(&[
            summary("a", 0.5, 0.5, None),
            summary("b", 0.9, 0.9, None),
            summary("c", 0.5, 0.5, None),
        ])
        .unwrap();
        let order: Vec<&str> = report.rankings.overall.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(order, vec!["b_production", "a_production", "c_production"]);
    }

    #[test]
    fn test_duplicate_key_replaced_in_place() {
        let report = analyze(&[
            summary("a", 0.1, 0.1, None),
            summary("b", 0.5, 0.5, None),
            summary("a", 0.9, 0.9, None),
        ])
        .unwrap();
        assert_eq!(report.summary.models_analyzed, 2);
        assert_eq!(report.performance_matrix[0].key, "a_production");
        assert_eq!(report.performance_matrix[0].intent_accuracy_rate, 0.9);
        assert_eq!(report.best_overall(), Some("a_production"));
    }

    #[test]
    fn test_speed_and_confidence_exclusions() {
        let mut fast = summary("fast", 0.5, 1.0, Some(1.0));
        fast.confidence = Distribution::from_samples(&[0.0]);
        let mut slow = summary("slow", 0.5, 1.0, Some(4.0));
        slow.confidence = Distribution::from_samples(&[0.7, 0.9]);
        let untimed = summary("untimed", 0.5, 1.0, None);

        let report = analyze(&[slow, untimed, fast]).unwrap();
        let speed: Vec<&str> = report.rankings.speed.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(speed, vec!["fast_production", "slow_production"]);

        assert_eq!(report.rankings.confidence.len(), 1);
        assert_eq!(report.rankings.confidence[0].key, "slow_production");
    }

    #[test]
    fn test_balanced_pick() {
        let report = analyze(&[
            summary("accurate", 0.9, 1.0, Some(4.0)),
            summary("quick", 0.7, 1.0, Some(1.0)),
            summary("untimed", 1.0, 1.0, None),
        ])
        .unwrap();
        // accurate: 0.54 + 0.0; quick: 0.42 + 0.4 * 0.75 = 0.72
        let pick = report.balanced_pick.unwrap();
        assert_eq!(pick.key, "quick_production");
        assert!((pick.score - 0.72).abs() < 1e-9);
        assert!((pick.speed_score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_balanced_pick_with_zero_times() {
        let report = analyze(&[
            summary("a", 0.4, 1.0, Some(0.0)),
            summary("b", 0.8, 1.0, Some(0.0)),
        ])
        .unwrap();
        let pick = report.balanced_pick.unwrap();
        assert_eq!(pick.key, "b_production");
        assert_eq!(pick.speed_score, 0.0);
    }

    #[test]
    fn test_group_best_first_max_wins() {
        let mut a = summary("a", 0.5, 1.0, None);
        a.by_language.insert("German".to_string(), GroupStats::new(4, 3));
        a.by_language.insert("English".to_string(), GroupStats::new(10, 5));
        let mut b = summary("b", 0.5, 1.0, None);
        b.by_language.insert("German".to_string(), GroupStats::new(4, 3));
        b.by_language.insert("French".to_string(), GroupStats::new(2, 2));

        let report = analyze(&[a, b]).unwrap();
        let german = &report.language_analysis["German"];
        assert_eq!(german.best, "a_production");
        assert_eq!(german.best_accuracy, 0.75);
        assert_eq!(german.scores.len(), 2);

        let french = &report.language_analysis["French"];
        assert_eq!(french.best, "b_production");
        assert_eq!(french.average_accuracy, 1.0);
        assert_eq!(report.language_analysis["English"].scores.len(), 1);
    }

    #[test]
    fn test_recommendations_mention_winners() {
        let mut a = summary("a", 0.9, 0.8, Some(2.0));
        a.by_language.insert("English".to_string(), GroupStats::new(2, 2));
        let report = analyze(&[a]).unwrap();
        assert!(report.recommendations[0].starts_with("Best overall: a_production"));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.starts_with("Fastest: a_production")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Best for English: a_production (100.0%")));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let input = vec![
            summary("a", 0.6, 1.0, Some(3.0)),
            summary("b", 0.9, 0.8, Some(5.0)),
        ];
        assert_eq!(analyze(&input), analyze(&input));
    }
}
