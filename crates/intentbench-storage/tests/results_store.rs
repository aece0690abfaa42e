//! ResultsStore against a temporary directory.

use std::fs;

use intentbench_core::{ModelProfile, ReportSummary};
use intentbench_storage::{ResultsStore, StorageError};
use intentbench_testing::summary_fixture;

fn profile() -> ModelProfile {
    ModelProfile::new("qwen3_1_7b", "qwen3:1.7b")
}

#[test]
fn test_saved_run_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultsStore::new(dir.path().join("results"));
    let summary = summary_fixture("qwen3:1.7b", "production", 0.75, 1.0, Some(1.2));

    let path = store.save_run(&profile(), &summary, &[]).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("qwen3_1.7b_production_"), "{}", name);
    assert!(name.ends_with(".json"));

    let record = store.load_run(&path).unwrap();
    assert_eq!(record.summary, summary);
    assert_eq!(record.metadata.model_key, "qwen3_1_7b");
    assert_eq!(record.metadata.model_name, "qwen3:1.7b");
    assert_eq!(record.metadata.total_cases, 0);
    assert!(record.outcomes.is_empty());
}

#[test]
fn test_same_second_saves_do_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultsStore::new(dir.path());
    let summary = summary_fixture("qwen3:1.7b", "production", 0.5, 1.0, None);

    let first = store.save_run(&profile(), &summary, &[]).unwrap();
    let second = store.save_run(&profile(), &summary, &[]).unwrap();
    assert_ne!(first, second);
    assert_eq!(store.list_run_files().unwrap().len(), 2);
}

#[test]
fn test_reports_are_not_run_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultsStore::new(dir.path());
    let summary = summary_fixture("gemma3:1b", "concise", 0.5, 1.0, None);
    store.save_run(&profile(), &summary, &[]).unwrap();

    let report = intentbench_core::ComparativeReport {
        summary: ReportSummary {
            models_analyzed: 1,
            test_cases_per_model: vec![10],
        },
        rankings: Default::default(),
        performance_matrix: Vec::new(),
        language_analysis: Default::default(),
        difficulty_analysis: Default::default(),
        balanced_pick: None,
        recommendations: vec!["Best overall: gemma3:1b_concise".to_string()],
    };
    let report_path = store.save_report(&report).unwrap();
    let report_name = report_path.file_name().unwrap().to_str().unwrap();
    assert!(report_name.starts_with("comparative_analysis_"));

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert!(stored["generated_at"].is_string());
    assert_eq!(stored["report"]["summary"]["models_analyzed"], 1);

    let runs = store.list_run_files().unwrap();
    assert_eq!(runs.len(), 1);
    assert_ne!(runs[0], report_path);
}

#[test]
fn test_unreadable_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultsStore::new(dir.path());
    let summary = summary_fixture("gemma3:1b", "production", 0.5, 1.0, None);
    store.save_run(&profile(), &summary, &[]).unwrap();

    let garbage = dir.path().join("broken_run.json");
    fs::write(&garbage, "{not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    assert_eq!(store.list_run_files().unwrap().len(), 2);
    let summaries = store.load_all_summaries().unwrap();
    assert_eq!(summaries, vec![summary]);

    assert!(matches!(
        store.load_run(&garbage),
        Err(StorageError::InvalidRecord { .. })
    ));
}
