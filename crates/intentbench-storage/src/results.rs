//! Run files and comparative report files.
//!
//! Layout of the results directory:
//! - `<model>_<variant>_<YYYYmmdd_HHMMSS>.json`: one suite run
//! - `comparative_analysis_<YYYYmmdd_HHMMSS>.json`: one cross-model report

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use intentbench_core::config::defaults;
use intentbench_core::{CaseOutcome, ComparativeReport, ModelProfile, ModelSummary};

use crate::error::{Error, Result};

const REPORT_PREFIX: &str = "comparative_analysis_";

/// Header of a run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub model_key: String,
    pub model_name: String,
    pub prompt_variant: String,
    pub timestamp: DateTime<Local>,
    pub total_cases: usize,
    /// Sum of inference time over successful cases.
    pub total_duration_secs: f64,
}

/// Contents of a run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub metadata: RunMetadata,
    pub summary: ModelSummary,
    pub outcomes: Vec<CaseOutcome>,
}

/// Contents of a report file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub generated_at: DateTime<Local>,
    pub report: ComparativeReport,
}

/// Results directory handle.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    dir: PathBuf,
}

impl ResultsStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one suite run and return the file path.
    pub fn save_run(
        &self,
        profile: &ModelProfile,
        summary: &ModelSummary,
        outcomes: &[CaseOutcome],
    ) -> Result<PathBuf> {
        let now = Local::now();
        let record = RunRecord {
            metadata: RunMetadata {
                model_key: profile.key.clone(),
                model_name: profile.name.clone(),
                prompt_variant: summary.prompt_variant.clone(),
                timestamp: now,
                total_cases: outcomes.len(),
                total_duration_secs: summary.total_inference_secs,
            },
            summary: summary.clone(),
            outcomes: outcomes.to_vec(),
        };

        let stem = format!(
            "{}_{}_{}",
            safe_file_name(&profile.name),
            summary.prompt_variant,
            now.format(defaults::TIMESTAMP_FORMAT)
        );
        let path = self.write_json(&stem, &record)?;
        tracing::info!(path = %path.display(), model = %profile.name, "Saved run results");
        Ok(path)
    }

    /// Write a comparative report, stamped with the current time.
    pub fn save_report(&self, report: &ComparativeReport) -> Result<PathBuf> {
        let now = Local::now();
        let stored = StoredReport {
            generated_at: now,
            report: report.clone(),
        };
        let stem = format!("{}{}", REPORT_PREFIX, now.format(defaults::TIMESTAMP_FORMAT));
        let path = self.write_json(&stem, &stored)?;
        tracing::info!(path = %path.display(), "Saved comparative analysis");
        Ok(path)
    }

    pub fn load_run(&self, path: impl AsRef<Path>) -> Result<RunRecord> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        serde_json::from_str(&content).map_err(|e| Error::InvalidRecord {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Run files in the directory, sorted by name. Report files are excluded;
    /// a missing directory yields an empty list.
    pub fn list_run_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            let is_report = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(REPORT_PREFIX));
            if path.is_file() && is_json && !is_report {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Summaries of every readable run file. Unreadable files are skipped.
    pub fn load_all_summaries(&self) -> Result<Vec<ModelSummary>> {
        let mut summaries = Vec::new();
        for path in self.list_run_files()? {
            match self.load_run(&path) {
                Ok(record) => summaries.push(record.summary),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable results file");
                }
            }
        }
        Ok(summaries)
    }

    fn write_json<T: Serialize>(&self, stem: &str, value: &T) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let mut path = self.dir.join(format!("{}.json", stem));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{}_{}.json", stem, n));
            n += 1;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

/// Replace path separators and tag colons in a model identifier.
pub fn safe_file_name(model: &str) -> String {
    model.replace([':', '/', '\\'], "_")
}
