//! Drives one model through the test corpus.
//!
//! Cases run strictly one after another so that resource samples and timings
//! of different cases never overlap. Per-case failures become data in the
//! case outcome; only suite preconditions abort a run.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use intentbench_core::config::defaults;
use intentbench_core::{
    CaseOutcome, Distribution, EvalError, GroupStats, InferenceBackend, ModelProfile,
    ModelSummary, PromptLibrary, ResourceDelta, ResourceSampler, TestCase, TestCorpus,
};
use intentbench_llm::InferenceClient;

use crate::resources::SystemSampler;
use crate::scorer::{classify, score_entities};
use crate::validator::validate;

/// Knobs for a suite run.
#[derive(Debug, Clone)]
pub struct SuiteOptions {
    /// Ask the backend whether it lists the model (advisory).
    pub check_listed: bool,
    /// Send one short generation before any case; failure aborts the suite.
    pub probe_model: bool,
    /// Base of the retry backoff.
    pub retry_base_delay: Duration,
    /// Rendered into the template's `{context_str}` slot.
    pub context: String,
    /// Structured-output hint passed to the backend.
    pub format: Option<String>,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            check_listed: true,
            probe_model: true,
            retry_base_delay: defaults::RETRY_BASE_DELAY,
            context: String::new(),
            format: None,
        }
    }
}

/// Everything one suite produced.
#[derive(Debug, Clone)]
pub struct SuiteRun {
    pub outcomes: Vec<CaseOutcome>,
    pub summary: ModelSummary,
}

/// Runs the corpus against models on one backend.
pub struct SuiteRunner {
    backend: Arc<dyn InferenceBackend>,
    corpus: TestCorpus,
    prompts: PromptLibrary,
    sampler: Box<dyn ResourceSampler>,
    options: SuiteOptions,
}

impl SuiteRunner {
    pub fn new(backend: Arc<dyn InferenceBackend>, corpus: TestCorpus, prompts: PromptLibrary) -> Self {
        Self {
            backend,
            corpus,
            prompts,
            sampler: Box::new(SystemSampler::new()),
            options: SuiteOptions::default(),
        }
    }

    pub fn with_sampler(mut self, sampler: impl ResourceSampler + 'static) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    pub fn with_options(mut self, options: SuiteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn corpus(&self) -> &TestCorpus {
        &self.corpus
    }

    pub fn prompts(&self) -> &PromptLibrary {
        &self.prompts
    }

    /// Client for `profile` configured the way suites use it.
    pub fn client_for(&self, profile: &ModelProfile) -> InferenceClient {
        let client = InferenceClient::new(Arc::clone(&self.backend), profile)
            .with_retry_base_delay(self.options.retry_base_delay);
        match &self.options.format {
            Some(format) => client.with_format(format.clone()),
            None => client,
        }
    }

    /// Run every case of the corpus against `profile` with prompt `variant`.
    pub async fn run_suite(
        &mut self,
        profile: &ModelProfile,
        variant: &str,
    ) -> Result<SuiteRun, EvalError> {
        if self.corpus.is_empty() {
            return Err(EvalError::EmptyCorpus);
        }
        if !self.prompts.contains(variant) {
            return Err(EvalError::UnknownPromptVariant(variant.to_string()));
        }

        let client = self.client_for(profile);
        if self.options.check_listed {
            client.check_model_listed().await;
        }
        if self.options.probe_model {
            if let Err(err) = client.probe().await {
                warn!(model = %profile.name, error = %err, "Model probe failed, aborting suite");
                return Err(EvalError::ModelUnavailable {
                    model: profile.name.clone(),
                    reason: err.to_string(),
                });
            }
        }

        let total = self.corpus.len();
        info!(
            model = %profile.name,
            variant,
            cases = total,
            "Starting test suite"
        );

        let mut outcomes = Vec::with_capacity(total);
        for index in 0..total {
            let case = self.corpus.cases()[index].clone();
            let outcome = self.run_case(&client, variant, index, &case).await?;
            info!(
                case = index + 1,
                total,
                language = %case.language,
                difficulty = %case.difficulty,
                verdict = outcome.verdict(),
                elapsed_secs = outcome.inference_time_secs,
                "Case finished"
            );
            if let (Some(kind), Some(reason)) =
                (outcome.failure_kind(), outcome.failure_reason())
            {
                debug!(case = index + 1, kind, %reason, "Case did not score");
            }
            outcomes.push(outcome);
        }

        let mut summary = summarize(&outcomes)?;
        summary.model_description = profile.description.clone();
        info!(
            model = %profile.name,
            variant,
            intent_accuracy = summary.intent_accuracy_rate,
            json_validity = summary.json_validity_rate,
            "Test suite finished"
        );

        Ok(SuiteRun { outcomes, summary })
    }

    async fn run_case(
        &mut self,
        client: &InferenceClient,
        variant: &str,
        index: usize,
        case: &TestCase,
    ) -> Result<CaseOutcome, EvalError> {
        let prompt = self
            .prompts
            .render(variant, &case.input, &self.options.context)?;

        let before = self.sampler.sample();
        let started = Instant::now();
        let result = client.generate(&prompt).await;
        let elapsed = started.elapsed().as_secs_f64();
        let after = self.sampler.sample();

        let mut outcome = CaseOutcome {
            model_name: client.profile().name.clone(),
            prompt_variant: variant.to_string(),
            case_index: index,
            input: case.input.clone(),
            expected_intent: case.expected_intent,
            expected_entities: case.expected_entities.clone(),
            language: case.language.clone(),
            difficulty: case.difficulty.clone(),
            category: case.category.clone(),
            success: false,
            inference_time_secs: elapsed,
            raw_output: None,
            json_valid: false,
            parsed_json: None,
            validation_error: None,
            intent_match: false,
            actual_intent: None,
            intent_accuracy: None,
            entity_accuracy: None,
            confidence: None,
            resources: ResourceDelta::between(before, after),
            error: None,
        };

        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                outcome.error = Some(err);
                return Ok(outcome);
            }
        };
        outcome.success = true;

        match validate(&raw) {
            Ok(parsed) => {
                let verdict = classify(case.expected_intent, parsed.intent());
                outcome.json_valid = true;
                outcome.intent_match = verdict.is_match;
                outcome.actual_intent = Some(parsed.intent());
                outcome.intent_accuracy = Some(verdict.kind);
                outcome.entity_accuracy =
                    Some(score_entities(&case.expected_entities, parsed.entities()));
                outcome.confidence = parsed.confidence();
                outcome.parsed_json = Some(parsed.into_value());
            }
            Err(failure) => {
                outcome.validation_error = Some(failure.error);
                outcome.parsed_json = failure.partial;
            }
        }
        outcome.raw_output = Some(raw);

        Ok(outcome)
    }
}

/// Aggregate a run's outcomes. Empty input is an error, not a zero summary.
pub fn summarize(outcomes: &[CaseOutcome]) -> Result<ModelSummary, EvalError> {
    let first = outcomes.first().ok_or(EvalError::NoOutcomes)?;
    let total = outcomes.len();
    let rate = |count: usize| count as f64 / total as f64;

    let successful: Vec<f64> = outcomes
        .iter()
        .filter(|o| o.success)
        .map(|o| o.inference_time_secs)
        .collect();
    let confidences: Vec<f64> = outcomes
        .iter()
        .filter(|o| o.json_valid)
        .filter_map(|o| o.confidence)
        .collect();
    let entity_scores: Vec<f64> = outcomes
        .iter()
        .filter_map(|o| o.entity_accuracy.as_ref().map(|e| e.score))
        .collect();

    Ok(ModelSummary {
        model_name: first.model_name.clone(),
        model_description: String::new(),
        prompt_variant: first.prompt_variant.clone(),
        total_cases: total,
        success_rate: rate(successful.len()),
        json_validity_rate: rate(outcomes.iter().filter(|o| o.json_valid).count()),
        intent_accuracy_rate: rate(outcomes.iter().filter(|o| o.intent_match).count()),
        mean_entity_accuracy: mean(&entity_scores),
        timing: Distribution::from_samples(&successful),
        total_inference_secs: successful.iter().sum(),
        confidence: Distribution::from_samples(&confidences),
        by_language: group_by(outcomes, |o| &o.language),
        by_difficulty: group_by(outcomes, |o| &o.difficulty),
        by_category: group_by(outcomes, |o| &o.category),
        failure_kinds: failure_kinds(outcomes),
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn failure_kinds(outcomes: &[CaseOutcome]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for kind in outcomes.iter().filter_map(CaseOutcome::failure_kind) {
        *counts.entry(kind.to_string()).or_insert(0) += 1;
    }
    counts
}

fn group_by<F>(outcomes: &[CaseOutcome], tag: F) -> BTreeMap<String, GroupStats>
where
    F: Fn(&CaseOutcome) -> &String,
{
    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for outcome in outcomes {
        let entry = counts.entry(tag(outcome).clone()).or_default();
        entry.0 += 1;
        if outcome.intent_match {
            entry.1 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(group, (total, correct))| (group, GroupStats::new(total, correct)))
        .collect()
}
