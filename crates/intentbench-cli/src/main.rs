//! Command-line interface for IntentBench.

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use intentbench_core::config::{self, defaults};
use intentbench_core::{
    EvalError, InferenceBackend, ModelCatalog, ModelProfile, PromptLibrary, TestCorpus,
};
use intentbench_eval::{analyze, SuiteOptions, SuiteRunner};
use intentbench_llm::{OllamaBackend, OllamaConfig};
use intentbench_storage::ResultsStore;

/// IntentBench - Evaluate how well language models parse scheduling requests.
#[derive(Parser, Debug)]
#[command(name = "intentbench")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Ollama endpoint (default: $INTENTBENCH_OLLAMA_ENDPOINT or http://localhost:11434).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Directory for run and report files (default: $INTENTBENCH_RESULTS_DIR or ./results).
    #[arg(long, global = true)]
    results_dir: Option<PathBuf>,

    /// TOML model catalog replacing the built-in models.
    #[arg(long, global = true)]
    models_file: Option<PathBuf>,

    /// Semantic parser config whose `parsing_prompt.template` replaces the production prompt.
    #[arg(long, global = true)]
    parser_config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run the test corpus against one model.
    Run {
        /// Catalog key of the model (see `list-models`).
        model: String,
        /// Prompt variant (see `list-prompts`).
        #[arg(short, long, default_value = defaults::PROMPT_VARIANT)]
        prompt: String,
        /// Skip the probe request that confirms the model answers.
        #[arg(long)]
        no_probe: bool,
    },
    /// Run several models one after another, then compare them.
    RunAll {
        /// Catalog keys to run (default: every catalog model).
        #[arg(long, num_args = 1..)]
        models: Vec<String>,
        /// Prompt variant (see `list-prompts`).
        #[arg(short, long, default_value = defaults::PROMPT_VARIANT)]
        prompt: String,
        /// Skip the probe request that confirms each model answers.
        #[arg(long)]
        no_probe: bool,
    },
    /// Build a comparative report from saved run files.
    Report {
        /// Print the report as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },
    /// List the models in the catalog.
    ListModels,
    /// List the prompt variants.
    ListPrompts,
    /// List the models the Ollama backend has installed.
    BackendModels,
}

/// Collaborators shared by every command.
struct AppContext {
    endpoint: String,
    catalog: ModelCatalog,
    prompts: PromptLibrary,
    store: ResultsStore,
}

impl AppContext {
    fn from_args(args: &Args) -> Result<Self> {
        let endpoint = args
            .endpoint
            .clone()
            .map(config::normalize_ollama_endpoint)
            .unwrap_or_else(config::ollama_endpoint);

        let catalog = match args.models_file.clone().or_else(config::models_file) {
            Some(path) => ModelCatalog::from_toml_file(&path)
                .with_context(|| format!("Failed to load model catalog {}", path.display()))?,
            None => ModelCatalog::builtin(),
        };

        let prompts = match &args.parser_config {
            Some(path) => PromptLibrary::builtin().with_production_template_file(path),
            None => PromptLibrary::builtin(),
        };

        let store = ResultsStore::new(args.results_dir.clone().unwrap_or_else(config::results_dir));

        Ok(Self {
            endpoint,
            catalog,
            prompts,
            store,
        })
    }

    fn backend(&self) -> Result<Arc<OllamaBackend>> {
        let backend = OllamaBackend::new(OllamaConfig::new().with_endpoint(&self.endpoint))?;
        Ok(Arc::new(backend))
    }

    fn runner(&self, backend: Arc<dyn InferenceBackend>, probe: bool) -> SuiteRunner {
        SuiteRunner::new(backend, TestCorpus::builtin(), self.prompts.clone()).with_options(
            SuiteOptions {
                probe_model: probe,
                ..SuiteOptions::default()
            },
        )
    }

    fn profile(&self, key: &str) -> Result<ModelProfile> {
        Ok(self.catalog.get(key)?.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let ctx = AppContext::from_args(&args)?;

    match args.command {
        Command::Run {
            model,
            prompt,
            no_probe,
        } => run_single(&ctx, &model, &prompt, !no_probe).await,
        Command::RunAll {
            models,
            prompt,
            no_probe,
        } => run_all(&ctx, models, &prompt, !no_probe).await,
        Command::Report { json } => report(&ctx, json),
        Command::ListModels => {
            render::print_catalog(&ctx.catalog);
            Ok(())
        }
        Command::ListPrompts => {
            render::print_prompts(&ctx.prompts);
            Ok(())
        }
        Command::BackendModels => backend_models(&ctx).await,
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "intentbench=debug"
    } else {
        "intentbench=info"
    };

    // Build the env filter for log level control
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    if config::json_logging() {
        // JSON format for unattended runs
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        // Human-readable format, tables stay alone on stdout
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .init();
    }
}

/// Run one model and persist the results.
async fn run_single(ctx: &AppContext, key: &str, variant: &str, probe: bool) -> Result<()> {
    let profile = ctx.profile(key)?;
    let mut runner = ctx.runner(ctx.backend()?, probe);

    let run = runner
        .run_suite(&profile, variant)
        .await
        .with_context(|| format!("Test suite for {} could not start", profile.name))?;

    render::print_summary(&run.summary);
    let path = ctx.store.save_run(&profile, &run.summary, &run.outcomes)?;
    println!("Results saved to {}", path.display());
    Ok(())
}

/// Run models sequentially, unloading each before the next, then compare.
async fn run_all(ctx: &AppContext, keys: Vec<String>, variant: &str, probe: bool) -> Result<()> {
    let keys = if keys.is_empty() {
        ctx.catalog.keys().into_iter().map(String::from).collect()
    } else {
        keys
    };
    let profiles = keys
        .iter()
        .map(|key| ctx.profile(key))
        .collect::<Result<Vec<_>>>()?;

    let backend = ctx.backend()?;
    let mut runner = ctx.runner(backend, probe);
    let mut summaries = Vec::with_capacity(profiles.len());

    for (i, profile) in profiles.iter().enumerate() {
        tracing::info!(
            model = %profile.name,
            position = i + 1,
            total = profiles.len(),
            "Testing model"
        );

        match runner.run_suite(profile, variant).await {
            Ok(run) => {
                render::print_summary(&run.summary);
                let path = ctx.store.save_run(profile, &run.summary, &run.outcomes)?;
                println!("Results saved to {}", path.display());
                summaries.push(run.summary);
            }
            Err(e) => {
                tracing::error!(model = %profile.name, error = %e, "Skipping model");
            }
        }

        if i + 1 < profiles.len() {
            if let Err(e) = runner.client_for(profile).unload().await {
                tracing::warn!(model = %profile.name, error = %e, "Failed to unload model");
            }
        }
    }

    if summaries.is_empty() {
        bail!("No model completed its test suite");
    }

    let report = analyze(&summaries)?;
    render::print_report(&report);
    let path = ctx.store.save_report(&report)?;
    println!("Comparative analysis saved to {}", path.display());
    Ok(())
}

/// Compare every saved run.
fn report(ctx: &AppContext, json: bool) -> Result<()> {
    let summaries = ctx.store.load_all_summaries()?;
    let report = match analyze(&summaries) {
        Ok(report) => report,
        Err(EvalError::NothingToAnalyze) => {
            eprintln!(
                "Nothing to analyze: no run files in {}",
                ctx.store.dir().display()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::print_report(&report);
    }
    let path = ctx.store.save_report(&report)?;
    eprintln!("Comparative analysis saved to {}", path.display());
    Ok(())
}

/// Models installed on the backend.
async fn backend_models(ctx: &AppContext) -> Result<()> {
    let backend = ctx.backend()?;
    let models = backend
        .list_models()
        .await
        .with_context(|| format!("Failed to list models at {}", ctx.endpoint))?;

    if models.is_empty() {
        println!("No models installed at {}", ctx.endpoint);
    }
    for model in models {
        let marker = if ctx.catalog.iter().any(|p| p.name == model) {
            "*"
        } else {
            " "
        };
        println!("{} {}", marker, model);
    }
    Ok(())
}
