//! @ai:module:intent CLI for the PVS benchmark harness
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pvs_bench::{
    config::{BenchmarkConfig, FilterConfig, ImprovementWeights, ModelConfig},
    evaluator::{Judge, MockJudge, ResponseEvaluator},
    metrics::{BenchmarkReport, MetricsAggregator},
    profile::{augment_profile, build_system_prompt, OpenAiEmbeddingClient, Profile, ProfileLoader},
    report::{JsonReporterTrait, ReportGenerator},
    runner::{create_adapter, Adapter, BenchmarkRunner, Provider},
    suite::{QuestionSuite, SuiteLoader, SuiteLoaderTrait},
    tokens::{analyze_for_model, known_models, optimize_profile},
};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_CONFIG_FILE: &str = "pvs-bench.toml";

const DRY_RUN_VERDICT: &str = r#"{"alignment": 4, "consistency": 4, "relevance": 4, "confidence": 0.6, "reasoning": "Dry run verdict."}"#;

#[derive(Parser)]
#[command(name = "pvs-bench")]
#[command(about = "Benchmark LLM responses with and without a PVS personal-context profile")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark
    Run(RunArgs),

    /// Estimate the token cost of the profile for a model
    Estimate {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Profile file (defaults to the configured path)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Model to check limits against
        #[arg(short, long, default_value = "gpt-4o")]
        model: String,

        /// Include a user query in the estimate
        #[arg(short, long)]
        query: Option<String>,

        /// Additional instructions appended to the system prompt
        #[arg(long)]
        addendum: Option<String>,
    },

    /// Suggest trims that shrink the profile prompt
    Optimize {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Profile file (defaults to the configured path)
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },

    /// Generate or inspect profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Regenerate Markdown and charts from a saved report
    Report {
        /// Path to a report JSON file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Add version and embedding to a hand-written profile
    Generate {
        /// Raw profile JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the augmented profile
        #[arg(short, long)]
        output: PathBuf,

        /// Embedding model
        #[arg(long)]
        embedding_model: Option<String>,
    },

    /// Print the system prompt rendered from a profile
    Show {
        /// Profile file
        #[arg(short, long)]
        profile: PathBuf,

        /// Additional instructions appended to the system prompt
        #[arg(long)]
        addendum: Option<String>,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Profile file (defaults to the configured path)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Question suite file (defaults to the configured path)
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Models as provider:model pairs (comma-separated)
    #[arg(short, long)]
    models: Option<String>,

    /// Improvement weights as time,token,length
    #[arg(short, long)]
    weights: Option<String>,

    /// Skip the AI judge and score heuristically only
    #[arg(long)]
    no_eval: bool,

    /// Run without making API calls
    #[arg(long)]
    dry_run: bool,

    /// Additional instructions appended to the system prompt
    #[arg(long)]
    addendum: Option<String>,

    /// Filter by categories (comma-separated)
    #[arg(long)]
    categories: Option<String>,

    /// Filter by question IDs (comma-separated)
    #[arg(long)]
    question_ids: Option<String>,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exact report file, overriding the generated name
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Suite name used in the report
    #[arg(long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pvs_bench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_benchmark(args).await,
        Commands::Estimate {
            config,
            profile,
            model,
            query,
            addendum,
        } => estimate(config, profile, &model, query, addendum),
        Commands::Optimize { config, profile } => optimize(config, profile),
        Commands::Profile { command } => match command {
            ProfileCommands::Generate {
                input,
                output,
                embedding_model,
            } => generate_profile(&input, &output, embedding_model).await,
            ProfileCommands::Show { profile, addendum } => show_profile(&profile, addendum),
        },
        Commands::Report { input } => regenerate_report(&input),
        Commands::Init { output } => init_config(output),
    }
}

/// @ai:intent Fold command-line overrides into the loaded configuration
/// @ai:effects pure
fn apply_overrides(config: &mut BenchmarkConfig, args: &RunArgs) -> Result<()> {
    if let Some(ref models) = args.models {
        config.models = models
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(ModelConfig::parse_spec)
            .collect::<pvs_bench::Result<_>>()?;
    }

    if let Some(ref weights) = args.weights {
        config.weights.set_improvement(ImprovementWeights::from_str(weights)?);
    }

    if args.no_eval {
        config.judge.enabled = false;
    }
    if args.dry_run {
        config.run.dry_run = true;
    }
    if args.addendum.is_some() {
        config.run.addendum = args.addendum.clone();
    }
    if let Some(ref profile) = args.profile {
        config.paths.profile = profile.clone();
    }
    if let Some(ref questions) = args.questions {
        config.paths.questions = questions.clone();
    }
    if let Some(ref output) = args.output {
        config.paths.results_dir = output.clone();
    }

    let filter = build_filter(args.categories.as_deref(), args.question_ids.as_deref());
    if filter.categories.is_some() || filter.question_ids.is_some() {
        config.run.filter = filter;
    }

    Ok(())
}

/// @ai:intent Run the benchmark end to end
/// @ai:effects network, fs:read, fs:write
async fn run_benchmark(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config.clone())?;
    apply_overrides(&mut config, &args)?;
    config.validate()?;

    if config.models.is_empty() {
        anyhow::bail!("No models configured; pass --models or add [[models]] to the config");
    }

    let profile = ProfileLoader::load(&config.paths.profile)?;
    tracing::info!("Loaded profile for {}", profile.owner_id());

    let mut suite = SuiteLoader::new().load_filtered(&config.paths.questions, &config.run.filter)?;
    if let Some(name) = args.name {
        suite.name = name;
    }

    if suite.questions.is_empty() {
        tracing::warn!("No questions match the filter criteria");
        return Ok(());
    }

    tracing::info!(
        "Found {} questions, {} models{}",
        suite.questions.len(),
        config.models.len(),
        if config.run.dry_run { " (dry run)" } else { "" }
    );

    let adapters = build_adapters(&config)?;

    let report = if !config.judge.enabled {
        execute(&config, adapters, None::<MockJudge>, profile, &suite).await
    } else if config.run.dry_run {
        execute(&config, adapters, Some(MockJudge::new(DRY_RUN_VERDICT)), profile, &suite).await
    } else {
        let judge = create_adapter(
            &ModelConfig {
                provider: config.judge.provider.clone(),
                model: config.judge.model.clone(),
            },
            &config.api,
        )?;
        execute(&config, adapters, Some(judge), profile, &suite).await
    };

    let json_path = ReportGenerator::new().generate_all(
        &report,
        &config.paths.results_dir,
        args.output_file.as_deref(),
    )?;

    print_summary(&report);
    println!("Report saved to {}", json_path.display());
    Ok(())
}

/// @ai:intent Build one adapter per configured model, swapping in mocks for dry runs
/// @ai:effects env
fn build_adapters(config: &BenchmarkConfig) -> Result<Vec<Adapter>> {
    config
        .models
        .iter()
        .map(|model| {
            let model = if config.run.dry_run {
                ModelConfig {
                    provider: Provider::Mock.to_string(),
                    model: model.model.clone(),
                }
            } else {
                model.clone()
            };
            create_adapter(&model, &config.api)
                .with_context(|| format!("Failed to set up {}:{}", model.provider, model.model))
        })
        .collect()
}

/// @ai:intent Wire the evaluator and runner for the chosen judge and run them
/// @ai:effects network
async fn execute<J: Judge>(
    config: &BenchmarkConfig,
    adapters: Vec<Adapter>,
    judge: Option<J>,
    profile: Profile,
    suite: &QuestionSuite,
) -> BenchmarkReport {
    let evaluator = match judge {
        Some(judge) => ResponseEvaluator::new(judge, profile.clone(), &config.weights),
        None => ResponseEvaluator::algorithmic_only(profile.clone()),
    };

    let runner = BenchmarkRunner::new(
        adapters,
        evaluator,
        MetricsAggregator::new(config.weights.improvement()),
        profile,
        config.run.addendum.clone(),
    );

    runner.run_benchmark(suite).await
}

/// @ai:intent Resolve the profile path from the flag or configuration
/// @ai:effects fs:read
fn load_profile(config: Option<PathBuf>, profile: Option<PathBuf>) -> Result<Profile> {
    let path = match profile {
        Some(p) => p,
        None => load_or_default_config(config)?.paths.profile,
    };
    Ok(ProfileLoader::load(&path)?)
}

/// @ai:intent Print token breakdown, limits and status for a model
/// @ai:effects fs:read, io
fn estimate(
    config: Option<PathBuf>,
    profile: Option<PathBuf>,
    model: &str,
    query: Option<String>,
    addendum: Option<String>,
) -> Result<()> {
    let profile = load_profile(config, profile)?;
    let analysis = analyze_for_model(&profile, model, query.as_deref(), addendum.as_deref());
    let breakdown = &analysis.breakdown;

    println!();
    println!("Token Estimate for {}", analysis.model);
    println!("========================");
    if !analysis.known_model {
        println!("(unknown model, using default limits)");
        println!("Known models: {}", known_models().collect::<Vec<_>>().join(", "));
    }
    println!();
    println!("{:<24} {:>8}", "Section", "Tokens");
    println!("{}", "-".repeat(33));
    println!("{:<24} {:>8}", "Header", breakdown.sections.header);
    println!("{:<24} {:>8}", "Identity & expertise", breakdown.sections.identity);
    println!("{:<24} {:>8}", "Communication style", breakdown.sections.communication_style);
    println!("{:<24} {:>8}", "Instructions", breakdown.sections.instructions);
    if breakdown.sections.additional > 0 {
        println!("{:<24} {:>8}", "Additional", breakdown.sections.additional);
    }
    println!("{}", "-".repeat(33));
    println!("{:<24} {:>8}", "System prompt", breakdown.system_prompt_tokens);
    if breakdown.query_tokens > 0 {
        println!("{:<24} {:>8}", "Query", breakdown.query_tokens);
    }
    println!("{:<24} {:>8}", "Total input", breakdown.total_input_tokens);
    println!("{:<24} {:>8}", "Max response", breakdown.max_response_tokens);
    println!("{:<24} {:>8}", "Total estimate", breakdown.total_estimate);
    println!();
    println!(
        "Limits: context {} / recommended {} / warning {}",
        analysis.limits.context_window,
        analysis.limits.recommended_system_prompt,
        analysis.limits.warning_threshold
    );
    println!("Status: {}", analysis.status);

    for suggestion in &analysis.suggestions {
        println!("  - {}", suggestion);
    }
    println!();

    Ok(())
}

/// @ai:intent Print the advisory optimization report
/// @ai:effects fs:read, io
fn optimize(config: Option<PathBuf>, profile: Option<PathBuf>) -> Result<()> {
    let profile = load_profile(config, profile)?;
    let report = optimize_profile(&profile);

    println!();
    println!("Profile Optimization");
    println!("====================");
    println!();
    println!("Current system prompt: {} tokens", report.current_tokens);

    if report.suggestions.is_empty() {
        println!("Profile is already compact.");
        println!();
        return Ok(());
    }

    println!();
    for suggestion in &report.suggestions {
        println!(
            "  [{}] {} (saves ~{} tokens)",
            suggestion.field, suggestion.description, suggestion.estimated_savings
        );
    }
    println!();
    println!(
        "Potential savings: {} tokens ({} -> {})",
        report.total_savings, report.current_tokens, report.optimized_tokens
    );
    println!();

    Ok(())
}

/// @ai:intent Augment a raw profile with version and embedding, then save it
/// @ai:effects network, fs:read, fs:write
async fn generate_profile(input: &Path, output: &Path, embedding_model: Option<String>) -> Result<()> {
    let profile = ProfileLoader::load(input)?;
    let client = OpenAiEmbeddingClient::from_env(embedding_model)?;

    let profile = augment_profile(profile, &client).await?;
    ProfileLoader::save(&profile, output)?;

    println!("Profile saved to {}", output.display());
    Ok(())
}

/// @ai:intent Print the rendered system prompt for a profile
/// @ai:effects fs:read, io
fn show_profile(path: &Path, addendum: Option<String>) -> Result<()> {
    let profile = ProfileLoader::load(path)?;
    println!("{}", build_system_prompt(&profile, addendum.as_deref()));
    Ok(())
}

/// @ai:intent Reload a saved report and rewrite its Markdown and charts
/// @ai:effects fs:read, fs:write
fn regenerate_report(input: &Path) -> Result<()> {
    let generator = ReportGenerator::new();
    let report = generator.json().load(input)?;
    let markdown = generator.generate_companions(&report, input)?;

    print_summary(&report);
    println!("Markdown written to {}", markdown.display());
    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchmarkConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchmarkConfig> {
    match path {
        Some(p) => BenchmarkConfig::load(&p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                BenchmarkConfig::load(&default_path)
                    .with_context(|| format!("Failed to load config {}", default_path.display()))
            } else {
                Ok(BenchmarkConfig::default())
            }
        }
    }
}

/// @ai:intent Build filter from CLI arguments
/// @ai:effects pure
fn build_filter(categories: Option<&str>, question_ids: Option<&str>) -> FilterConfig {
    let split = |s: &str| -> Vec<String> {
        s.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    };

    FilterConfig {
        categories: categories.map(split),
        question_ids: question_ids.map(split),
    }
}

/// @ai:intent Print summary to console
/// @ai:effects io
fn print_summary(report: &BenchmarkReport) {
    let summary = &report.summary;

    println!();
    println!("PVS Benchmark Results: {}", report.suite_name);
    println!("=================================");
    println!();
    println!(
        "{} questions x {} models, {} results ({} failed), {} scored pairs",
        report.total_questions,
        report.total_models,
        report.total_results,
        report.failed_results,
        report.scores.len()
    );
    println!();
    println!("{:<24} {:>10}", "Metric", "Value");
    println!("{}", "-".repeat(35));
    println!("{:<24} {:>9.2}%", "Average improvement", summary.average_improvement);
    println!("{:<24} {:>10}", "Best provider", summary.best_provider);
    println!("{:<24} {:>10}", "Most improved category", summary.most_improved_category);
    println!("{:<24} {:>10.2}", "Alignment", summary.average_scores.alignment);
    println!("{:<24} {:>10.2}", "Consistency", summary.average_scores.consistency);
    println!("{:<24} {:>10.2}", "Relevance", summary.average_scores.relevance);
    println!(
        "{:<24} {:>9.1}s",
        "Execution time",
        summary.total_execution_time_ms as f64 / 1000.0
    );

    if !summary.by_provider.is_empty() {
        println!();
        println!("{:<16} {:>6} {:>12}", "Provider", "Pairs", "Improvement");
        println!("{}", "-".repeat(36));
        for group in &summary.by_provider {
            println!(
                "{:<16} {:>6} {:>11.2}%",
                group.name, group.count, group.average_improvement
            );
        }
    }

    println!();
}
