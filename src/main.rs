use clap::{Args, Parser, Subcommand};
use resilience_ranker::config::{AppConfig, ConfigError};
use resilience_ranker::error::AppError;
use resilience_ranker::telemetry;
use resilience_ranker::workflows::onet::OccupationImporter;
use resilience_ranker::workflows::pipeline::{
    finalize, write_rankings, AnthropicScorer, BatchRunner, BatchStatus, CacheStore,
    FailurePolicy, ProgressLog, RankedRow, RunReport, RunnerConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "resilience-ranker",
    about = "Score occupations for AI resilience and rank them against labor-market signals",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score unscored occupations via the scoring service, then rank (default)
    Score(ScoreArgs),
    /// Recompute rankings from cached scores without any scoring calls
    Rank(RankArgs),
}

#[derive(Args, Debug, Default)]
struct ScoreArgs {
    /// Override the configured O*NET input CSV
    #[arg(long)]
    input: Option<PathBuf>,
    /// Override the configured ranked output CSV
    #[arg(long)]
    output: Option<PathBuf>,
    /// Occupations per scoring call
    #[arg(long)]
    batch_size: Option<usize>,
    /// Fixed pause between successful batches, in seconds
    #[arg(long)]
    batch_delay_secs: Option<u64>,
    /// Skip batches before this index (forced resume point)
    #[arg(long)]
    start_batch: Option<usize>,
    /// Override the configured scoring model identifier
    #[arg(long)]
    model: Option<String>,
    /// Keep going when a batch fails instead of halting the run
    #[arg(long)]
    continue_on_failure: bool,
}

#[derive(Args, Debug, Default)]
struct RankArgs {
    /// Override the configured O*NET input CSV
    #[arg(long)]
    input: Option<PathBuf>,
    /// Override the configured ranked output CSV
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Score(ScoreArgs::default()));

    match command {
        Command::Score(args) => run_score(args).await,
        Command::Rank(args) => run_rank(args),
    }
}

async fn run_score(mut args: ScoreArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if let Some(input) = args.input.take() {
        config.paths.input_csv = input;
    }
    if let Some(output) = args.output.take() {
        config.paths.output_csv = output;
    }
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize.into());
        }
        config.pipeline.batch_size = batch_size;
    }
    if let Some(delay) = args.batch_delay_secs {
        config.pipeline.batch_delay_secs = delay;
    }
    if let Some(start_batch) = args.start_batch {
        config.pipeline.start_batch = start_batch;
    }
    if let Some(model) = args.model.take() {
        config.scorer.model = model;
    }

    let api_key = config
        .scorer
        .api_key
        .clone()
        .ok_or(ConfigError::MissingApiKey)?;
    let system_prompt = match &config.scorer.skill_file {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };

    let occupations = OccupationImporter::from_path(&config.paths.input_csv)?;
    info!(
        occupations = occupations.len(),
        input = %config.paths.input_csv.display(),
        "loaded scoreable occupations"
    );

    let scorer = AnthropicScorer::new(
        config.scorer.model.clone(),
        api_key,
        config.scorer.max_tokens,
        system_prompt,
    )?;
    let cache = CacheStore::open(&config.paths.cache_file)?;
    let progress = ProgressLog::new(&config.paths.progress_log);
    let runner_config = RunnerConfig {
        batch_size: config.pipeline.batch_size,
        batch_delay: Duration::from_secs(config.pipeline.batch_delay_secs),
        start_batch: config.pipeline.start_batch,
        failure_policy: if args.continue_on_failure {
            FailurePolicy::Skip
        } else {
            FailurePolicy::Halt
        },
    };

    let mut runner = BatchRunner::new(scorer, cache, progress, runner_config);
    let report = runner.run(&occupations).await?;

    write_rankings(&config.paths.output_csv, &report.rows)?;
    render_run_summary(&report, &config.paths.output_csv.display().to_string());

    Ok(())
}

fn run_rank(mut args: RankArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if let Some(input) = args.input.take() {
        config.paths.input_csv = input;
    }
    if let Some(output) = args.output.take() {
        config.paths.output_csv = output;
    }

    let occupations = OccupationImporter::from_path(&config.paths.input_csv)?;
    let mut cache = CacheStore::open(&config.paths.cache_file)?;
    let rows = finalize(&mut cache, &occupations)?;

    write_rankings(&config.paths.output_csv, &rows)?;
    println!(
        "Ranked {} occupations from cached scores -> {}",
        rows.len(),
        config.paths.output_csv.display()
    );
    render_top_rows(&rows);

    Ok(())
}

fn render_run_summary(report: &RunReport, output_path: &str) {
    println!("Scoring run summary");
    println!(
        "Batches: {} total, {} completed",
        report.batches.len(),
        report.completed()
    );

    let failed: Vec<_> = report.failed().collect();
    if failed.is_empty() {
        println!("Failed batches: none");
    } else {
        println!("Failed batches (rerun to retry):");
        for batch in failed {
            let reason = batch.error.as_deref().unwrap_or("unknown");
            println!("- batch {} ({} occupations): {reason}", batch.index, batch.size);
        }
    }

    let pending = report
        .batches
        .iter()
        .filter(|batch| batch.status == BatchStatus::Pending)
        .count();
    if pending > 0 {
        println!("Skipped before the start batch: {pending}");
    }

    println!("\nRanked {} occupations -> {output_path}", report.rows.len());
    render_top_rows(&report.rows);
}

fn render_top_rows(rows: &[RankedRow]) {
    if rows.is_empty() {
        return;
    }

    println!("\nTop {}:", rows.len().min(10));
    for row in rows.iter().take(10) {
        println!(
            "  {:.3}  {:>4}  {}",
            row.final_ranking, row.ai_proof_score, row.occupation
        );
    }
}
