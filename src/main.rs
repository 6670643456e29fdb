use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use donor_lib::job::JobRunner;
use donor_lib::matching::similarity::compare_names;
use donor_lib::matching::{AliasMap, GatePolicy, LinePipeline};
use donor_lib::utils::env::load_env;
use donor_lib::utils::job_config::JobConfig;
use donor_lib::utils::progress_bars::logging::JobLogger;
use donor_lib::utils::progress_bars::progress_config::ProgressConfig;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader, BufWriter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Screen a contribution file and print rows whose donor looks unlike their employer
    Run(RunArgs),
    /// Show how two names compare after condensing
    Score(ScoreArgs),
}

#[derive(Args)]
struct RunArgs {
    /// JSON alias map of raw organization name -> canonical name (overrides ALIAS_MAP_PATH)
    #[arg(long)]
    alias_map: Option<PathBuf>,

    /// JSON list of exclusion rules (overrides EXCLUSION_RULES_PATH)
    #[arg(long)]
    exclusions: Option<PathBuf>,

    /// Input file; reads stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file; writes stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Lines per worker batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Maximum batches processed at once
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Args)]
struct ScoreArgs {
    name_a: String,
    name_b: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging and environment
    env_logger::init();
    load_env();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args).await,
        Command::Score(args) => {
            score(args);
            Ok(())
        }
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let mut config = JobConfig::from_env();
    if args.alias_map.is_some() {
        config.alias_map_path = args.alias_map;
    }
    if args.exclusions.is_some() {
        config.exclusions_path = args.exclusions;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(workers) = args.workers {
        config.worker_count = workers;
    }
    config.log_config();

    let progress_config = ProgressConfig::from_env();
    let logger = JobLogger::screening();
    let input_label = args
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());
    logger.log_start(&input_label, config.batch_size, config.worker_count);

    logger.log_phase("Loading alias map", None);
    let alias_path = config.require_alias_map_path()?;
    let alias_map = AliasMap::load(alias_path)?;
    let policy = GatePolicy::new(config.load_exclusion_rules()?);
    logger.log_alias_map_loaded(alias_map.len(), policy.exclusions().len());

    let pipeline = LinePipeline::new(Arc::new(alias_map), Arc::new(policy));
    let runner = JobRunner::new(pipeline, config.batch_size, config.worker_count)
        .with_progress(progress_config.create_line_spinner()?)
        .with_logger(logger.clone());

    let reader: Box<dyn AsyncRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };
    let writer: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => Box::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create output {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdout()),
    };

    logger.log_phase("Screening records", Some(&input_label));
    let mut writer = BufWriter::new(writer);
    let stats = runner.run(BufReader::new(reader), &mut writer).await?;

    logger.log_completion(&stats);
    info!("Screening finished in {:.2?}", logger.get_elapsed());
    Ok(())
}

fn score(args: ScoreArgs) {
    let cmp = compare_names(&args.name_a, &args.name_b);
    println!("a: {:?} -> {:?}", args.name_a, cmp.condensed_a);
    println!("b: {:?} -> {:?}", args.name_b, cmp.condensed_b);
    println!("ratio:                  {}", cmp.score);
    println!("jaro-winkler:           {:.3}", cmp.jaro_winkler);
    println!("normalized levenshtein: {:.3}", cmp.normalized_levenshtein);
}
