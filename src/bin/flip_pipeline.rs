use anyhow::Context;
use clap::Parser;
use flip_finder::ingest::{load_all_with, CsvSource, TransactionSource, DEFAULT_MAX_WORKERS};
use flip_finder::utils::{init_from_config, init_logger};
use flip_finder::{Config, Exporter, FileExporter, FlipPipeline, TracingSink};
use std::path::PathBuf;
use tracing::{info, warn};

/// Detect house flips in county sale records and rank investors for outreach
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to $CONFIG_FILE, then config/default.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transaction CSV file, one per county batch
    #[arg(short, long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Only analyze these counties
    #[arg(long, value_delimiter = ',')]
    counties: Vec<String>,

    /// Directory for CSV tables and dashboard JSON
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Input files loaded at the same time
    #[arg(short, long, default_value_t = DEFAULT_MAX_WORKERS)]
    workers: usize,

    /// Debug-level logging regardless of config
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    if args.verbose {
        init_logger("debug", config.logging.output == "json", None)?;
    } else {
        init_from_config(&config.logging)?;
    }

    info!(
        min_hold_days = config.matching.min_hold_days,
        max_hold_days = config.matching.max_hold_days,
        min_profit = %config.matching.min_profit,
        max_profit = %config.matching.max_profit,
        strategy = %config.matching.strategy,
        "Configuration loaded"
    );

    let sources: Vec<Box<dyn TransactionSource>> = args
        .inputs
        .iter()
        .map(|path| Box::new(CsvSource::new(path)) as Box<dyn TransactionSource>)
        .collect();

    let outcome = load_all_with(&sources, args.workers)?;
    for (source, error) in &outcome.failures {
        warn!(source = %source, error = %error, "Input skipped");
    }

    let mut transactions = outcome.transactions;
    transactions.retain_counties(&args.counties);
    info!(
        transactions = transactions.len(),
        properties = transactions.property_count(),
        "Transactions ready"
    );

    let pipeline = FlipPipeline::new(&config)?;
    let output = pipeline
        .run(&transactions, &TracingSink)
        .context("Pipeline run failed")?;

    FileExporter::new(&args.output_dir).export(&output, &config.report)?;

    output.summary.print_summary();
    println!("Results saved to: {}", args.output_dir.display());

    Ok(())
}
