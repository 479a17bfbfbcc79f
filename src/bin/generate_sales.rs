use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use flip_finder::export::write_csv;
use flip_finder::ingest::{generate_sales, SyntheticConfig};
use std::fs::File;
use std::path::PathBuf;

/// Generate a synthetic county sale-record CSV for demos and load testing
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of properties
    #[arg(short, long, default_value = "1000")]
    properties: usize,

    /// RNG seed; the same seed always writes the same file
    #[arg(short, long, default_value = "42")]
    seed: u64,

    #[arg(long, default_value = "Fulton")]
    county: String,

    #[arg(long, default_value = "Atlanta")]
    city: String,

    /// Earliest first-sale date (YYYY-MM-DD)
    #[arg(long, default_value = "2022-01-01")]
    start: NaiveDate,

    /// Share of properties bought and resold by investors (0.0 - 1.0)
    #[arg(long, default_value = "0.3")]
    investor_share: f64,

    #[arg(short, long, default_value = "sales.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !(0.0..=1.0).contains(&args.investor_share) {
        anyhow::bail!("--investor-share must be between 0 and 1 (got {})", args.investor_share);
    }

    let config = SyntheticConfig {
        properties: args.properties,
        county: args.county,
        city: args.city,
        start: args.start,
        investor_share: args.investor_share,
        seed: args.seed,
    };

    let sales = generate_sales(&config);

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_csv(file, &sales)?;

    println!(
        "Wrote {} sales for {} properties in {} to {}",
        sales.len(),
        config.properties,
        config.county,
        args.output.display()
    );

    Ok(())
}
