use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sales_etl::constants::{DEFAULT_INPUT_PATH, DEFAULT_SAMPLE_RECORDS};
use sales_etl::logging;
use sales_etl::sample::{generate_sample_data, write_csv};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "generate-sample-data")]
#[command(about = "Write synthetic sales records for the ETL pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Number of records to generate
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RECORDS)]
    records: usize,

    /// Seed for reproducible output (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init_logging(None);
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let table = generate_sample_data(cli.records, &mut rng);
    write_csv(&table, &cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!("Generated {} records", table.num_rows());
    println!("✅ Sample data generated and saved to {}", cli.output.display());
    Ok(())
}
