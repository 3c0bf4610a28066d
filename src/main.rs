use anyhow::Context;
use sales_etl::constants::CONFIG_FILE_NAME;
use sales_etl::{logging, Pipeline, PipelineConfig};
use tracing::{debug, error, info};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let (config, source) = PipelineConfig::load_or_default(CONFIG_FILE_NAME)
        .with_context(|| format!("invalid {}", CONFIG_FILE_NAME))?;
    let _log_guard = logging::init_logging(config.log_dir.as_deref());
    info!("Using configuration from {}", source);

    info!("🚀 Running sales ETL pipeline");
    let pipeline = Pipeline::new(config);

    let result = match pipeline.run() {
        Ok(result) => result,
        Err(e) => {
            error!("Pipeline halted: {}", e);
            return Err(e.into());
        }
    };
    debug!("Run summary: {}", serde_json::to_string(&result)?);

    println!("\n📊 Pipeline Results for {}:", result.input_path.display());
    println!("   Rows loaded: {}", result.rows_loaded);
    println!("   Missing values: {}", result.missing_cells);
    println!("   Rows dropped: {}", result.dropped_rows);
    if result.unparseable_dates > 0 {
        println!("   Unparseable dates: {}", result.unparseable_dates);
    }
    println!("   Aggregated by category: {}", if result.aggregated { "yes" } else { "no" });
    println!("   Output rows: {}", result.output_rows);
    match (&result.persisted, &result.persist_error) {
        (Some(report), _) => println!(
            "   Written to: {} ({})",
            report.table,
            report.database.display()
        ),
        (None, Some(e)) => println!("   ⚠️  Not persisted: {}", e),
        (None, None) => {}
    }

    Ok(())
}
