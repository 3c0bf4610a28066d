pub mod loader;
pub mod persist;
pub mod transform;
pub mod validate;

use metrics::{counter, histogram};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::table::Table;

pub use loader::{load_table, read_table, LoadOptions, LoadResult};
pub use persist::{persist, PersistReport};
pub use transform::{transform, Transformed};
pub use validate::{validate, Validated};

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub input_path: PathBuf,
    pub rows_loaded: usize,
    pub missing_cells: usize,
    pub dropped_rows: usize,
    pub unparseable_dates: usize,
    pub aggregated: bool,
    pub output_rows: usize,
    pub destination_table: String,
    pub persisted: Option<PersistReport>,
    pub persist_error: Option<String>,
}

/// Load, validate, transform and persist, once, in that order
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage. The only error returned is a failed load, surfaced by
    /// the validator; a persist failure is logged and reported in the result.
    #[instrument(skip(self), fields(input = %self.config.input_path.display()))]
    pub fn run(&self) -> Result<PipelineResult> {
        counter!("etl_pipeline_runs_total").increment(1);
        let t_pipeline = Instant::now();

        // Step 1: Load
        info!("📥 Loading {}", self.config.input_path.display());
        let loaded = load_table(&self.config.input_path, &self.config.load_options());
        let rows_loaded = loaded.as_ref().map(Table::num_rows).unwrap_or(0);
        counter!("etl_rows_loaded_total").increment(rows_loaded as u64);

        // Step 2: Validate (hard stop when nothing was loaded)
        let validated = match validate(loaded) {
            Ok(validated) => validated,
            Err(e) => {
                counter!("etl_pipeline_failures_total").increment(1);
                return Err(e);
            }
        };
        counter!("etl_rows_dropped_total").increment(validated.dropped_rows as u64);

        // Step 3: Transform
        let transformed = transform(validated.table);
        counter!("etl_unparseable_dates_total").increment(transformed.unparseable_dates as u64);

        // Step 4: Persist (failures don't end the run with an error)
        let outcome = persist(&transformed.table, &self.config.destination);
        let (persisted, persist_error) = match outcome {
            Ok(report) => (Some(report), None),
            Err(e) => {
                warn!("Summary was not persisted");
                counter!("etl_persist_failures_total").increment(1);
                (None, Some(e.to_string()))
            }
        };

        histogram!("etl_pipeline_duration_seconds").record(t_pipeline.elapsed().as_secs_f64());

        Ok(PipelineResult {
            input_path: self.config.input_path.clone(),
            rows_loaded,
            missing_cells: validated.missing_cells,
            dropped_rows: validated.dropped_rows,
            unparseable_dates: transformed.unparseable_dates,
            aggregated: transformed.aggregated,
            output_rows: transformed.table.num_rows(),
            destination_table: self.config.destination.table.clone(),
            persisted,
            persist_error,
        })
    }
}
