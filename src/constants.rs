/// Default locations used when the pipeline runs without overrides.
/// These mirror the batch job's historical layout on the operator's machine.

// Input
pub const DEFAULT_INPUT_PATH: &str = "data/sample_data.csv";
pub const DEFAULT_DELIMITER: char = ',';

// Destination store
pub const DEFAULT_DATABASE_PATH: &str = "data_warehouse.db";
pub const DEFAULT_TABLE_NAME: &str = "Sales_summary";

// Optional configuration file read by the pipeline binary
pub const CONFIG_FILE_NAME: &str = "etl.toml";

// Recognized column names (matched case-insensitively)
pub const DATE_COLUMN: &str = "date";
pub const CATEGORY_COLUMN: &str = "category";
pub const SALES_COLUMN: &str = "sales";

/// Canonical textual date format written by the transform stage
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Cell contents treated as missing when loading, in addition to blank cells
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "NULL", "null", "None", "#N/A", "<NA>",
];

// Sample data generator
pub const DEFAULT_SAMPLE_RECORDS: usize = 10_000;

/// Get the default NA tokens as owned strings
pub fn default_na_values() -> Vec<String> {
    DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
}
