//! Loader stage: delimited text file to [`Table`].

use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, info, instrument};

use crate::constants;
use crate::error::LoadError;
use crate::table::{Column, ColumnKind, Table, Value};

/// Outcome of the loader stage; the validator decides what a failure means
pub type LoadResult = Result<Table, LoadError>;

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub delimiter: char,
    /// Cell contents (after trimming) treated as missing; blank cells always are
    pub na_values: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: constants::DEFAULT_DELIMITER,
            na_values: constants::default_na_values(),
        }
    }
}

impl LoadOptions {
    fn is_missing(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        trimmed.is_empty() || self.na_values.iter().any(|na| na == trimmed)
    }
}

/// Load a file with a header row. Failures are logged here and returned.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(path: P, options: &LoadOptions) -> LoadResult {
    let result = open_and_read(path.as_ref(), options);
    match &result {
        Ok(table) => info!(
            "Data loaded successfully: {} rows, {} columns",
            table.num_rows(),
            table.num_columns()
        ),
        Err(e) => error!("Error loading data: {}", e),
    }
    result
}

fn open_and_read(path: &Path, options: &LoadOptions) -> LoadResult {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(csv::Error::from)?;
    read_table(file, options)
}

/// Parse delimited text from any reader
pub fn read_table<R: Read>(reader: R, options: &LoadOptions) -> LoadResult {
    let delimiter = u8::try_from(options.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(LoadError::InvalidDelimiter(options.delimiter))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(LoadError::MissingHeader);
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            if options.is_missing(field) {
                column.push(None);
            } else {
                column.push(Some(field.to_string()));
            }
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();

    Ok(Table::from_columns(columns)?)
}

/// Parse every present cell with `parse`; `None` if any cell fails
fn parse_all<T>(
    raw: &[Option<String>],
    parse: impl Fn(&str) -> Option<T>,
) -> Option<Vec<Option<T>>> {
    raw.iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(s) => parse(s.trim()).map(Some),
        })
        .collect()
}

/// Integer when every present cell is an `i64`, number when every present
/// cell is an `f64`, otherwise text
fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    if let Some(integers) = parse_all(&raw, |s| s.parse::<i64>().ok()) {
        debug!("Column '{}' inferred as integer", name);
        let values = integers
            .into_iter()
            .map(|n| n.map_or(Value::Missing, Value::Integer))
            .collect();
        return Column::new(name, ColumnKind::Integer, values);
    }

    if let Some(numbers) = parse_all(&raw, |s| s.parse::<f64>().ok()) {
        debug!("Column '{}' inferred as number", name);
        let values = numbers
            .into_iter()
            .map(|n| n.map_or(Value::Missing, Value::Number))
            .collect();
        return Column::new(name, ColumnKind::Number, values);
    }

    debug!("Column '{}' inferred as text", name);
    let values = raw
        .into_iter()
        .map(|s| s.map_or(Value::Missing, Value::Text))
        .collect();
    Column::new(name, ColumnKind::Text, values)
}
