//! Synthetic sales records for trying the pipeline locally.
//! Not used by the pipeline run itself.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::Path;

use crate::table::{Column, ColumnKind, Table, Value};

const CATEGORIES: &[&str] = &[
    "Electronics",
    "Clothing",
    "Furniture",
    "Toys",
    "Books",
    "Groceries",
];
const REGIONS: &[&str] = &["North", "South", "East", "West", "Central"];

/// Build `num_records` random rows: date, category, sales, product_id, region.
/// Dates fall within a year of 2023-11-01; sales are rounded to cents.
pub fn generate_sample_data<R: Rng + ?Sized>(num_records: usize, rng: &mut R) -> Table {
    let start_date = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap_or_default();

    let mut dates = Vec::with_capacity(num_records);
    let mut categories = Vec::with_capacity(num_records);
    let mut sales = Vec::with_capacity(num_records);
    let mut product_ids = Vec::with_capacity(num_records);
    let mut regions = Vec::with_capacity(num_records);

    for _ in 0..num_records {
        let date = start_date + Duration::days(rng.gen_range(0..=365));
        dates.push(Value::Text(date.format("%Y-%m-%d").to_string()));

        categories.push(pick(CATEGORIES, rng));

        let amount: f64 = rng.gen_range(10.0..1000.0);
        sales.push(Value::Number((amount * 100.0).round() / 100.0));

        product_ids.push(Value::Integer(rng.gen_range(1000..=2000)));

        regions.push(pick(REGIONS, rng));
    }

    let columns = vec![
        Column::new("date", ColumnKind::Text, dates),
        Column::new("category", ColumnKind::Text, categories),
        Column::new("sales", ColumnKind::Number, sales),
        Column::new("product_id", ColumnKind::Integer, product_ids),
        Column::new("region", ColumnKind::Text, regions),
    ];
    // All columns were filled in the same loop
    Table::from_columns(columns).unwrap_or_default()
}

fn pick<R: Rng + ?Sized>(choices: &[&str], rng: &mut R) -> Value {
    choices
        .choose(rng)
        .map_or(Value::Missing, |s| Value::Text(s.to_string()))
}

/// Write a table as comma-separated text with a header row.
/// Missing cells are written empty. Parent directories are created.
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), csv::Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.column_names())?;
    for index in 0..table.num_rows() {
        if let Some(row) = table.row(index) {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{load_table, LoadOptions};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generates_requested_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = generate_sample_data(250, &mut rng);

        assert_eq!(table.num_rows(), 250);
        assert_eq!(
            table.column_names(),
            vec!["date", "category", "sales", "product_id", "region"]
        );
        assert_eq!(table.missing_count(), 0);

        let lo = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        let hi = NaiveDate::from_ymd_opt(2024, 10, 31).unwrap();
        for value in &table.column("date").unwrap().values {
            let date = NaiveDate::parse_from_str(value.as_str().unwrap(), "%Y-%m-%d").unwrap();
            assert!(date >= lo && date <= hi);
        }
        for value in &table.column("sales").unwrap().values {
            let amount = value.as_f64().unwrap();
            assert!((10.0..=1000.0).contains(&amount));
            assert_eq!((amount * 100.0).round() / 100.0, amount);
        }
        for value in &table.column("product_id").unwrap().values {
            let id = value.as_i64().unwrap();
            assert!((1000..=2000).contains(&id));
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_sample_data(50, &mut StdRng::seed_from_u64(42));
        let b = generate_sample_data(50, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_written_csv_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("sample.csv");
        let table = generate_sample_data(20, &mut StdRng::seed_from_u64(1));

        write_csv(&table, &path).unwrap();
        let loaded = load_table(&path, &LoadOptions::default()).unwrap();

        assert_eq!(loaded.num_rows(), 20);
        assert_eq!(loaded.column_names(), table.column_names());
        assert_eq!(loaded.column("category"), table.column("category"));
        assert_eq!(loaded.column("product_id"), table.column("product_id"));
    }
}
