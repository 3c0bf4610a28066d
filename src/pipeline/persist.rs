//! Persist stage: replace a SQLite table with the contents of a [`Table`].

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument};

use crate::config::Destination;
use crate::error::PersistError;
use crate::table::{ColumnKind, Table, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistReport {
    pub database: PathBuf,
    pub table: String,
    pub rows_written: usize,
}

/// Drop and recreate `destination.table`, then insert every row.
/// Failures are logged here and returned for the caller to ignore or inspect.
#[instrument(
    skip_all,
    fields(database = %destination.database.display(), table = %destination.table)
)]
pub fn persist(table: &Table, destination: &Destination) -> Result<PersistReport, PersistError> {
    let result = write_table(table, destination);
    match &result {
        Ok(report) => info!(
            "Data loaded successfully into {} table in {} ({} rows).",
            report.table,
            report.database.display(),
            report.rows_written
        ),
        Err(e) => error!("Error loading data to database: {}", e),
    }
    result
}

fn write_table(table: &Table, destination: &Destination) -> Result<PersistReport, PersistError> {
    if destination.table.trim().is_empty() {
        return Err(PersistError::EmptyTableName);
    }
    if table.num_columns() == 0 {
        return Err(PersistError::NoColumns);
    }

    let target = quote_identifier(&destination.table);
    let column_defs: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("{} {}", quote_identifier(&c.name), sql_type(c.kind)))
        .collect();
    let column_names: Vec<String> = table
        .columns()
        .iter()
        .map(|c| quote_identifier(&c.name))
        .collect();
    let placeholders: Vec<String> = (1..=table.num_columns()).map(|i| format!("?{}", i)).collect();

    let mut conn = Connection::open(&destination.database)?;
    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {target};\nCREATE TABLE {target} ({});",
        column_defs.join(", ")
    ))?;
    debug!("Recreated table {}", target);

    let rows_written = {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {target} ({}) VALUES ({})",
            column_names.join(", "),
            placeholders.join(", ")
        ))?;
        let mut written = 0;
        for index in 0..table.num_rows() {
            let row = table
                .columns()
                .iter()
                .map(|c| to_sql(&c.values[index]));
            written += stmt.execute(params_from_iter(row))?;
        }
        written
    };
    tx.commit()?;
    conn.close().map_err(|(_, e)| e)?;

    Ok(PersistReport {
        database: destination.database.clone(),
        table: destination.table.clone(),
        rows_written,
    })
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Integer => "INTEGER",
        ColumnKind::Number => "REAL",
        ColumnKind::Text | ColumnKind::Date => "TEXT",
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Missing => SqlValue::Null,
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Number(n) => SqlValue::Real(*n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use tempfile::TempDir;

    fn summary_table() -> Table {
        Table::from_columns(vec![
            Column::text("category", [Some("Clothing"), Some("Electronics")]),
            Column::number("sales", [Some(200.0), Some(100.0)]),
        ])
        .unwrap()
    }

    fn destination(dir: &TempDir, table: &str) -> Destination {
        Destination {
            database: dir.path().join("warehouse.db"),
            table: table.to_string(),
        }
    }

    fn count_rows(dest: &Destination) -> i64 {
        let conn = Connection::open(&dest.database).unwrap();
        conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(&dest.table)),
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_writes_rows_and_types() {
        let dir = TempDir::new().unwrap();
        let dest = destination(&dir, "Sales_summary");

        let report = persist(&summary_table(), &dest).unwrap();
        assert_eq!(report.rows_written, 2);
        assert_eq!(count_rows(&dest), 2);

        let conn = Connection::open(&dest.database).unwrap();
        let total: f64 = conn
            .query_row("SELECT SUM(sales) FROM \"Sales_summary\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(total, 300.0);
        let declared: String = conn
            .query_row(
                "SELECT type FROM pragma_table_info('Sales_summary') WHERE name = 'sales'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(declared, "REAL");
    }

    #[test]
    fn test_replaces_existing_table() {
        let dir = TempDir::new().unwrap();
        let dest = destination(&dir, "Sales_summary");

        persist(&summary_table(), &dest).unwrap();
        persist(&summary_table(), &dest).unwrap();
        assert_eq!(count_rows(&dest), 2);

        let mut smaller = summary_table();
        smaller.retain_rows(&[true, false]);
        persist(&smaller, &dest).unwrap();
        assert_eq!(count_rows(&dest), 1);
    }

    #[test]
    fn test_integers_are_stored_exactly() {
        let dir = TempDir::new().unwrap();
        let dest = destination(&dir, "orders");
        let table = Table::from_columns(vec![
            Column::integer("order_id", [Some(9_007_199_254_740_993)]),
            Column::text("region", [Some("North")]),
        ])
        .unwrap();

        persist(&table, &dest).unwrap();

        let conn = Connection::open(&dest.database).unwrap();
        let (id, storage): (i64, String) = conn
            .query_row("SELECT order_id, typeof(order_id) FROM orders", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(id, 9_007_199_254_740_993);
        assert_eq!(storage, "integer");
    }

    #[test]
    fn test_missing_values_become_null() {
        let dir = TempDir::new().unwrap();
        let dest = destination(&dir, "dates");
        let table =
            Table::from_columns(vec![Column::text("date", [Some("2023-01-01"), None])]).unwrap();

        persist(&table, &dest).unwrap();

        let conn = Connection::open(&dest.database).unwrap();
        let nulls: i64 = conn
            .query_row("SELECT COUNT(*) FROM dates WHERE date IS NULL", [], |row| row.get(0))
            .unwrap();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn test_quotes_awkward_names() {
        let dir = TempDir::new().unwrap();
        let dest = destination(&dir, "sales \"summary\"; DROP");
        let table =
            Table::from_columns(vec![Column::number("total \"net\"", [Some(1.0)])]).unwrap();

        persist(&table, &dest).unwrap();
        assert_eq!(count_rows(&dest), 1);
    }

    #[test]
    fn test_rejects_empty_table_name_and_no_columns() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            persist(&summary_table(), &destination(&dir, " ")),
            Err(PersistError::EmptyTableName)
        ));
        assert!(matches!(
            persist(&Table::default(), &destination(&dir, "t")),
            Err(PersistError::NoColumns)
        ));
    }

    #[test]
    fn test_unreachable_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        let dest = Destination {
            database: dir.path().join("no_such_dir").join("warehouse.db"),
            table: "Sales_summary".to_string(),
        };
        assert!(matches!(persist(&summary_table(), &dest), Err(PersistError::Sqlite(_))));
    }
}
