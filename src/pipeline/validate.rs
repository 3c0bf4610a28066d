//! Validator stage: drop every row that has a missing cell.

use tracing::{error, info};

use crate::error::{EtlError, Result};
use crate::pipeline::loader::LoadResult;
use crate::table::Table;

/// A table with no missing cells, plus what was removed to get there
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub table: Table,
    pub missing_cells: usize,
    pub dropped_rows: usize,
}

/// Fails hard when nothing was loaded; otherwise removes incomplete rows.
pub fn validate(loaded: LoadResult) -> Result<Validated> {
    let mut table = match loaded {
        Ok(table) => table,
        Err(e) => {
            error!("Data not loaded. Please check the data source.");
            return Err(EtlError::DataNotLoaded(e));
        }
    };

    let missing_cells = table.missing_count();
    if missing_cells == 0 {
        info!("No missing values found.");
        return Ok(Validated {
            table,
            missing_cells,
            dropped_rows: 0,
        });
    }

    info!("Found {} missing values. Cleaning data.", missing_cells);
    let keep: Vec<bool> = table.rows_with_missing().into_iter().map(|m| !m).collect();
    let before = table.num_rows();
    table.retain_rows(&keep);
    let dropped_rows = before - table.num_rows();
    info!("Dropped {} of {} rows", dropped_rows, before);

    Ok(Validated {
        table,
        missing_cells,
        dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::table::{Column, Value};
    use std::path::PathBuf;

    fn create_test_table() -> Table {
        Table::from_columns(vec![
            Column::text(
                "Date",
                [Some("2023-01-01"), Some("2023-01-02"), None, Some("2023-01-04")],
            ),
            Column::text(
                "Category",
                [Some("Electronics"), Some("Clothing"), Some("Electronics"), Some("Toys")],
            ),
            Column::number("Sales", [Some(100.0), Some(200.0), Some(150.0), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_removes_rows_with_missing_cells() {
        let validated = validate(Ok(create_test_table())).unwrap();

        assert_eq!(validated.missing_cells, 2);
        assert_eq!(validated.dropped_rows, 2);
        assert_eq!(validated.table.missing_count(), 0);
        assert_eq!(
            validated.table.column("Category").unwrap().values,
            vec![
                Value::Text("Electronics".to_string()),
                Value::Text("Clothing".to_string())
            ]
        );
    }

    #[test]
    fn test_complete_table_is_unchanged() {
        let mut table = create_test_table();
        table.retain_rows(&[true, true, false, false]);

        let validated = validate(Ok(table.clone())).unwrap();
        assert_eq!(validated.table, table);
        assert_eq!(validated.missing_cells, 0);
        assert_eq!(validated.dropped_rows, 0);
    }

    #[test]
    fn test_no_table_is_a_hard_failure() {
        let result = validate(Err(LoadError::NotFound(PathBuf::from("missing.csv"))));
        assert!(matches!(result, Err(EtlError::DataNotLoaded(LoadError::NotFound(_)))));
    }

    #[test]
    fn test_every_row_incomplete_leaves_empty_table() {
        let table = Table::from_columns(vec![
            Column::number("a", [None, Some(1.0)]),
            Column::number("b", [Some(1.0), None]),
        ])
        .unwrap();

        let validated = validate(Ok(table)).unwrap();
        assert_eq!(validated.table.num_rows(), 0);
        assert_eq!(validated.table.column_names(), vec!["a", "b"]);
    }
}
