//! Maps a table's columns onto the roles the transform stage understands.

use serde::Serialize;
use tracing::warn;

use crate::constants::{CATEGORY_COLUMN, DATE_COLUMN, SALES_COLUMN};
use crate::table::Table;

/// Column positions needed for category aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregationColumns {
    pub category: usize,
    pub sales: usize,
}

/// What the transform stage can do with a given table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    pub date: Option<usize>,
    pub aggregation: Option<AggregationColumns>,
}

impl Capabilities {
    pub fn has_date(&self) -> bool {
        self.date.is_some()
    }

    pub fn has_category_and_sales(&self) -> bool {
        self.aggregation.is_some()
    }
}

/// Inspect column names and kinds and describe the applicable transforms
pub fn detect(table: &Table) -> Capabilities {
    let date = table.find_column(DATE_COLUMN);

    let category = table.find_column(CATEGORY_COLUMN);
    let sales = table.find_column(SALES_COLUMN);
    let aggregation = match (category, sales) {
        (Some(category), Some(sales)) => {
            let numeric = table.column_at(sales).is_some_and(|c| c.kind.is_numeric());
            if numeric {
                Some(AggregationColumns { category, sales })
            } else {
                warn!(
                    "Sales column '{}' is not numeric; aggregation disabled",
                    table.column_at(sales).map_or("", |c| c.name.as_str())
                );
                None
            }
        }
        _ => None,
    };

    Capabilities { date, aggregation }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn test_detects_all_roles() {
        let table = Table::from_columns(vec![
            Column::text("Date", [Some("2023-01-01")]),
            Column::text("Category", [Some("Toys")]),
            Column::number("Sales", [Some(10.0)]),
            Column::text("region", [Some("North")]),
        ])
        .unwrap();

        let caps = detect(&table);
        assert_eq!(caps.date, Some(0));
        assert_eq!(caps.aggregation, Some(AggregationColumns { category: 1, sales: 2 }));
        assert!(caps.has_date());
        assert!(caps.has_category_and_sales());
    }

    #[test]
    fn test_integer_sales_can_be_aggregated() {
        let table = Table::from_columns(vec![
            Column::text("category", [Some("Toys")]),
            Column::integer("sales", [Some(3)]),
        ])
        .unwrap();

        assert!(detect(&table).has_category_and_sales());
    }

    #[test]
    fn test_missing_sales_disables_aggregation() {
        let table = Table::from_columns(vec![
            Column::text("date", [Some("2023-01-01")]),
            Column::text("category", [Some("Toys")]),
        ])
        .unwrap();

        let caps = detect(&table);
        assert!(caps.has_date());
        assert!(!caps.has_category_and_sales());
    }

    #[test]
    fn test_text_sales_disables_aggregation() {
        let table = Table::from_columns(vec![
            Column::text("category", [Some("Toys")]),
            Column::text("sales", [Some("lots")]),
        ])
        .unwrap();

        assert_eq!(detect(&table), Capabilities::default());
    }
}
