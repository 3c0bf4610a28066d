//! Transform stage: canonical dates, then sales totals per category.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::constants::CANONICAL_DATE_FORMAT;
use crate::schema::{self, AggregationColumns, Capabilities};
use crate::table::{Column, ColumnKind, Table, Value};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Result of the transform stage
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub table: Table,
    pub capabilities: Capabilities,
    /// Date cells that could not be parsed and now hold `Value::Missing`
    pub unparseable_dates: usize,
    pub aggregated: bool,
}

pub fn transform(mut table: Table) -> Transformed {
    let capabilities = schema::detect(&table);

    let mut unparseable_dates = 0;
    if let Some(date_idx) = capabilities.date {
        unparseable_dates = normalize_dates(&mut table, date_idx);
        info!("Dates standardized.");
        if unparseable_dates > 0 {
            // Validation already ran, so these survive into the output
            warn!(
                "{} date values could not be parsed and were left empty",
                unparseable_dates
            );
        }
    }

    let Some(columns) = capabilities.aggregation else {
        info!("No 'Category' or 'Sales' columns found for aggregation.");
        return Transformed {
            table,
            capabilities,
            unparseable_dates,
            aggregated: false,
        };
    };

    let summary = aggregate(&table, &columns);
    info!("Data aggregated by Category: {} groups", summary.num_rows());
    Transformed {
        table: summary,
        capabilities,
        unparseable_dates,
        aggregated: true,
    }
}

/// Rewrite the column at `index` to `YYYY-MM-DD` text. Returns how many
/// present values failed to parse (they become `Value::Missing`).
pub fn normalize_dates(table: &mut Table, index: usize) -> usize {
    let Some(column) = table.column_at_mut(index) else {
        return 0;
    };

    let mut failures = 0;
    for value in column.values.iter_mut() {
        let parsed = match value {
            Value::Missing => continue,
            Value::Text(s) => parse_date(s),
            Value::Integer(i) => parse_date(&i.to_string()),
            Value::Number(n) => parse_numeric_date(*n),
        };
        *value = match parsed {
            Some(date) => Value::Text(date.format(CANONICAL_DATE_FORMAT).to_string()),
            None => {
                failures += 1;
                Value::Missing
            }
        };
    }
    column.kind = ColumnKind::Date;
    failures
}

/// Parse a calendar date from the textual forms found in sales exports
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // Compact YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let (year, rest) = s.split_at(4);
        let (month, day) = rest.split_at(2);
        return NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?);
    }

    None
}

fn parse_numeric_date(n: f64) -> Option<NaiveDate> {
    if n.is_finite() && n.fract() == 0.0 && n >= 0.0 {
        parse_date(&format!("{}", n as u64))
    } else {
        None
    }
}

/// One row per distinct category with the summed sales. Groups come out
/// ordered by category text; every other column is dropped. Integer sales
/// stay integers unless a group total overflows `i64`.
///
/// Columns that don't exist, or the same index for both roles, leave the
/// table as it was.
pub fn aggregate(table: &Table, columns: &AggregationColumns) -> Table {
    let category = table.column_at(columns.category);
    let sales = table.column_at(columns.sales);
    let (Some(category), Some(sales)) = (category, sales) else {
        return table.clone();
    };
    if columns.category == columns.sales {
        return table.clone();
    }

    let mut groups: BTreeMap<String, (Value, i128, f64)> = BTreeMap::new();
    for (key, amount) in category.values.iter().zip(&sales.values) {
        let entry = groups
            .entry(key.to_string())
            .or_insert_with(|| (key.clone(), 0, 0.0));
        entry.1 += i128::from(amount.as_i64().unwrap_or(0));
        entry.2 += amount.as_f64().unwrap_or(0.0);
    }

    let integer_totals: Option<Vec<i64>> = match sales.kind {
        ColumnKind::Integer => groups
            .values()
            .map(|(_, total, _)| i64::try_from(*total).ok())
            .collect(),
        _ => None,
    };

    let (keys, float_totals): (Vec<Value>, Vec<Value>) = groups
        .into_values()
        .map(|(key, _, total)| (key, Value::Number(total)))
        .unzip();

    let totals = match integer_totals {
        Some(totals) => Column::new(
            sales.name.clone(),
            ColumnKind::Integer,
            totals.into_iter().map(Value::Integer).collect(),
        ),
        None => Column::new(sales.name.clone(), ColumnKind::Number, float_totals),
    };

    // Distinct indices of one table carry distinct names
    Table::from_columns_unchecked(vec![
        Column::new(category.name.clone(), category.kind, keys),
        totals,
    ])
}
