use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::error::TableError;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    /// No value: an absent input cell or a date that failed to parse
    Missing,
    Text(String),
    Integer(i64),
    Number(f64),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric value of either numeric kind
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Semantic type shared by every value of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Text,
    Integer,
    Number,
    /// Canonical `YYYY-MM-DD` text
    Date,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn text<S: Into<String>>(name: &str, values: impl IntoIterator<Item = Option<S>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.map_or(Value::Missing, |s| Value::Text(s.into())))
            .collect();
        Self::new(name, ColumnKind::Text, values)
    }

    pub fn integer(name: &str, values: impl IntoIterator<Item = Option<i64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.map_or(Value::Missing, Value::Integer))
            .collect();
        Self::new(name, ColumnKind::Integer, values)
    }

    pub fn number(name: &str, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.map_or(Value::Missing, Value::Number))
            .collect();
        Self::new(name, ColumnKind::Number, values)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }
}

/// Ordered, named columns of equal length. Rows are positional.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != expected) {
                return Err(TableError::LengthMismatch {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.values.len(),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Caller guarantees distinct names and equal lengths
    pub(crate) fn from_columns_unchecked(columns: Vec<Column>) -> Self {
        debug_assert!(Table::from_columns(columns.clone()).is_ok());
        Self { columns }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub(crate) fn column_at_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Case-insensitive lookup ignoring surrounding whitespace.
    /// An exact lowercase spelling is preferred over other spellings.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.columns
            .iter()
            .position(|c| c.name.trim() == wanted)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.name.trim().to_lowercase() == wanted)
            })
    }

    /// Values of row `index`, in column order
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.num_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// Per-row flag: true when the row has at least one missing cell
    pub fn rows_with_missing(&self) -> Vec<bool> {
        let mut flags = vec![false; self.num_rows()];
        for column in &self.columns {
            for (flag, value) in flags.iter_mut().zip(&column.values) {
                *flag |= value.is_missing();
            }
        }
        flags
    }

    /// Keep the rows whose mask entry is true
    pub fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.num_rows());
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.values.retain(|_| flags.next().copied().unwrap_or(false));
        }
    }

    /// New table holding only the columns at `indices`, in that order
    pub fn select(&self, indices: &[usize]) -> Result<Table, TableError> {
        let columns = indices
            .iter()
            .filter_map(|&i| self.columns.get(i).cloned())
            .collect();
        Table::from_columns(columns)
    }
}
