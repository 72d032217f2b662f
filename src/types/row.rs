use crate::error::{Result, SqlRsError};
use crate::types::SqlValue;

/// Driver-agnostic raw result from a database query.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQueryResult {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<SqlValue>>,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// Zero/one/many classification of a row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Zero,
    One,
    Many(usize),
}

impl Cardinality {
    pub fn of(count: usize) -> Self {
        match count {
            0 => Cardinality::Zero,
            1 => Cardinality::One,
            n => Cardinality::Many(n),
        }
    }
}

/// A single row result from a query.
/// Columns keep the engine's order and are looked up by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<(String, SqlValue)>,
}

impl Row {
    /// Creates a new Row from column names and values.
    pub(crate) fn new(columns: &[String], values: Vec<SqlValue>) -> Self {
        let values = columns.iter().cloned().zip(values).collect();
        Self { values }
    }

    /// Gets a value by column name.
    pub fn get(&self, column: &str) -> Result<&SqlValue> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .ok_or_else(|| SqlRsError::ColumnNotFound(column.to_string()))
    }

    /// Gets a value by column position.
    pub fn get_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index).map(|(_, value)| value)
    }

    /// Returns all column names in this row.
    pub fn columns(&self) -> Vec<&str> {
        self.values.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Consumes the row, returning the first column's value.
    pub fn into_first(self) -> Option<SqlValue> {
        self.values.into_iter().next().map(|(_, value)| value)
    }
}

/// Result of a query execution, containing zero or more rows.
#[derive(Debug)]
pub struct QueryResult {
    rows: Vec<Row>,
}

impl QueryResult {
    /// Creates a QueryResult from a RawQueryResult.
    pub fn from_raw(raw: RawQueryResult) -> Self {
        let rows = raw
            .rows
            .into_iter()
            .map(|values| Row::new(&raw.columns, values))
            .collect();
        Self { rows }
    }

    pub fn cardinality(&self) -> Cardinality {
        Cardinality::of(self.rows.len())
    }

    /// Extracts a single row from the result.
    /// Zero rows fails `NoDataFound`, more than one fails `TooManyRows`.
    pub fn single_row(self) -> Result<Row> {
        match self.cardinality() {
            Cardinality::Zero => Err(SqlRsError::NoDataFound),
            Cardinality::Many(n) => Err(SqlRsError::TooManyRows(n)),
            Cardinality::One => self.rows.into_iter().next().ok_or(SqlRsError::NoDataFound),
        }
    }

    /// Returns all rows from the result.
    pub fn rows(self) -> Vec<Row> {
        self.rows
    }
}
