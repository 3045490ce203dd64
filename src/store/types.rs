//! Value and result types for the table store.
//!
//! Defines the structures used to represent table contents and query
//! results coming back from SQLite.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A single value stored in (or returned from) the table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Signed integer (SQLite INTEGER).
    Int(i64),

    /// Floating point number (SQLite REAL).
    Float(f64),

    /// Text value.
    Text(String),

    /// Binary data.
    Blob(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Plain string rendering for table output.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Blob(b) => format!("<{} bytes>", b.len()),
        }
    }

    /// Rendering used inside a sample-row tuple in the LLM prompt.
    ///
    /// Text is single-quoted, everything else is rendered bare, so a row
    /// reads like `(1, 'a')`.
    pub fn to_tuple_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => format!("'{}'", s),
            Value::Blob(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// A row of values in storage order.
pub type Row = Vec<Value>;

/// Renders a row as a parenthesized tuple, e.g. `(1, 'a')`.
pub fn format_row_tuple(row: &Row) -> String {
    let values = row
        .iter()
        .map(Value::to_tuple_literal)
        .collect::<Vec<_>>()
        .join(", ");
    format!("({})", values)
}

/// An ordered (column name, declared type) pair.
///
/// Used both for schema descriptors from `PRAGMA table_info` and for
/// result-set column metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Declared (or result) data type.
    pub data_type: String,
}

impl ColumnDescriptor {
    /// Creates a new descriptor with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Schema descriptor plus a bounded row sample, as returned by the inspector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableInfo {
    /// Ordered column descriptors.
    pub columns: Vec<ColumnDescriptor>,

    /// Up to the first 5 rows in storage order.
    pub samples: Vec<Row>,
}

/// The full current contents of the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSnapshot {
    /// Ordered column descriptors.
    pub columns: Vec<ColumnDescriptor>,

    /// Every row, in storage order.
    pub rows: Vec<Row>,
}

impl TableSnapshot {
    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result set from a read-classified statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column metadata for the result set.
    pub columns: Vec<ColumnDescriptor>,

    /// Rows of data.
    pub rows: Vec<Row>,

    /// Number of rows in the result.
    pub row_count: usize,

    /// Time taken to execute the query.
    pub execution_time: Duration,
}

impl QueryResult {
    /// Creates a query result with the given columns and rows.
    pub fn with_data(columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            execution_time: Duration::ZERO,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of executing a candidate statement.
///
/// Execution failures are values, not panics; the executor never lets an
/// error escape past this boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// Read path: fetched rows.
    Rows(QueryResult),

    /// Mutation path: statement committed, no result rows.
    Mutated {
        /// Rows affected as reported by SQLite.
        rows_affected: u64,
    },

    /// Execution failed; the message is user-visible.
    Failed(String),
}

impl ExecOutcome {
    /// Returns true if execution failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
