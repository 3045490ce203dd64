//! SQLite table store.
//!
//! One local database file, one table per session. A connection is opened
//! and closed per operation rather than held for the life of the session;
//! SQLite serializes whatever needs serializing internally. Two sessions
//! pointed at the same file can still race on mutations; single-session
//! usage is assumed.

mod types;

pub use types::{
    format_row_tuple, ColumnDescriptor, ExecOutcome, QueryResult, Row, TableInfo, TableSnapshot,
    Value,
};

use std::path::{Path, PathBuf};
use std::time::Instant;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Row as SqlxRow, TypeInfo};
use tracing::debug;

use crate::classify::QueryKind;
use crate::error::{Result, SheetqlError};

/// Number of rows fetched as grounding context for the prompt.
const SAMPLE_ROW_LIMIT: usize = 5;

/// Handle to the session's SQLite database file.
#[derive(Debug, Clone)]
pub struct TableStore {
    db_path: PathBuf,
}

impl TableStore {
    /// Creates a store backed by the given database file.
    ///
    /// The file is created lazily on first use.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Returns the path of the backing database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Opens a fresh connection for one operation.
    async fn connect(&self) -> Result<SqliteConnection> {
        SqliteConnectOptions::new()
            .filename(&self.db_path)
            .create_if_missing(true)
            .connect()
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to open {}: {e}", self.db_path.display())))
    }

    /// Returns the ordered column descriptors and up to 5 sample rows.
    ///
    /// Fails with [`SheetqlError::TableNotFound`] if the table does not
    /// exist. Read-only and idempotent.
    pub async fn inspect(&self, table: &str) -> Result<TableInfo> {
        let mut conn = self.connect().await?;

        let columns = Self::table_columns(&mut conn, table).await?;

        let sample_sql = format!(
            "SELECT * FROM {} LIMIT {}",
            quote_ident(table),
            SAMPLE_ROW_LIMIT
        );
        let rows = sqlx::query(&sample_sql)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to sample {table}: {e}")))?;
        let samples = rows.iter().map(decode_row).collect();

        conn.close()
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to close connection: {e}")))?;

        Ok(TableInfo { columns, samples })
    }

    /// Reads the full current contents of the table, unbounded.
    ///
    /// Used for the data preview and for regenerating the export artifact.
    pub async fn snapshot(&self, table: &str) -> Result<TableSnapshot> {
        let mut conn = self.connect().await?;

        let columns = Self::table_columns(&mut conn, table).await?;

        let select_sql = format!("SELECT * FROM {}", quote_ident(table));
        let rows = sqlx::query(&select_sql)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to read {table}: {e}")))?;
        let rows = rows.iter().map(decode_row).collect();

        conn.close()
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to close connection: {e}")))?;

        Ok(TableSnapshot { columns, rows })
    }

    /// Executes a candidate statement, dispatching on the classification
    /// computed once by the caller.
    ///
    /// Mutations are executed and committed (SQLite autocommit) with no
    /// result rows; reads fetch all rows. Execution errors come back as
    /// [`ExecOutcome::Failed`] rather than `Err` so they can never
    /// propagate past this boundary; `Err` is reserved for failing to
    /// reach the store at all.
    pub async fn execute(&self, sql: &str, kind: QueryKind) -> Result<ExecOutcome> {
        let mut conn = self.connect().await?;
        let start = Instant::now();

        let outcome = match kind {
            QueryKind::Mutation => match sqlx::query(sql).execute(&mut conn).await {
                Ok(done) => {
                    debug!(rows_affected = done.rows_affected(), "mutation committed");
                    ExecOutcome::Mutated {
                        rows_affected: done.rows_affected(),
                    }
                }
                Err(e) => ExecOutcome::Failed(e.to_string()),
            },
            QueryKind::Read => match sqlx::query(sql).fetch_all(&mut conn).await {
                Ok(rows) => {
                    let columns = rows
                        .first()
                        .map(result_columns)
                        .unwrap_or_default();
                    let decoded: Vec<Row> = rows.iter().map(decode_row).collect();
                    ExecOutcome::Rows(
                        QueryResult::with_data(columns, decoded)
                            .with_execution_time(start.elapsed()),
                    )
                }
                Err(e) => ExecOutcome::Failed(e.to_string()),
            },
        };

        conn.close()
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to close connection: {e}")))?;

        Ok(outcome)
    }

    /// Replaces the table wholesale: drop, recreate from the descriptors,
    /// insert every row with bound parameters. No merge, no versioning.
    pub async fn replace_table(
        &self,
        table: &str,
        columns: &[ColumnDescriptor],
        rows: &[Row],
    ) -> Result<()> {
        if columns.is_empty() {
            return Err(SheetqlError::store("Cannot create a table with no columns"));
        }

        let mut conn = self.connect().await?;
        let quoted = quote_ident(table);

        let drop_sql = format!("DROP TABLE IF EXISTS {quoted}");
        sqlx::query(&drop_sql)
            .execute(&mut conn)
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to drop {table}: {e}")))?;

        let column_defs = columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), c.data_type))
            .collect::<Vec<_>>()
            .join(", ");
        let create_sql = format!("CREATE TABLE {quoted} ({column_defs})");
        sqlx::query(&create_sql)
            .execute(&mut conn)
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to create {table}: {e}")))?;

        let placeholders = vec!["?"; columns.len()].join(", ");
        let insert_sql = format!("INSERT INTO {quoted} VALUES ({placeholders})");

        for row in rows {
            if row.len() != columns.len() {
                return Err(SheetqlError::store(format!(
                    "Row has {} values but table has {} columns",
                    row.len(),
                    columns.len()
                )));
            }
            let mut query = sqlx::query(&insert_sql);
            for value in row {
                query = match value {
                    Value::Null => query.bind(None::<String>),
                    Value::Int(i) => query.bind(*i),
                    Value::Float(f) => query.bind(*f),
                    Value::Text(s) => query.bind(s.clone()),
                    Value::Blob(b) => query.bind(b.clone()),
                };
            }
            query
                .execute(&mut conn)
                .await
                .map_err(|e| SheetqlError::store(format!("Failed to insert into {table}: {e}")))?;
        }

        conn.close()
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to close connection: {e}")))?;

        debug!(table, rows = rows.len(), "table replaced");
        Ok(())
    }

    /// Reads the schema descriptor from `PRAGMA table_info`.
    async fn table_columns(
        conn: &mut SqliteConnection,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>> {
        let pragma_sql = format!("PRAGMA table_info({})", quote_ident(table));
        let rows = sqlx::query(&pragma_sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| SheetqlError::store(format!("Failed to inspect {table}: {e}")))?;

        if rows.is_empty() {
            return Err(SheetqlError::TableNotFound(table.to_string()));
        }

        rows.iter()
            .map(|row| {
                let name: String = row
                    .try_get("name")
                    .map_err(|e| SheetqlError::store(format!("Failed to decode column name: {e}")))?;
                let data_type: String = row
                    .try_get("type")
                    .map_err(|e| SheetqlError::store(format!("Failed to decode column type: {e}")))?;
                Ok(ColumnDescriptor::new(name, data_type))
            })
            .collect()
    }
}

/// Quotes an identifier for interpolation into SQL text.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Extracts result-set column metadata from a row.
fn result_columns(row: &SqliteRow) -> Vec<ColumnDescriptor> {
    row.columns()
        .iter()
        .map(|col| ColumnDescriptor::new(col.name(), col.type_info().name()))
        .collect()
}

/// Decodes all values in a row, using the reported type to pick a decoder.
fn decode_row(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| decode_value(row, i, col.type_info().name()))
        .collect()
}

/// Decodes a single value; anything that fails to decode becomes NULL.
fn decode_value(row: &SqliteRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "INTEGER" | "BOOLEAN" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Blob)
            .unwrap_or(Value::Null),

        "NULL" => Value::Null,

        // TEXT, DATETIME, and anything else with text affinity.
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::Text)
            .unwrap_or(Value::Null),
    }
}
