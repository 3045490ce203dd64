//! Spreadsheet ingestion.
//!
//! Reads the first sheet of an .xlsx workbook and loads it into the
//! session table: the header row becomes the column names, every later
//! row becomes a table row, and the previous table of the same name is
//! replaced wholesale.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::info;

use crate::error::{Result, SheetqlError};
use crate::store::{ColumnDescriptor, Row, TableStore, Value};

/// Parsed contents of the first sheet: inferred column descriptors plus
/// data rows already converted to store values.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    /// One descriptor per header cell, in header order.
    pub columns: Vec<ColumnDescriptor>,

    /// Data rows below the header, padded or truncated to the header width.
    pub rows: Vec<Row>,
}

/// Reads the first sheet of the workbook at `path`.
///
/// The first row is the header; it must be non-empty and every header
/// cell must be non-blank. Column types are inferred from the data cells
/// (INTEGER, REAL, or TEXT affinity).
pub fn load_workbook(path: &Path) -> Result<SheetData> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SheetqlError::ingest(format!("Failed to open {}: {e}", path.display())))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetqlError::ingest("Workbook has no sheets"))?
        .map_err(|e| SheetqlError::ingest(format!("Failed to read first sheet: {e}")))?;

    let mut rows_iter = range.rows();
    let header_cells = rows_iter
        .next()
        .ok_or_else(|| SheetqlError::ingest("First sheet is empty"))?;

    let header = parse_header(header_cells)?;
    let data_rows: Vec<&[Data]> = rows_iter.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, name)| ColumnDescriptor::new(name.clone(), infer_column_type(&data_rows, i)))
        .collect::<Vec<_>>();

    let rows = data_rows
        .iter()
        .map(|cells| convert_row(cells, columns.len()))
        .collect();

    Ok(SheetData { columns, rows })
}

/// Loads the workbook and replaces the session table with its contents.
pub async fn ingest_workbook(store: &TableStore, path: &Path, table: &str) -> Result<SheetData> {
    let sheet = load_workbook(path)?;
    store
        .replace_table(table, &sheet.columns, &sheet.rows)
        .await?;
    info!(
        table,
        columns = sheet.columns.len(),
        rows = sheet.rows.len(),
        "workbook ingested"
    );
    Ok(sheet)
}

/// Converts the header row into column names.
fn parse_header(cells: &[Data]) -> Result<Vec<String>> {
    if cells.is_empty() {
        return Err(SheetqlError::ingest("Header row is empty"));
    }

    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_text(cell);
            if name.trim().is_empty() {
                Err(SheetqlError::ingest(format!(
                    "Header cell {} is blank; every column needs a name",
                    i + 1
                )))
            } else {
                Ok(name)
            }
        })
        .collect()
}

/// Renders a header cell as text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

/// Infers a SQLite type affinity for one column from its data cells.
///
/// All-integer columns get INTEGER, numeric columns get REAL, everything
/// else (including all-empty) gets TEXT.
fn infer_column_type(rows: &[&[Data]], index: usize) -> &'static str {
    let mut saw_value = false;
    let mut all_integer = true;
    let mut all_numeric = true;

    for row in rows {
        match row.get(index).unwrap_or(&Data::Empty) {
            Data::Empty => {}
            Data::Int(_) | Data::Bool(_) => saw_value = true,
            Data::Float(f) => {
                saw_value = true;
                if f.fract() != 0.0 {
                    all_integer = false;
                }
            }
            Data::DateTime(_) => {
                saw_value = true;
                all_integer = false;
            }
            _ => {
                saw_value = true;
                all_integer = false;
                all_numeric = false;
            }
        }
    }

    match (saw_value, all_integer, all_numeric) {
        (false, _, _) => "TEXT",
        (true, true, _) => "INTEGER",
        (true, false, true) => "REAL",
        (true, false, false) => "TEXT",
    }
}

/// Converts one data row, padding missing trailing cells with NULL and
/// dropping cells beyond the header width.
fn convert_row(cells: &[Data], width: usize) -> Row {
    (0..width)
        .map(|i| convert_cell(cells.get(i).unwrap_or(&Data::Empty)))
        .collect()
}

/// Converts a single cell to a store value.
///
/// Whole floats become integers so that integer columns read back the
/// way they looked in the sheet.
fn convert_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Value::Int(*f as i64)
            } else {
                Value::Float(*f)
            }
        }
        Data::Bool(b) => Value::Int(i64::from(*b)),
        Data::DateTime(dt) => Value::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_rejects_blank_cells() {
        let cells = vec![Data::String("id".into()), Data::Empty];
        let err = parse_header(&cells).unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn test_parse_header_keeps_order() {
        let cells = vec![
            Data::String("id".into()),
            Data::String("name".into()),
            Data::String("score".into()),
        ];
        assert_eq!(parse_header(&cells).unwrap(), vec!["id", "name", "score"]);
    }

    #[test]
    fn test_infer_integer_column() {
        let r1 = vec![Data::Float(1.0)];
        let r2 = vec![Data::Int(2)];
        let rows: Vec<&[Data]> = vec![&r1, &r2];
        assert_eq!(infer_column_type(&rows, 0), "INTEGER");
    }

    #[test]
    fn test_infer_real_column() {
        let r1 = vec![Data::Float(1.5)];
        let r2 = vec![Data::Int(2)];
        let rows: Vec<&[Data]> = vec![&r1, &r2];
        assert_eq!(infer_column_type(&rows, 0), "REAL");
    }

    #[test]
    fn test_infer_text_column() {
        let r1 = vec![Data::String("a".into())];
        let rows: Vec<&[Data]> = vec![&r1];
        assert_eq!(infer_column_type(&rows, 0), "TEXT");
    }

    #[test]
    fn test_infer_empty_column_defaults_to_text() {
        let r1: Vec<Data> = vec![Data::Empty];
        let rows: Vec<&[Data]> = vec![&r1];
        assert_eq!(infer_column_type(&rows, 0), "TEXT");
    }

    #[test]
    fn test_convert_cell_whole_float_becomes_int() {
        assert_eq!(convert_cell(&Data::Float(3.0)), Value::Int(3));
        assert_eq!(convert_cell(&Data::Float(3.5)), Value::Float(3.5));
    }

    #[test]
    fn test_convert_row_pads_short_rows() {
        let cells = vec![Data::Int(1)];
        let row = convert_row(&cells, 3);
        assert_eq!(row, vec![Value::Int(1), Value::Null, Value::Null]);
    }
}
