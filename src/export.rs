//! Export artifact generation.
//!
//! Regenerates a single-sheet .xlsx file mirroring the table's current
//! contents after a successful mutation. The file is written to a
//! temporary path in the target directory and renamed into place, so a
//! failure mid-write cannot leave a truncated artifact behind.

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::error::{Result, SheetqlError};
use crate::store::{TableSnapshot, Value};

/// Sheet name used for the export artifact.
const EXPORT_SHEET_NAME: &str = "Sheet1";

/// Returns the deterministic export path for an uploaded workbook:
/// `updated_<original filename>` inside `export_dir`.
pub fn export_path_for(original: &Path, export_dir: &Path) -> Result<PathBuf> {
    let file_name = original
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            SheetqlError::export(format!(
                "Cannot derive export name from {}",
                original.display()
            ))
        })?;
    Ok(export_dir.join(format!("updated_{file_name}")))
}

/// Writes the snapshot to an .xlsx file at `path`, overwriting any
/// existing file: one sheet named "Sheet1", header row first, then every
/// data row.
pub fn write_snapshot(snapshot: &TableSnapshot, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(EXPORT_SHEET_NAME)
        .map_err(|e| SheetqlError::export(format!("Failed to name sheet: {e}")))?;

    for (col, descriptor) in snapshot.columns.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, &descriptor.name)
            .map_err(|e| SheetqlError::export(format!("Failed to write header: {e}")))?;
    }

    for (row_index, row) in snapshot.rows.iter().enumerate() {
        let sheet_row = (row_index + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            write_cell(worksheet, sheet_row, col as u16, value)?;
        }
    }

    let tmp_path = temp_path_for(path)?;
    workbook
        .save(&tmp_path)
        .map_err(|e| SheetqlError::export(format!("Failed to write {}: {e}", tmp_path.display())))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Leave nothing half-written behind.
        let _ = fs::remove_file(&tmp_path);
        SheetqlError::export(format!("Failed to move export into place: {e}"))
    })?;

    info!(path = %path.display(), rows = snapshot.rows.len(), "export written");
    Ok(())
}

/// Writes one cell; NULLs are left blank.
fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: &Value,
) -> Result<()> {
    let result = match value {
        Value::Null => return Ok(()),
        Value::Int(i) => worksheet.write_number(row, col, *i as f64),
        Value::Float(f) => worksheet.write_number(row, col, *f),
        Value::Text(s) => worksheet.write_string(row, col, s),
        Value::Blob(b) => worksheet.write_string(row, col, format!("<{} bytes>", b.len())),
    };
    result
        .map(|_| ())
        .map_err(|e| SheetqlError::export(format!("Failed to write cell: {e}")))
}

/// Sibling temp path in the same directory, so the final rename stays on
/// one filesystem.
fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            SheetqlError::export(format!("Invalid export path: {}", path.display()))
        })?;
    Ok(path.with_file_name(format!(".{file_name}.tmp")))
}
