use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use super::table::SourceTable;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Workbook contains no non-empty sheets")]
    NoSheets,
}

/// Reads every worksheet of an `.xlsx`/`.xls` workbook, one table per sheet.
pub struct SpreadsheetReader;

impl Default for SpreadsheetReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetReader {
    pub fn new() -> Self {
        Self
    }

    /// Sheets come back in workbook order. Empty sheets are skipped.
    pub fn read_file(&self, path: &Path) -> Result<Vec<SourceTable>, SpreadsheetError> {
        let mut workbook = open_workbook_auto(path)?;
        let mut tables = Vec::new();

        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name)?;
            let mut rows = range.rows();

            let Some(header_row) = rows.next() else {
                tracing::warn!(sheet = %sheet_name, "skipping empty sheet");
                continue;
            };

            let headers = header_row
                .iter()
                .map(|cell| cell_to_text(cell).unwrap_or_default())
                .collect();
            let mut table = SourceTable::new(sheet_name.clone(), headers);

            for row in rows {
                table.push_row(row.iter().map(cell_to_text).collect());
            }

            tracing::debug!(
                sheet = %sheet_name,
                rows = table.row_count(),
                columns = table.column_count(),
                "read sheet"
            );
            tables.push(table);
        }

        if tables.is_empty() {
            return Err(SpreadsheetError::NoSheets);
        }

        Ok(tables)
    }
}

/// Text form of a single cell, `None` for an empty cell.
pub fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(float_to_text(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => float_to_text(dt.as_f64()),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(e.to_string()),
    }
}

// Workbooks store every number as a float; whole numbers print without `.0`.
fn float_to_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
