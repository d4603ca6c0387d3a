use std::path::{Path, PathBuf};

use crate::error::{Result, TabliteError};

use super::csv::CsvReader;
use super::spreadsheet::SpreadsheetReader;
use super::table::SourceTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| TabliteError::UnsupportedFormat(path.display().to_string()))?
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xls" => Ok(SourceFormat::Spreadsheet),
            _ => Err(TabliteError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A validated input file: it exists and has a recognized extension.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub format: SourceFormat,
    delimiter: char,
}

impl SourceDocument {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(TabliteError::FileNotFound(path));
        }
        let format = SourceFormat::detect(&path)?;

        Ok(Self {
            path,
            format,
            delimiter: ',',
        })
    }

    /// Field delimiter used when the document is a CSV file.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads the whole document into memory, one table per CSV file or sheet.
    pub fn read_tables(&self) -> Result<Vec<SourceTable>> {
        match self.format {
            SourceFormat::Csv => {
                let reader = CsvReader::new().with_delimiter(self.delimiter);
                Ok(vec![reader.read_file(&self.path)?])
            }
            SourceFormat::Spreadsheet => Ok(SpreadsheetReader::new().read_file(&self.path)?),
        }
    }
}
