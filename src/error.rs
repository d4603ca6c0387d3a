use std::path::PathBuf;

use thiserror::Error;

use crate::storage::csv::CsvError;
use crate::storage::spreadsheet::SpreadsheetError;

#[derive(Error, Debug)]
pub enum TabliteError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported file format: {0} (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    #[error("Invalid database name: {0} (must end with '.db')")]
    InvalidDatabaseName(String),

    #[error("{0}")]
    Parse(String),

    #[error("Cannot open database: {0}")]
    Connectivity(String),

    #[error("{0}")]
    Execution(String),

    #[error("Completion service error: {0}")]
    Completion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CsvError> for TabliteError {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::Io(e) => TabliteError::Io(e),
            other => TabliteError::Parse(other.to_string()),
        }
    }
}

impl From<SpreadsheetError> for TabliteError {
    fn from(err: SpreadsheetError) -> Self {
        TabliteError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TabliteError>;
