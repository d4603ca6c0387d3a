pub mod csv;
pub mod source;
pub mod spreadsheet;
pub mod table;

pub use csv::CsvReader;
pub use source::{SourceDocument, SourceFormat};
pub use spreadsheet::SpreadsheetReader;
pub use table::{ResultSet, SourceTable, Value};
