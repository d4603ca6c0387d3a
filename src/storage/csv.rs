use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::table::SourceTable;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Empty CSV file")]
    EmptyFile,
}

pub struct CsvReader {
    delimiter: char,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self { delimiter: ',' }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads the file into a table named after the file stem.
    pub fn read_file(&self, path: &Path) -> Result<SourceTable, CsvError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let table_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table")
            .to_string();

        self.read_from_reader(reader, &table_name)
    }

    pub fn read_from_reader<R: BufRead>(
        &self,
        reader: R,
        table_name: &str,
    ) -> Result<SourceTable, CsvError> {
        let mut records = Records::new(reader.lines());

        let (header_line, header) = loop {
            match records.next_record()? {
                Some((_, text)) if text.trim().is_empty() => continue,
                Some(record) => break record,
                None => return Err(CsvError::EmptyFile),
            }
        };
        let headers = self.parse_line(&header).map_err(|e| CsvError::Parse {
            line: header_line,
            message: e,
        })?;
        let mut table = SourceTable::new(table_name, headers);

        while let Some((line, text)) = records.next_record()? {
            if text.trim().is_empty() {
                continue;
            }
            let fields = self
                .parse_line(&text)
                .map_err(|e| CsvError::Parse { line, message: e })?;
            if fields.len() != table.column_count() {
                return Err(CsvError::Parse {
                    line,
                    message: format!(
                        "expected {} fields, found {}",
                        table.column_count(),
                        fields.len()
                    ),
                });
            }

            let row = fields
                .into_iter()
                .map(|f| if f.is_empty() { None } else { Some(f) })
                .collect();
            table.push_row(row);
        }

        Ok(table)
    }

    fn parse_line(&self, line: &str) -> Result<Vec<String>, String> {
        let mut fields = Vec::new();
        let mut current_field = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                if c == '"' {
                    // Check for escaped quote
                    if chars.peek() == Some(&'"') {
                        current_field.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    current_field.push(c);
                }
            } else if c == '"' {
                in_quotes = true;
            } else if c == self.delimiter {
                fields.push(std::mem::take(&mut current_field));
            } else {
                current_field.push(c);
            }
        }

        if in_quotes {
            return Err("Unclosed quote".to_string());
        }

        fields.push(current_field);
        Ok(fields)
    }
}

/// Joins physical lines into logical records. A record continues onto the
/// next line while it holds an odd number of quote characters.
struct Records<I> {
    lines: I,
    line_num: usize,
}

impl<I> Records<I>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    fn new(lines: I) -> Self {
        Self { lines, line_num: 0 }
    }

    /// Returns the next record with the line number it starts on.
    fn next_record(&mut self) -> Result<Option<(usize, String)>, CsvError> {
        let Some(first) = self.lines.next() else {
            return Ok(None);
        };
        let mut record = first?;
        self.line_num += 1;
        let start = self.line_num;
        if start == 1 {
            if let Some(stripped) = record.strip_prefix('\u{feff}') {
                record = stripped.to_string();
            }
        }

        let mut quotes = record.matches('"').count();
        while quotes % 2 == 1 {
            let Some(line) = self.lines.next() else {
                return Err(CsvError::Parse {
                    line: start,
                    message: "Unclosed quote".to_string(),
                });
            };
            let line = line?;
            self.line_num += 1;
            quotes += line.matches('"').count();
            record.push('\n');
            record.push_str(&line);
        }

        Ok(Some((start, record)))
    }
}
