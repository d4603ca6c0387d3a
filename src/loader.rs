use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::console::Prompter;
use crate::database::{MaterializeReport, SqliteDatabase};
use crate::error::Result;
use crate::storage::SourceDocument;

pub const WELCOME_MESSAGE: &str = "Welcome to the interactive database console.";

/// Checks the inputs in the order the user is told about problems: database
/// name first, then the file's existence, then its extension.
pub fn validate(file: &Path, db: &Path, delimiter: char) -> Result<(SourceDocument, SqliteDatabase)> {
    let database = SqliteDatabase::new(db)?;
    let document = SourceDocument::open(file)?.with_delimiter(delimiter);
    Ok((document, database))
}

/// Reads the document and materializes every table it contains.
pub fn load(document: &SourceDocument, database: &SqliteDatabase) -> Result<MaterializeReport> {
    let tables = document.read_tables()?;
    database.materialize(&tables)
}

pub fn success_message(
    document: &SourceDocument,
    database: &SqliteDatabase,
    report: &MaterializeReport,
) -> String {
    let tables = report
        .tables
        .iter()
        .map(|(name, rows)| format!("{} ({} rows)", name, rows))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Database '{}' created successfully from '{}': {}; {} rows in total",
        database.path().display(),
        document.path.display(),
        tables,
        report.total_rows()
    )
}

/// Asks for a source file and database name until both validate.
///
/// Values given up front are tried first; after a failure every value is
/// prompted for again. Returns `None` at end of input.
pub fn prompt_for_inputs<P: Prompter, W: Write>(
    prompter: &mut P,
    out: &mut W,
    mut file: Option<PathBuf>,
    mut db: Option<PathBuf>,
    delimiter: char,
) -> io::Result<Option<(SourceDocument, SqliteDatabase)>> {
    loop {
        writeln!(out, "\n{}", WELCOME_MESSAGE)?;
        out.flush()?;

        let file_path = match file.take() {
            Some(path) => path,
            None => match prompter.input("Enter the path to the CSV or Excel file: ")? {
                Some(line) => PathBuf::from(line.trim()),
                None => return Ok(None),
            },
        };
        let db_path = match db.take() {
            Some(path) => path,
            None => match prompter
                .input("Enter a name for the SQLite database (for example 'my_data.db'): ")?
            {
                Some(line) => PathBuf::from(line.trim()),
                None => return Ok(None),
            },
        };

        match validate(&file_path, &db_path, delimiter) {
            Ok(inputs) => return Ok(Some(inputs)),
            Err(e) => {
                tracing::debug!(error = %e, "rejected inputs");
                writeln!(out, "{}", e)?;
            }
        }
    }
}
