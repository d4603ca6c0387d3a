use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::assistant::{CompletionConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};

#[derive(Parser, Debug)]
#[command(name = "tablite")]
#[command(author, version, about = "Load a CSV or spreadsheet into SQLite and query it interactively")]
pub struct Cli {
    /// Path to a CSV or Excel (.xlsx/.xls) file; prompted for when omitted
    pub file: Option<PathBuf>,

    /// Name of the SQLite database to create (must end with .db); prompted for when omitted
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Execute a single SQL query after loading and exit (non-interactive mode)
    #[arg(short, long)]
    pub query: Option<String>,

    /// CSV delimiter (only for CSV files)
    #[arg(short, long, default_value = ",")]
    pub delimiter: char,

    /// Completion service endpoint used by the external-query entry
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Model identifier sent to the completion service
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Completion request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}
