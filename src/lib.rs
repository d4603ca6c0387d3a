pub mod assistant;
pub mod cli;
pub mod console;
pub mod database;
pub mod error;
pub mod format;
pub mod loader;
pub mod storage;
pub mod tui;

pub use assistant::{Completion, CompletionClient, CompletionConfig};
pub use database::{MaterializeReport, QueryExecutor, SqliteDatabase};
pub use error::{Result, TabliteError};
pub use storage::{ResultSet, SourceDocument, SourceFormat, SourceTable, Value};
