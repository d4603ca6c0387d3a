mod sqlite;

pub use sqlite::{quote_identifier, MaterializeReport, SqliteDatabase};

use crate::error::Result;
use crate::storage::table::ResultSet;

/// The narrow surface the console needs from a database: the catalog and
/// verbatim statement execution returning generic rows.
pub trait QueryExecutor {
    /// Table names in creation order.
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Runs `sql` exactly as given. Statements without a result produce an
    /// empty [`ResultSet`].
    fn execute(&self, sql: &str) -> Result<ResultSet>;
}
