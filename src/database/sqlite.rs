use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::error::{Result, TabliteError};
use crate::storage::table::{ResultSet, SourceTable, Value};

use super::QueryExecutor;

/// Summary of one materialization: each created table with its row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterializeReport {
    pub tables: Vec<(String, usize)>,
}

impl MaterializeReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

/// A SQLite database file. Every operation opens its own connection and
/// closes it before returning.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    db_path: PathBuf,
}

impl SqliteDatabase {
    /// The name must end in `.db`. The file itself is created lazily by
    /// [`SqliteDatabase::materialize`].
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let valid = db_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(".db") && n.len() > ".db".len())
            .unwrap_or(false);
        if !valid {
            return Err(TabliteError::InvalidDatabaseName(
                db_path.display().to_string(),
            ));
        }

        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Creates one all-`TEXT` table per source table and inserts every row.
    ///
    /// The whole batch runs in one transaction: if any statement fails
    /// nothing from this call is kept.
    pub fn materialize(&self, tables: &[SourceTable]) -> Result<MaterializeReport> {
        let mut conn = Connection::open(&self.db_path).map_err(connectivity)?;
        let tx = conn.transaction().map_err(execution)?;
        let mut report = MaterializeReport::default();

        for table in tables {
            tracing::info!(
                table = %table.name,
                columns = table.column_count(),
                rows = table.row_count(),
                db = %self.db_path.display(),
                "materializing table"
            );

            tx.execute_batch(&create_table_sql(table))
                .map_err(|e| ingest_error(&table.name, e))?;

            let mut stmt = tx
                .prepare(&insert_sql(table))
                .map_err(|e| ingest_error(&table.name, e))?;
            for (i, row) in table.rows.iter().enumerate() {
                stmt.execute(params_from_iter(row.iter()))
                    .map_err(|e| {
                        TabliteError::Execution(format!(
                            "table '{}', row {}: {}",
                            table.name,
                            i + 1,
                            e
                        ))
                    })?;
            }

            report.tables.push((table.name.clone(), table.row_count()));
        }

        tx.commit().map_err(execution)?;
        Ok(report)
    }

    fn open_existing(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(connectivity)
    }
}

impl QueryExecutor for SqliteDatabase {
    fn list_tables(&self) -> Result<Vec<String>> {
        let conn = self.open_existing()?;
        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
            )
            .map_err(connectivity)?;

        let tables = stmt
            .query_map([], |row| row.get(0))
            .map_err(connectivity)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(connectivity)?;

        Ok(tables)
    }

    fn execute(&self, sql: &str) -> Result<ResultSet> {
        tracing::debug!(sql, "executing query");
        if is_blank_statement(sql) {
            return Ok(ResultSet::default());
        }

        let conn = self.open_existing()?;
        let mut stmt = conn.prepare(sql).map_err(execution)?;
        let columns = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        let column_count = columns.len();
        let mut result = ResultSet::new(columns);

        let mut rows = stmt.query([]).map_err(execution)?;
        while let Some(row) = rows.next().map_err(execution)? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(to_value(row.get_ref(i).map_err(execution)?));
            }
            result.rows.push(values);
        }

        Ok(result)
    }
}

fn to_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// True when `sql` holds only whitespace, comments and semicolons. SQLite
/// compiles such text to no statement at all.
fn is_blank_statement(sql: &str) -> bool {
    let mut rest = sql;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            return rest.is_empty();
        }
    }
}

/// Double-quotes an identifier, doubling any embedded quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(table: &SourceTable) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("{} TEXT", quote_identifier(c)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        quote_identifier(&table.name),
        columns
    )
}

fn insert_sql(table: &SourceTable) -> String {
    let placeholders = vec!["?"; table.column_count()].join(", ");
    format!(
        "INSERT INTO {} VALUES ({});",
        quote_identifier(&table.name),
        placeholders
    )
}

fn connectivity(e: rusqlite::Error) -> TabliteError {
    TabliteError::Connectivity(e.to_string())
}

fn execution(e: rusqlite::Error) -> TabliteError {
    TabliteError::Execution(e.to_string())
}

fn ingest_error(table: &str, e: rusqlite::Error) -> TabliteError {
    TabliteError::Execution(format!("table '{}': {}", table, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> SourceTable {
        SourceTable::new("people", vec!["id".into(), "name".into()]).with_rows(vec![
            vec![Some("1".into()), Some("Ann".into())],
            vec![Some("2".into()), Some("Bo".into())],
        ])
    }

    #[test]
    fn test_database_name_must_end_in_db() {
        assert!(SqliteDatabase::new("test.db").is_ok());
        assert!(SqliteDatabase::new("dir/test.db").is_ok());
        for bad in ["test", "test.sqlite", "test.db.bak", ".db", ""] {
            assert!(
                matches!(
                    SqliteDatabase::new(bad),
                    Err(TabliteError::InvalidDatabaseName(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("people"), "\"people\"");
        assert_eq!(quote_identifier("my table"), "\"my table\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_create_table_sql_all_text() {
        assert_eq!(
            create_table_sql(&people()),
            "CREATE TABLE IF NOT EXISTS \"people\" (\"id\" TEXT, \"name\" TEXT);"
        );
        assert_eq!(
            insert_sql(&people()),
            "INSERT INTO \"people\" VALUES (?, ?);"
        );
    }

    #[test]
    fn test_materialize_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("test.db")).unwrap();

        let report = db.materialize(&[people()]).unwrap();
        assert_eq!(report.tables, vec![("people".to_string(), 2)]);
        assert_eq!(report.total_rows(), 2);

        let result = db.execute("SELECT * FROM people").unwrap();
        assert_eq!(result.columns, vec!["id", "name"]);
        assert_eq!(
            result.rows,
            vec![
                vec![Value::from("1"), Value::from("Ann")],
                vec![Value::from("2"), Value::from("Bo")],
            ]
        );
    }

    #[test]
    fn test_columns_declared_text() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("types.db")).unwrap();
        db.materialize(&[people()]).unwrap();

        let result = db
            .execute("SELECT typeof(id), typeof(name) FROM people LIMIT 1")
            .unwrap();
        assert_eq!(result.rows[0], vec![Value::from("text"), Value::from("text")]);
    }

    #[test]
    fn test_list_tables_in_creation_order() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("order.db")).unwrap();
        let zeta = SourceTable::new("zeta", vec!["a".into()]);
        let alpha = SourceTable::new("alpha", vec!["a".into()]);

        db.materialize(&[zeta, alpha]).unwrap();
        assert_eq!(db.list_tables().unwrap(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_list_tables_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("missing.db")).unwrap();

        assert!(matches!(
            db.list_tables(),
            Err(TabliteError::Connectivity(_))
        ));
        assert!(!dir.path().join("missing.db").exists());
    }

    #[test]
    fn test_awkward_table_name() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("names.db")).unwrap();
        let table = SourceTable::new("my \"odd\" sheet", vec!["select".into()])
            .with_rows(vec![vec![Some("x".into())]]);

        db.materialize(&[table]).unwrap();
        assert_eq!(db.list_tables().unwrap(), vec!["my \"odd\" sheet"]);

        let result = db
            .execute("SELECT \"select\" FROM \"my \"\"odd\"\" sheet\"")
            .unwrap();
        assert_eq!(result.rows, vec![vec![Value::from("x")]]);
    }

    #[test]
    fn test_empty_cells_are_null() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("nulls.db")).unwrap();
        let table = SourceTable::new("t", vec!["a".into(), "b".into()])
            .with_rows(vec![vec![Some("1".into()), None]]);

        db.materialize(&[table]).unwrap();
        let result = db.execute("SELECT b FROM t").unwrap();
        assert!(result.rows[0][0].is_null());
    }

    #[test]
    fn test_failed_materialize_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("atomic.db")).unwrap();
        db.materialize(&[people()]).unwrap();

        // A second table followed by rows that no longer fit `people`.
        let extra = SourceTable::new("extra", vec!["x".into()])
            .with_rows(vec![vec![Some("1".into())]]);
        let wider = SourceTable::new("people", vec!["a".into(), "b".into(), "c".into()])
            .with_rows(vec![vec![Some("1".into()), Some("2".into()), Some("3".into())]]);

        let err = db.materialize(&[extra, wider]).unwrap_err();
        assert!(matches!(err, TabliteError::Execution(_)));

        assert_eq!(db.list_tables().unwrap(), vec!["people"]);
        let count = db.execute("SELECT COUNT(*) FROM people").unwrap();
        assert_eq!(count.rows[0][0], Value::Integer(2));
    }

    #[test]
    fn test_reingest_appends() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("append.db")).unwrap();
        db.materialize(&[people()]).unwrap();
        db.materialize(&[people()]).unwrap();

        let count = db.execute("SELECT COUNT(*) FROM people").unwrap();
        assert_eq!(count.rows[0][0], Value::Integer(4));
    }

    #[test]
    fn test_invalid_sql_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("bad.db")).unwrap();
        db.materialize(&[people()]).unwrap();

        assert!(matches!(
            db.execute("SELEKT *"),
            Err(TabliteError::Execution(_))
        ));
    }

    #[test]
    fn test_non_query_statement_returns_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("dml.db")).unwrap();
        db.materialize(&[people()]).unwrap();

        let result = db
            .execute("INSERT INTO people VALUES ('3', 'Cy')")
            .unwrap();
        assert!(result.is_empty());

        let count = db.execute("SELECT COUNT(*) FROM people").unwrap();
        assert_eq!(count.rows[0][0], Value::Integer(3));
    }

    #[test]
    fn test_blank_statement_returns_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db = SqliteDatabase::new(dir.path().join("blank.db")).unwrap();
        db.materialize(&[people()]).unwrap();

        for sql in ["", "   ", "-- just a note", "/* block */ ;", ";\n-- a\n/* b */"] {
            let result = db.execute(sql).unwrap();
            assert!(result.is_empty(), "{sql:?} should return no rows");
            assert!(result.columns.is_empty());
        }
    }

    #[test]
    fn test_is_blank_statement() {
        assert!(is_blank_statement(""));
        assert!(is_blank_statement("-- c"));
        assert!(is_blank_statement("/* unterminated"));
        assert!(!is_blank_statement("SELECT 1 -- trailing"));
        assert!(!is_blank_statement("/* lead */ SELECT 1"));
        assert!(!is_blank_statement("-- note\nSELECT 1"));
    }
}
