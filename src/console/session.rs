use crate::database::QueryExecutor;

/// Per-run console state: the database being queried and the table picked in
/// the current iteration.
pub struct Session<'a, E: QueryExecutor> {
    database: &'a E,
    selected_table: Option<String>,
}

impl<'a, E: QueryExecutor> Session<'a, E> {
    pub fn new(database: &'a E) -> Self {
        Self {
            database,
            selected_table: None,
        }
    }

    pub fn database(&self) -> &'a E {
        self.database
    }

    pub fn select_table(&mut self, table: impl Into<String>) {
        self.selected_table = Some(table.into());
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.selected_table.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selected_table = None;
    }
}
