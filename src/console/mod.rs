//! The interactive query loop.
//!
//! Each iteration re-reads the table list, lets the user pick a table (or one
//! of the `help` / `external-query` entries) and runs one statement:
//!
//! ```text
//! List -> Select -> Execute -> List ...
//!   \        \         \
//!    +--------+---------+--> Done
//! ```

mod prompt;
mod session;

pub use prompt::{
    menu_choice, menu_options, MenuChoice, Prompter, EXTERNAL_QUERY_ENTRY, HELP_ENTRY,
};
pub use session::Session;

use std::io::{self, Write};

use crate::assistant::Completion;
use crate::database::QueryExecutor;
use crate::format::{write_help, write_result};

pub const FAREWELL_MESSAGE: &str = "Leaving the query console. Goodbye!";
pub const NO_TABLES_MESSAGE: &str = "No tables found in the database.";
pub const SELECT_MESSAGE: &str = "Choose a table to query:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    List,
    Select(Vec<String>),
    Execute(String),
    Done,
}

pub struct Console<'a, E, C, P, W>
where
    E: QueryExecutor,
    C: Completion,
    P: Prompter,
    W: Write,
{
    session: Session<'a, E>,
    completion: &'a C,
    prompter: P,
    out: W,
}

impl<'a, E, C, P, W> Console<'a, E, C, P, W>
where
    E: QueryExecutor,
    C: Completion,
    P: Prompter,
    W: Write,
{
    pub fn new(database: &'a E, completion: &'a C, prompter: P, out: W) -> Self {
        Self {
            session: Session::new(database),
            completion,
            prompter,
            out,
        }
    }

    /// Runs until the user exits or no tables are left to query.
    pub fn run(&mut self) -> io::Result<()> {
        let mut state = State::List;
        while state != State::Done {
            state = self.step(state)?;
        }
        self.out.flush()
    }

    pub fn step(&mut self, state: State) -> io::Result<State> {
        match state {
            State::List => self.list(),
            State::Select(tables) => self.select(tables),
            State::Execute(table) => self.execute(table),
            State::Done => Ok(State::Done),
        }
    }

    pub fn into_parts(self) -> (P, W) {
        (self.prompter, self.out)
    }

    fn list(&mut self) -> io::Result<State> {
        match self.session.database().list_tables() {
            Ok(tables) if tables.is_empty() => {
                writeln!(self.out, "{}", NO_TABLES_MESSAGE)?;
                Ok(State::Done)
            }
            Ok(tables) => Ok(State::Select(tables)),
            Err(e) => {
                writeln!(self.out, "Error reading tables: {}", e)?;
                Ok(State::Done)
            }
        }
    }

    fn select(&mut self, tables: Vec<String>) -> io::Result<State> {
        self.session.clear_selection();
        let options = menu_options(&tables);
        self.out.flush()?;

        let Some(index) = self.prompter.select(SELECT_MESSAGE, &options)? else {
            return self.farewell();
        };

        match menu_choice(&tables, index) {
            Some(MenuChoice::Table(table)) => {
                self.session.select_table(table.clone());
                Ok(State::Execute(table))
            }
            Some(MenuChoice::Help) => {
                write_help(&mut self.out)?;
                Ok(State::List)
            }
            Some(MenuChoice::ExternalQuery) => {
                self.external_query()?;
                Ok(State::List)
            }
            None => Ok(State::List),
        }
    }

    fn external_query(&mut self) -> io::Result<()> {
        self.out.flush()?;
        let Some(prompt) = self
            .prompter
            .input("Enter your prompt for the completion service: ")?
        else {
            return Ok(());
        };

        let reply = self.completion.ask(prompt.trim());
        writeln!(self.out, "Completion service replies: {}", reply)
    }

    fn execute(&mut self, table: String) -> io::Result<State> {
        self.out.flush()?;
        let message = format!("\nEnter your SQL query for table '{}': ", table);
        let Some(query) = self.prompter.input(&message)? else {
            return self.farewell();
        };
        let query = query.trim();

        if query.eq_ignore_ascii_case("exit") {
            return self.farewell();
        }
        if query.eq_ignore_ascii_case("clear") {
            self.prompter.clear_screen()?;
            return Ok(State::List);
        }

        match self.session.database().execute(query) {
            Ok(result) => write_result(&mut self.out, &result)?,
            Err(e) => writeln!(self.out, "Error in query: {}", e)?,
        }
        Ok(State::List)
    }

    fn farewell(&mut self) -> io::Result<State> {
        writeln!(self.out, "{}", FAREWELL_MESSAGE)?;
        Ok(State::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TabliteError};
    use crate::storage::table::{ResultSet, Value};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct FakeDb {
        tables: Vec<String>,
        executed: RefCell<Vec<String>>,
    }

    impl FakeDb {
        fn new(tables: &[&str]) -> Self {
            Self {
                tables: tables.iter().map(|t| t.to_string()).collect(),
                executed: RefCell::new(Vec::new()),
            }
        }
    }

    impl QueryExecutor for FakeDb {
        fn list_tables(&self) -> Result<Vec<String>> {
            Ok(self.tables.clone())
        }

        fn execute(&self, sql: &str) -> Result<ResultSet> {
            self.executed.borrow_mut().push(sql.to_string());
            if sql.starts_with("SELECT") {
                Ok(ResultSet {
                    columns: vec!["x".into()],
                    rows: vec![vec![Value::Integer(1)]],
                })
            } else {
                Err(TabliteError::Execution("syntax error".into()))
            }
        }
    }

    struct Echo;

    impl Completion for Echo {
        fn complete(&self, prompt: &str) -> Result<String> {
            Ok(format!("echo: {}", prompt))
        }
    }

    #[derive(Default)]
    struct Script {
        selections: VecDeque<Option<usize>>,
        inputs: VecDeque<String>,
        cleared: usize,
    }

    impl Prompter for Script {
        fn select(&mut self, _message: &str, _options: &[String]) -> io::Result<Option<usize>> {
            Ok(self.selections.pop_front().flatten())
        }

        fn input(&mut self, _message: &str) -> io::Result<Option<String>> {
            Ok(self.inputs.pop_front())
        }

        fn clear_screen(&mut self) -> io::Result<()> {
            self.cleared += 1;
            Ok(())
        }
    }

    fn console<'a>(
        db: &'a FakeDb,
        script: Script,
    ) -> Console<'a, FakeDb, Echo, Script, Vec<u8>> {
        Console::new(db, &Echo, script, Vec::new())
    }

    #[test]
    fn test_list_with_no_tables_is_done() {
        let db = FakeDb::new(&[]);
        let mut console = console(&db, Script::default());

        assert_eq!(console.step(State::List).unwrap(), State::Done);
        let (_, out) = console.into_parts();
        assert!(String::from_utf8(out).unwrap().contains(NO_TABLES_MESSAGE));
    }

    #[test]
    fn test_list_moves_to_select() {
        let db = FakeDb::new(&["people"]);
        let mut console = console(&db, Script::default());

        assert_eq!(
            console.step(State::List).unwrap(),
            State::Select(vec!["people".into()])
        );
    }

    #[test]
    fn test_select_table_moves_to_execute() {
        let db = FakeDb::new(&["people"]);
        let script = Script {
            selections: VecDeque::from([Some(0)]),
            ..Default::default()
        };
        let mut console = console(&db, script);

        let next = console.step(State::Select(vec!["people".into()])).unwrap();
        assert_eq!(next, State::Execute("people".into()));
        assert_eq!(console.session.selected_table(), Some("people"));
    }

    #[test]
    fn test_select_cancel_is_done() {
        let db = FakeDb::new(&["people"]);
        let script = Script {
            selections: VecDeque::from([None]),
            ..Default::default()
        };
        let mut console = console(&db, script);

        let next = console.step(State::Select(vec!["people".into()])).unwrap();
        assert_eq!(next, State::Done);
    }

    #[test]
    fn test_exit_is_case_insensitive() {
        let db = FakeDb::new(&["people"]);
        let script = Script {
            inputs: VecDeque::from(["  ExIt ".to_string()]),
            ..Default::default()
        };
        let mut console = console(&db, script);

        assert_eq!(console.step(State::Execute("people".into())).unwrap(), State::Done);
        assert!(db.executed.borrow().is_empty());
    }

    #[test]
    fn test_clear_skips_execution() {
        let db = FakeDb::new(&["people"]);
        let script = Script {
            inputs: VecDeque::from(["CLEAR".to_string()]),
            ..Default::default()
        };
        let mut console = console(&db, script);

        assert_eq!(console.step(State::Execute("people".into())).unwrap(), State::List);
        assert!(db.executed.borrow().is_empty());
        let (script, _) = console.into_parts();
        assert_eq!(script.cleared, 1);
    }

    #[test]
    fn test_failed_query_returns_to_list() {
        let db = FakeDb::new(&["people"]);
        let script = Script {
            inputs: VecDeque::from(["SELEKT *".to_string()]),
            ..Default::default()
        };
        let mut console = console(&db, script);

        assert_eq!(console.step(State::Execute("people".into())).unwrap(), State::List);
        let (_, out) = console.into_parts();
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Error in query: syntax error"));
    }

    #[test]
    fn test_external_query_prints_reply() {
        let db = FakeDb::new(&["people"]);
        let script = Script {
            selections: VecDeque::from([Some(2), None]),
            inputs: VecDeque::from(["what is sql?".to_string()]),
            ..Default::default()
        };
        let mut console = console(&db, script);

        console.run().unwrap();
        let (_, out) = console.into_parts();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Completion service replies: echo: what is sql?"));
        assert!(db.executed.borrow().is_empty());
    }

    #[test]
    fn test_run_until_exit() {
        let db = FakeDb::new(&["people"]);
        let script = Script {
            selections: VecDeque::from([Some(1), Some(0), Some(0)]),
            inputs: VecDeque::from(["SELECT 1".to_string(), "exit".to_string()]),
            ..Default::default()
        };
        let mut console = console(&db, script);

        console.run().unwrap();
        assert_eq!(*db.executed.borrow(), vec!["SELECT 1".to_string()]);

        let (script, out) = console.into_parts();
        assert!(script.selections.is_empty());
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Example SQL queries"));
        assert!(out.contains("x\n1\n"));
        assert!(out.ends_with(&format!("{}\n", FAREWELL_MESSAGE)));
    }

    #[test]
    fn test_end_of_input_is_done() {
        let db = FakeDb::new(&["people"]);
        let script = Script {
            selections: VecDeque::from([Some(0)]),
            ..Default::default()
        };
        let mut console = console(&db, script);

        console.run().unwrap();
        let (_, out) = console.into_parts();
        assert!(String::from_utf8(out).unwrap().contains(FAREWELL_MESSAGE));
    }
}
