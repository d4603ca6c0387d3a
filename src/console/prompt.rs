use std::io;

/// Label of the pseudo-entry that prints example queries.
pub const HELP_ENTRY: &str = "help";
/// Label of the pseudo-entry that forwards a prompt to the completion service.
pub const EXTERNAL_QUERY_ENTRY: &str = "external-query";

/// Interactive input used by the console.
pub trait Prompter {
    /// Single-choice selection. Returns the index of the chosen option, or
    /// `None` when the user cancels.
    fn select(&mut self, message: &str, options: &[String]) -> io::Result<Option<usize>>;

    /// One line of free text, without the trailing newline. `None` at end of
    /// input.
    fn input(&mut self, message: &str) -> io::Result<Option<String>>;

    fn clear_screen(&mut self) -> io::Result<()>;
}

/// What the user picked from the table menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Table(String),
    Help,
    ExternalQuery,
}

/// Table names followed by the two pseudo-entries.
pub fn menu_options(tables: &[String]) -> Vec<String> {
    let mut options = tables.to_vec();
    options.push(HELP_ENTRY.to_string());
    options.push(EXTERNAL_QUERY_ENTRY.to_string());
    options
}

/// Resolves a menu index by position, so a table that happens to be called
/// `help` is still selectable.
pub fn menu_choice(tables: &[String], index: usize) -> Option<MenuChoice> {
    match index {
        i if i < tables.len() => Some(MenuChoice::Table(tables[i].clone())),
        i if i == tables.len() => Some(MenuChoice::Help),
        i if i == tables.len() + 1 => Some(MenuChoice::ExternalQuery),
        _ => None,
    }
}
