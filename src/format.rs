use std::io::{self, Write};

use crate::storage::table::ResultSet;

pub const FIELD_SEPARATOR: &str = " | ";

pub const NO_ROWS_MESSAGE: &str = "Query executed successfully, but returned no rows.";

const EXAMPLE_QUERIES: [(&str, &str); 6] = [
    ("Fetch every row of a table", "SELECT * FROM your_table;"),
    ("Count the rows of a table", "SELECT COUNT(*) FROM your_table;"),
    (
        "Filter rows with a condition",
        "SELECT * FROM your_table WHERE column_name = 'value';",
    ),
    (
        "Aggregate a column (e.g. the average)",
        "SELECT AVG(column_name) FROM your_table;",
    ),
    (
        "Sort the rows",
        "SELECT * FROM your_table ORDER BY column_name DESC;",
    ),
    ("Limit the number of results", "SELECT * FROM your_table LIMIT 5;"),
];

/// Header line of column names followed by one line per row.
pub fn result_lines(result: &ResultSet) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.row_count() + 1);
    lines.push(result.columns.join(FIELD_SEPARATOR));

    for row in &result.rows {
        let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        lines.push(values.join(FIELD_SEPARATOR));
    }

    lines
}

pub fn write_result<W: Write>(out: &mut W, result: &ResultSet) -> io::Result<()> {
    if result.is_empty() {
        return writeln!(out, "{}", NO_ROWS_MESSAGE);
    }

    writeln!(out)?;
    for line in result_lines(result) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\nExample SQL queries you can try:")?;
    for (i, (description, sql)) in EXAMPLE_QUERIES.iter().enumerate() {
        writeln!(out, "{}. {}:", i + 1, description)?;
        writeln!(out, "   {}", sql)?;
    }
    Ok(())
}
