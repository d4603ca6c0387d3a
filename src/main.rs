use std::io::{self, stdout, Write};

use tracing_subscriber::EnvFilter;

use tablite::assistant::CompletionClient;
use tablite::cli::Cli;
use tablite::console::Console;
use tablite::database::{QueryExecutor, SqliteDatabase};
use tablite::format::write_result;
use tablite::loader::{load, prompt_for_inputs, success_message};
use tablite::tui::TerminalPrompter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse_args();
    let mut prompter = TerminalPrompter::new();
    let mut out = stdout();

    let Some((document, database)) = prompt_for_inputs(
        &mut prompter,
        &mut out,
        cli.file.clone(),
        cli.db.clone(),
        cli.delimiter,
    )?
    else {
        return Ok(());
    };

    let report = load(&document, &database)?;
    println!("{}", success_message(&document, &database, &report));

    if let Some(query) = &cli.query {
        // Non-interactive mode
        run_query(&database, query)?;
    } else {
        let completion = CompletionClient::new(cli.completion_config())?;
        let mut console = Console::new(&database, &completion, prompter, out);
        console.run()?;
    }

    Ok(())
}

fn run_query(database: &SqliteDatabase, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = database.execute(query)?;
    let mut out = stdout().lock();
    write_result(&mut out, &result)?;
    out.flush()?;
    Ok(())
}
