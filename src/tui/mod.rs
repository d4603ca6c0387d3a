pub mod input;
pub mod picker;
pub mod ui;

use std::io::{self, stdout, BufRead, IsTerminal, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use ratatui::{prelude::*, TerminalOptions, Viewport};

use crate::console::Prompter;

use self::input::handle_events;
use self::picker::Picker;
use self::ui::{draw, CHROME_HEIGHT};

const MAX_PICKER_HEIGHT: u16 = 16;

/// Line-oriented prompter: numbered menus and plain text input. Used when the
/// terminal is not interactive and for entry-point prompts.
pub struct LinePrompter<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn select(&mut self, message: &str, options: &[String]) -> io::Result<Option<usize>> {
        if options.is_empty() {
            return Ok(None);
        }

        writeln!(self.writer, "{}", message)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {}) {}", i + 1, option)?;
        }

        loop {
            write!(self.writer, "Enter a number (1-{}): ", options.len())?;
            self.writer.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.writer, "Invalid choice: {}", line.trim())?,
            }
        }
    }

    fn input(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{}", message)?;
        self.writer.flush()?;
        self.read_line()
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        execute!(self.writer, Clear(ClearType::All), MoveTo(0, 0))
    }
}

/// Prompter for a real terminal: an arrow-key picker drawn inline below the
/// console output, falling back to numbered menus when stdin or stdout is
/// not a terminal.
pub struct TerminalPrompter {
    lines: LinePrompter<io::StdinLock<'static>, io::Stdout>,
    interactive: bool,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            lines: LinePrompter::new(io::stdin().lock(), stdout()),
            interactive: io::stdin().is_terminal() && stdout().is_terminal(),
        }
    }

    fn pick(&mut self, message: &str, options: &[String]) -> io::Result<Option<usize>> {
        let mut picker = Picker::new(message, options.to_vec());

        enable_raw_mode()?;
        let result = run_picker(&mut picker);
        disable_raw_mode()?;
        result?;

        if let Some(i) = picker.chosen() {
            println!("{} {}", message, options[i]);
        }
        Ok(picker.chosen())
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, message: &str, options: &[String]) -> io::Result<Option<usize>> {
        if options.is_empty() {
            return Ok(None);
        }
        if self.interactive {
            self.pick(message, options)
        } else {
            self.lines.select(message, options)
        }
    }

    fn input(&mut self, message: &str) -> io::Result<Option<String>> {
        self.lines.input(message)
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.lines.clear_screen()
    }
}

fn run_picker(picker: &mut Picker) -> io::Result<()> {
    let height = (picker.options.len() as u16)
        .saturating_add(CHROME_HEIGHT)
        .min(MAX_PICKER_HEIGHT);
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )?;

    loop {
        terminal.draw(|frame| draw(frame, picker))?;

        if handle_events(picker)? {
            break;
        }
    }

    // Leaves the cursor at the top of the erased viewport.
    terminal.clear()?;
    terminal.show_cursor()?;
    Ok(())
}
