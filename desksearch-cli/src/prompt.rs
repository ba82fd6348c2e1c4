//! Interactive prompt loop
//!
//! Walks the user through menu, record type, field and value, then hands the
//! query to the engine. Engine errors are printed and the session carries on;
//! only `quit`, end of input or an I/O failure ends it.

use desksearch_core::{Query, RecordStore, RecordType, SearchEngine};
use std::io::{self, BufRead, Write};
use tracing::debug;

const WELCOME: &[&str] = &[
    "Welcome to DeskSearch.",
    "Type 'quit' to exit at any time, Press 'Enter' to continue",
    "",
];

const OPTIONS: &[&str] = &[
    "Press 1 to search",
    "Press 2 to see a list of searchable fields",
    "Type 'quit' to exit",
];

const QUIT: &str = "quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Menu,
    SelectType,
    SelectField(RecordType),
    EnterValue(RecordType, String),
    Done,
}

/// One interactive session over arbitrary input and output streams
pub struct Session<'e, S: RecordStore, R, W> {
    engine: &'e SearchEngine<S>,
    input: R,
    output: W,
}

impl<'e, S: RecordStore, R: BufRead, W: Write> Session<'e, S, R, W> {
    pub fn new(engine: &'e SearchEngine<S>, input: R, output: W) -> Self {
        Self {
            engine,
            input,
            output,
        }
    }

    /// Run until the user quits or input runs out
    pub fn run(&mut self) -> io::Result<()> {
        self.print_all(WELCOME)?;
        self.print_all(OPTIONS)?;

        let mut step = Step::Menu;
        while step != Step::Done {
            step = match step {
                Step::Menu => self.menu()?,
                Step::SelectType => self.select_type()?,
                Step::SelectField(record_type) => self.select_field(record_type)?,
                Step::EnterValue(record_type, field) => self.enter_value(record_type, field)?,
                Step::Done => Step::Done,
            };
        }

        debug!("Session ended");
        Ok(())
    }

    fn menu(&mut self) -> io::Result<Step> {
        let Some(command) = self.read_line()? else {
            return Ok(Step::Done);
        };

        match command.trim() {
            "1" => Ok(Step::SelectType),
            "2" => {
                let lines = self.engine.list_all_fields();
                self.print_all(&lines)?;
                Ok(Step::SelectType)
            }
            _ => self.invalid_input(),
        }
    }

    fn select_type(&mut self) -> io::Result<Step> {
        let choices: Vec<String> = RecordType::ALL
            .iter()
            .map(|t| format!("{}) {}", t.menu_index(), t.title()))
            .collect();
        self.print(&format!("Select {}", choices.join(", ")))?;

        let Some(command) = self.read_line()? else {
            return Ok(Step::Done);
        };

        match command.parse::<RecordType>() {
            Ok(record_type) => Ok(Step::SelectField(record_type)),
            Err(_) => self.invalid_input(),
        }
    }

    fn select_field(&mut self, record_type: RecordType) -> io::Result<Step> {
        let fields = match self.engine.list_fields(record_type) {
            Ok(fields) => fields,
            Err(e) => return self.report_error(e),
        };

        self.print(&format!(
            "You can search {} for the following search terms: {}.",
            record_type,
            fields.join(", ")
        ))?;
        self.print("Enter search term")?;

        let Some(field) = self.read_line()? else {
            return Ok(Step::Done);
        };

        if fields.contains(&field) {
            Ok(Step::EnterValue(record_type, field))
        } else {
            self.invalid_input()
        }
    }

    fn enter_value(&mut self, record_type: RecordType, field: String) -> io::Result<Step> {
        self.print("Enter search value")?;

        let Some(value) = self.read_line()? else {
            return Ok(Step::Done);
        };

        let query = Query::new(record_type, field, value);
        match self.engine.search(&query) {
            Ok(lines) => self.print_all(&lines)?,
            Err(e) => return self.report_error(e),
        }

        self.back_to_menu()
    }

    /// Next line without its line ending. `None` on `quit` or end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let line = line.trim_end_matches(['\n', '\r']);
        if line == QUIT {
            return Ok(None);
        }
        Ok(Some(line.to_string()))
    }

    fn invalid_input(&mut self) -> io::Result<Step> {
        self.print("Invalid input")?;
        self.back_to_menu()
    }

    fn report_error(&mut self, error: impl std::fmt::Display) -> io::Result<Step> {
        debug!(%error, "Search failed");
        self.print(&format!("Error: {}", error))?;
        self.back_to_menu()
    }

    fn back_to_menu(&mut self) -> io::Result<Step> {
        self.print_all(OPTIONS)?;
        Ok(Step::Menu)
    }

    fn print(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    fn print_all<T: AsRef<str>>(&mut self, lines: &[T]) -> io::Result<()> {
        for line in lines {
            self.print(line.as_ref())?;
        }
        self.output.flush()
    }
}
