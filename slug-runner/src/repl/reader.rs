use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use slug_core::ast::Program;
use slug_core::parser::{parse, ParseError};

const PROMPT: &str = ">> ";

pub enum ReadOutput {
    Exit,
    Clear,
    Invalid(ParseError),
    Value(Program),
}

pub struct Reader {
    rl: Editor<(), DefaultHistory>,
}

impl Reader {
    pub fn new(rl: Editor<(), DefaultHistory>) -> Self {
        Self { rl }
    }

    pub fn read(&mut self) -> ReadOutput {
        let line = match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => return ReadOutput::Clear,
            Err(ReadlineError::Eof) => return ReadOutput::Exit,
            Err(error) => {
                tracing::warn!(%error, "cannot read line");
                return ReadOutput::Exit;
            }
            Ok(line) => line,
        };
        if line.trim().is_empty() {
            return ReadOutput::Clear;
        }
        if let Err(error) = self.rl.add_history_entry(line.as_str()) {
            tracing::debug!(%error, "history entry dropped");
        }

        match parse(&line) {
            Ok(program) => ReadOutput::Value(program),
            Err(error) => ReadOutput::Invalid(error),
        }
    }
}
