mod printer;
mod reader;

use std::io::{self, Stderr, Stdout};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use slug_interpreter::{Interpreter, InterpreterConfig};

use printer::Printer;
use reader::{ReadOutput, Reader};

/// Line-at-a-time session over one global scope. Errors are reported and the
/// session continues with whatever bindings the failed line already made.
struct Repl {
    reader: Reader,
    interpreter: Interpreter<Stdout>,
    printer: Printer<Stdout, Stderr>,
}

impl Repl {
    fn run(mut self) {
        loop {
            match self.reader.read() {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Invalid(error) => self.printer.print(Err(error.into())),
                ReadOutput::Value(program) => {
                    let result = self.interpreter.run(program).map_err(Into::into);
                    self.printer.print(result)
                }
            }
        }
    }
}

pub fn start(config: InterpreterConfig) -> Result<(), ReadlineError> {
    let rl = DefaultEditor::new()?;

    Repl {
        reader: Reader::new(rl),
        interpreter: Interpreter::new(io::stdout(), config),
        printer: Printer::new(io::stdout(), io::stderr()),
    }
    .run();
    Ok(())
}
