use std::io::Write;

use slug_interpreter::value::Value;

/// Echoes each line's value to `out` and failures to `err`, one line each.
pub struct Printer<O: Write, E: Write> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> Printer<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn print(&mut self, result: Result<Value, slug_interpreter::Error>) {
        let written = match result {
            // Statements such as `outn` already wrote their own output.
            Ok(Value::Null) => Ok(()),
            Ok(value) => writeln!(self.out, "{}", value),
            Err(error) => writeln!(self.err, "{}", error),
        };
        if let Err(error) = written.and_then(|_| self.out.flush()) {
            tracing::warn!(%error, "cannot write result");
        }
    }
}
