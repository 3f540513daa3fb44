use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use slug_core::lexer::tokenize;
use slug_interpreter::{Interpreter, InterpreterConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("io error: cannot read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error(transparent)]
    Slug(#[from] slug_interpreter::Error),
}

/// Reads the program from `path`, or all of stdin when no path is given.
pub fn read_source(path: Option<&Path>) -> Result<String, RunError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| RunError::Io {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| RunError::Io {
                    path: "<stdin>".to_owned(),
                    source,
                })?;
            Ok(source)
        }
    }
}

/// One line per token. Lexical errors are left for the parser to report.
pub fn dump_tokens(source: &str, out: &mut impl Write) -> io::Result<()> {
    let Ok(tokens) = tokenize(source) else {
        return Ok(());
    };
    tokens
        .iter()
        .try_for_each(|token| writeln!(out, "{}", token))?;
    out.flush()
}

pub fn execute(source: &str, config: InterpreterConfig) -> Result<(), RunError> {
    let stdout = BufWriter::new(io::stdout().lock());
    let mut interpreter = Interpreter::new(stdout, config);
    interpreter.run_source(source)?;
    Ok(())
}

pub fn run(path: Option<&Path>, config: InterpreterConfig, tokens: bool) -> Result<(), RunError> {
    let source = read_source(path)?;
    tracing::info!(bytes = source.len(), "read program");
    if tokens {
        if let Err(error) = dump_tokens(&source, &mut io::stderr().lock()) {
            tracing::warn!(%error, "cannot write token listing");
        }
    }
    execute(&source, config)
}
