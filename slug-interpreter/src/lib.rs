pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod value;

use std::io::Write;
use std::rc::Rc;

use slug_core::ast::Program;
use slug_core::parser::{parse, ParseError};
use thiserror::Error;

use crate::environment::Environment;
use crate::evaluator::Evaluator;
use crate::value::{EvaluationError, Value};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Nested closure calls allowed before a run fails with
    /// [`EvaluationError::CallDepthExceeded`].
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Everything that can end a run. The display form is the single diagnostic
/// line reported to the user.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Runtime(#[from] EvaluationError),
}

/// Global scope plus evaluator. Successive runs share the global scope, so
/// bindings made by one program are visible to the next.
pub struct Interpreter<W: Write> {
    globals: Environment,
    evaluator: Evaluator<W>,
}

impl<W: Write> Interpreter<W> {
    pub fn new(output: W, config: InterpreterConfig) -> Self {
        Interpreter {
            globals: Environment::new(),
            evaluator: Evaluator::new(output, config.max_call_depth),
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn output(&self) -> &W {
        self.evaluator.output()
    }

    /// Evaluates `program` in the global scope and returns the value of its
    /// last statement.
    pub fn run(&mut self, program: Program) -> Result<Value, EvaluationError> {
        let program = Rc::new(program);
        tracing::debug!(nodes = program.len(), "evaluating program");
        self.evaluator.eval_program(&program, &self.globals)
    }

    pub fn run_source(&mut self, source: &str) -> Result<Value, Error> {
        let program = parse(source)?;
        Ok(self.run(program)?)
    }
}

/// Parses and runs `source` once with the default configuration.
pub fn run_source(source: &str, output: impl Write) -> Result<Value, Error> {
    Interpreter::new(output, InterpreterConfig::default()).run_source(source)
}
