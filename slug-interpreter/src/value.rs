use std::fmt::Display;
use std::rc::Rc;

use gc::{Finalize, Trace};
use slug_core::ast::{NodeId, Program};
use thiserror::Error;

use crate::environment::Environment;

#[derive(Clone, Trace, Finalize)]
pub enum Value {
    Null,
    Integer(i64),
    Boolean(bool),
    Closure(Closure),
}

/// A function literal paired with the scope it was evaluated in. The scope
/// is shared, not copied: every closure created in it, and the scope itself,
/// see the same live bindings.
#[derive(Clone, Trace, Finalize)]
pub struct Closure {
    #[unsafe_ignore_trace]
    pub program: Rc<Program>,
    #[unsafe_ignore_trace]
    pub parameters: Rc<[Rc<str>]>,
    #[unsafe_ignore_trace]
    pub body: NodeId,
    pub environment: Environment,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Closure(_) => "function",
        }
    }

    /// Language-level `==`: only numbers and booleans have equal
    /// representations. Everything else, `null` and closures included, is
    /// unequal to everything.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(left), Value::Integer(right)) => left == right,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            _ => false,
        }
    }
}

impl Closure {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    fn same_function(&self, other: &Closure) -> bool {
        Rc::ptr_eq(&self.program, &other.program)
            && self.body == other.body
            && self.environment.ptr_eq(&other.environment)
    }
}

/// Structural equality for inspecting results from Rust; closures compare by
/// identity. Scripts use [`Value::equals`] instead.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Closure(left), Value::Closure(right)) => left.same_function(right),
            _ => self.equals(other),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Closure(_) => write!(f, "<function>"),
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            Value::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            Value::Closure(closure) => f
                .debug_struct("Closure")
                .field("parameters", &closure.parameters)
                .field("body", &closure.body)
                .finish(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("undefined variable {0}")]
    UndefinedVariable(Rc<str>),
    #[error("assign to undefined variable {0}")]
    AssignToUndefined(Rc<str>),
    #[error("cannot assign to constant {0}")]
    AssignToConstant(Rc<str>),
    #[error("operator '{operator}' expected number, got {found}")]
    ExpectedNumber {
        operator: &'static str,
        found: &'static str,
    },
    #[error("operator '{operator}' expected boolean, got {found}")]
    ExpectedBoolean {
        operator: &'static str,
        found: &'static str,
    },
    #[error("{construct} condition expected boolean, got {found}")]
    NonBooleanCondition {
        construct: &'static str,
        found: &'static str,
    },
    #[error("cannot call {0}: not a function")]
    CallNonFunction(Value),
    #[error("arity mismatch: expected {expected} arguments, got {actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulus by zero")]
    ModulusByZero,
    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
