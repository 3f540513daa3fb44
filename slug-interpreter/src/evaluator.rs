use std::io::Write;
use std::rc::Rc;

use slug_core::ast::{BinaryOperator, Node, NodeId, Program, UnaryOperator};
use slug_core::stack::ensure_sufficient_stack;

use crate::builtins;
use crate::environment::Environment;
use crate::value::{Closure, EvaluationError, Value};

/// Tree-walking evaluator. Holds the sink `outn` writes to and the call depth
/// bookkeeping; all bindings live in the [`Environment`] passed in.
pub struct Evaluator<W: Write> {
    output: W,
    max_call_depth: usize,
    depth: usize,
}

impl<W: Write> Evaluator<W> {
    pub fn new(output: W, max_call_depth: usize) -> Self {
        Evaluator {
            output,
            max_call_depth,
            depth: 0,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs a whole program directly in `environment`. An empty program
    /// evaluates to null.
    pub fn eval_program(
        &mut self,
        program: &Rc<Program>,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        self.depth = 0;
        let result = match program.root() {
            Some(root) => self.eval(program, root, environment),
            None => Ok(Value::Null),
        };
        self.output.flush()?;
        result
    }

    fn eval(
        &mut self,
        program: &Rc<Program>,
        id: NodeId,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        ensure_sufficient_stack(|| self.eval_node(program, id, environment))
    }

    fn eval_node(
        &mut self,
        program: &Rc<Program>,
        id: NodeId,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        match &program[id] {
            Node::IntegerLiteral(value) => Ok(Value::Integer(*value)),
            Node::BooleanLiteral(value) => Ok(Value::Boolean(*value)),
            Node::Identifier(name) => environment
                .lookup(name)
                .ok_or_else(|| EvaluationError::UndefinedVariable(name.clone())),
            Node::Declaration {
                name,
                value,
                constant,
            } => {
                let value = self.eval(program, *value, environment)?;
                environment.declare(name.clone(), value.clone(), *constant)?;
                Ok(value)
            }
            Node::Assignment { name, value } => {
                let value = self.eval(program, *value, environment)?;
                if !environment.assign(name, value.clone())? {
                    return Err(EvaluationError::AssignToUndefined(name.clone()));
                }
                Ok(value)
            }
            Node::Unary { operator, operand } => {
                let operand = self.eval(program, *operand, environment)?;
                eval_unary_operation(*operator, operand)
            }
            Node::Binary {
                operator,
                left,
                right,
            } => self.eval_binary(program, *operator, *left, *right, environment),
            Node::Sequence { first, rest } => {
                self.eval(program, *first, environment)?;
                self.eval(program, *rest, environment)
            }
            // A block reached as a statement opens its own scope; constructs
            // that own a block body go through `eval_body` instead.
            Node::Block(inner) => self.eval_block(program, *inner, &environment.child()),
            Node::If {
                branches,
                otherwise,
            } => {
                for branch in branches {
                    let condition = self.eval(program, branch.condition, environment)?;
                    if expect_condition("if", condition)? {
                        return self.eval_body(program, branch.body, &environment.child());
                    }
                }
                match otherwise {
                    Some(body) => self.eval_body(program, *body, &environment.child()),
                    None => Ok(Value::Null),
                }
            }
            Node::While { condition, body } => {
                let mut result = Value::Null;
                loop {
                    let value = self.eval(program, *condition, environment)?;
                    if !expect_condition("while", value)? {
                        return Ok(result);
                    }
                    result = self.eval_body(program, *body, &environment.child())?;
                }
            }
            Node::FunctionLiteral(function) => Ok(Value::Closure(Closure {
                program: program.clone(),
                parameters: function.parameters.clone(),
                body: function.body,
                environment: environment.clone(),
            })),
            Node::Call { callee, arguments } => {
                let closure = match self.eval(program, *callee, environment)? {
                    Value::Closure(ref closure) => closure.clone(),
                    other => return Err(EvaluationError::CallNonFunction(other)),
                };
                if closure.arity() != arguments.len() {
                    return Err(EvaluationError::WrongArgumentCount {
                        expected: closure.arity(),
                        actual: arguments.len(),
                    });
                }
                let arguments = self.eval_expressions(program, arguments, environment)?;
                self.apply_function(&closure, arguments)
            }
            Node::BuiltinCall { builtin, arguments } => {
                let arguments = self.eval_expressions(program, arguments, environment)?;
                builtins::apply(*builtin, arguments, &mut self.output)
            }
        }
    }

    fn eval_expressions(
        &mut self,
        program: &Rc<Program>,
        expressions: &[NodeId],
        environment: &Environment,
    ) -> Result<Vec<Value>, EvaluationError> {
        let mut result = Vec::with_capacity(expressions.len());
        for expression in expressions {
            result.push(self.eval(program, *expression, environment)?);
        }
        Ok(result)
    }

    fn eval_block(
        &mut self,
        program: &Rc<Program>,
        inner: Option<NodeId>,
        scope: &Environment,
    ) -> Result<Value, EvaluationError> {
        match inner {
            Some(inner) => self.eval(program, inner, scope),
            None => Ok(Value::Null),
        }
    }

    /// Evaluates the body of an if branch, loop, or function in `scope`,
    /// which the caller has already created.
    fn eval_body(
        &mut self,
        program: &Rc<Program>,
        body: NodeId,
        scope: &Environment,
    ) -> Result<Value, EvaluationError> {
        match &program[body] {
            Node::Block(inner) => self.eval_block(program, *inner, scope),
            _ => self.eval(program, body, scope),
        }
    }

    fn apply_function(
        &mut self,
        closure: &Closure,
        arguments: Vec<Value>,
    ) -> Result<Value, EvaluationError> {
        if self.depth >= self.max_call_depth {
            return Err(EvaluationError::CallDepthExceeded {
                limit: self.max_call_depth,
            });
        }

        let scope = closure.environment.child();
        for (parameter, argument) in closure.parameters.iter().zip(arguments) {
            scope.bind_local(parameter.clone(), argument, false);
        }

        tracing::trace!(depth = self.depth, arity = closure.arity(), "calling closure");
        self.depth += 1;
        let result = self.eval_body(&closure.program, closure.body, &scope);
        self.depth -= 1;
        result
    }

    fn eval_binary(
        &mut self,
        program: &Rc<Program>,
        operator: BinaryOperator,
        left: NodeId,
        right: NodeId,
        environment: &Environment,
    ) -> Result<Value, EvaluationError> {
        let left = self.eval(program, left, environment)?;
        match operator {
            BinaryOperator::And => {
                if !expect_boolean(operator, left)? {
                    return Ok(Value::Boolean(false));
                }
                let right = self.eval(program, right, environment)?;
                Ok(Value::Boolean(expect_boolean(operator, right)?))
            }
            BinaryOperator::Or => {
                if expect_boolean(operator, left)? {
                    return Ok(Value::Boolean(true));
                }
                let right = self.eval(program, right, environment)?;
                Ok(Value::Boolean(expect_boolean(operator, right)?))
            }
            _ => {
                let right = self.eval(program, right, environment)?;
                eval_infix_operation(operator, left, right)
            }
        }
    }
}

fn expect_number(operator: &'static str, value: Value) -> Result<i64, EvaluationError> {
    match value {
        Value::Integer(value) => Ok(value),
        other => Err(EvaluationError::ExpectedNumber {
            operator,
            found: other.type_name(),
        }),
    }
}

fn expect_boolean(operator: BinaryOperator, value: Value) -> Result<bool, EvaluationError> {
    match value {
        Value::Boolean(value) => Ok(value),
        other => Err(EvaluationError::ExpectedBoolean {
            operator: operator.to_str(),
            found: other.type_name(),
        }),
    }
}

fn expect_condition(construct: &'static str, value: Value) -> Result<bool, EvaluationError> {
    match value {
        Value::Boolean(value) => Ok(value),
        other => Err(EvaluationError::NonBooleanCondition {
            construct,
            found: other.type_name(),
        }),
    }
}

fn eval_unary_operation(operator: UnaryOperator, operand: Value) -> Result<Value, EvaluationError> {
    match (operator, operand) {
        (UnaryOperator::Negate, Value::Integer(value)) => Ok(Value::Integer(value.wrapping_neg())),
        (UnaryOperator::Not, Value::Boolean(value)) => Ok(Value::Boolean(!value)),
        (UnaryOperator::Negate, other) => Err(EvaluationError::ExpectedNumber {
            operator: operator.to_str(),
            found: other.type_name(),
        }),
        (UnaryOperator::Not, other) => Err(EvaluationError::ExpectedBoolean {
            operator: operator.to_str(),
            found: other.type_name(),
        }),
    }
}

fn eval_infix_operation(
    operator: BinaryOperator,
    left: Value,
    right: Value,
) -> Result<Value, EvaluationError> {
    use BinaryOperator::*;

    match operator {
        Equal => return Ok(Value::Boolean(left.equals(&right))),
        NotEqual => return Ok(Value::Boolean(!left.equals(&right))),
        _ => {}
    }

    let symbol = operator.to_str();
    let left = expect_number(symbol, left)?;
    let right = expect_number(symbol, right)?;
    let value = match operator {
        Plus => Value::Integer(left.wrapping_add(right)),
        Minus => Value::Integer(left.wrapping_sub(right)),
        Multiply => Value::Integer(left.wrapping_mul(right)),
        Divide if right == 0 => return Err(EvaluationError::DivisionByZero),
        Divide => Value::Integer(left.wrapping_div(right)),
        Modulo if right == 0 => return Err(EvaluationError::ModulusByZero),
        Modulo => Value::Integer(left.wrapping_rem(right)),
        LessThan => Value::Boolean(left < right),
        LessEqual => Value::Boolean(left <= right),
        GreaterThan => Value::Boolean(left > right),
        GreaterEqual => Value::Boolean(left >= right),
        Equal | NotEqual | And | Or => unreachable!("handled before numeric operands"),
    };
    Ok(value)
}
