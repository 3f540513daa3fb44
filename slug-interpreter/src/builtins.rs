use std::io::Write;

use slug_core::ast::Builtin;

use crate::value::{EvaluationError, Value};

fn builtin_outn(arguments: Vec<Value>, output: &mut impl Write) -> Result<Value, EvaluationError> {
    for argument in arguments {
        writeln!(output, "{}", argument)?;
    }
    Ok(Value::Boolean(true))
}

/// Runs `builtin` on already evaluated arguments. The parser fixes the
/// argument count, so only the count the builtin declares is ever passed.
pub fn apply(
    builtin: Builtin,
    arguments: Vec<Value>,
    output: &mut impl Write,
) -> Result<Value, EvaluationError> {
    if arguments.len() != builtin.arity() {
        return Err(EvaluationError::WrongArgumentCount {
            expected: builtin.arity(),
            actual: arguments.len(),
        });
    }

    match builtin {
        Builtin::Outn => builtin_outn(arguments, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outn() {
        let tests = vec![
            (Value::Integer(-7), "-7\n"),
            (Value::Boolean(false), "false\n"),
            (Value::Null, "null\n"),
        ];

        for (value, expected) in tests {
            let mut output = Vec::new();
            let result = apply(Builtin::Outn, vec![value], &mut output).unwrap();

            assert_eq!(result, Value::Boolean(true));
            assert_eq!(String::from_utf8(output).unwrap(), expected);
        }
    }

    #[test]
    fn test_outn_arity() {
        let mut output = Vec::new();
        let result = apply(Builtin::Outn, vec![], &mut output);

        assert!(matches!(
            result,
            Err(EvaluationError::WrongArgumentCount {
                expected: 1,
                actual: 0
            })
        ));
        assert!(output.is_empty());
    }
}
