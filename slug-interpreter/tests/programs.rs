use pretty_assertions::assert_eq;
use slug_interpreter::value::{EvaluationError, Value};
use slug_interpreter::{run_source, Error};

fn output_of(source: &str) -> String {
    let mut output = Vec::new();
    if let Err(error) = run_source(source, &mut output) {
        panic!("{}", error);
    }
    String::from_utf8(output).unwrap()
}

fn failure_of(source: &str) -> (Error, String) {
    let mut output = Vec::new();
    let error = match run_source(source, &mut output) {
        Ok(value) => panic!("expected failure, got {}", value),
        Err(error) => error,
    };
    (error, String::from_utf8(output).unwrap())
}

#[test]
fn integer_literals_keep_every_digit() {
    assert_eq!(
        output_of("outn(42); outn(7); outn(0); outn(1234567890);"),
        "42\n7\n0\n1234567890\n"
    );
    assert_eq!(output_of("outn(7 / 2); outn(7 % 2);"), "3\n1\n");
}

#[test]
fn fibonacci_loop() {
    let source = "
        // iterative fibonacci
        let a = 0;
        let b = 1;
        let i = 0;
        while (i < 10) {
            outn(a);
            let next = a + b;
            a = b;
            b = next;
            i = i + 1;
        }
    ";

    assert_eq!(output_of(source), "0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n");
}

#[test]
fn fizzbuzz_codes() {
    let source = "
        func classify(n) => if (n % 15 == 0) { -15 }
            elif (n % 5 == 0) { -5 }
            elif (n % 3 == 0) { -3 }
            else { n };

        var n = 1;
        while (n <= 15) {
            outn(classify(n));
            n = n + 1;
        }
    ";

    assert_eq!(
        output_of(source),
        "1\n2\n-3\n4\n-5\n-3\n7\n8\n-3\n-5\n11\n-3\n13\n14\n-15\n"
    );
}

#[test]
fn whole_program_block() {
    let source = "{
        let x = 1;
        { let x = 2; }
        outn(x);
    }";

    assert_eq!(output_of(source), "2\n");
}

#[test]
fn redeclaration_overwrites_outer_binding() {
    assert_eq!(output_of("let x = 1; { let x = 2; } outn(x);"), "2\n");
    assert_eq!(output_of("let x = 1; x = 2; outn(x);"), "2\n");
}

#[test]
fn counters_keep_independent_state() {
    let source = "
        let counter = func() => {
            let count = 0;
            func() => {
                count = count + 1;
                count
            }
        };
        let first = counter();
        let second = counter();
        first();
        first();
        outn(first());
        outn(second());
    ";

    assert_eq!(output_of(source), "3\n1\n");
}

#[test]
fn closures_created_in_a_loop() {
    let source = "
        let i = 0;
        let last = func() => 0;
        while (i < 3) {
            let captured = i * 10;
            last = func() => captured;
            i = i + 1;
        }
        outn(last());
    ";

    assert_eq!(output_of(source), "20\n");
}

#[test]
fn higher_order_functions() {
    let source = "
        let twice = func(f, x) => f(f(x));
        let square = func(n) => n * n;
        outn(twice(square, 3));
        let compose = func(f, g) => func(x) => f(g(x));
        let inc = func(n) => n + 1;
        outn(compose(inc, square)(4));
    ";

    assert_eq!(output_of(source), "81\n17\n");
}

#[test]
fn recursive_factorial() {
    let source = "
        func fact(n) => if (n <= 1) { 1 } else { n * fact(n - 1) };
        outn(fact(10));
    ";

    assert_eq!(output_of(source), "3628800\n");
}

#[test]
fn short_circuit_skips_right_side() {
    let source = "
        func sideEffect() => { outn(99); true };
        false && sideEffect();
        true || sideEffect();
    ";

    assert_eq!(output_of(source), "");
}

#[test]
fn program_value_is_last_statement() {
    let mut output = Vec::new();
    let value = run_source("let x = 4; x * x;", &mut output).unwrap();

    assert_eq!(value, Value::Integer(16));
}

#[test]
fn constant_reassignment_prints_nothing() {
    let (error, output) = failure_of("const x = 1; x = 2; outn(x);");

    assert_eq!(error.to_string(), "runtime error: cannot assign to constant x");
    assert_eq!(output, "");
}

#[test]
fn division_by_zero_stops_the_run() {
    let (error, output) = failure_of("outn(7 / 2); outn(7 % 2); outn(1 / 0); outn(5);");

    assert!(matches!(
        error,
        Error::Runtime(EvaluationError::DivisionByZero)
    ));
    assert_eq!(output, "3\n1\n");
}

#[test]
fn arity_mismatch() {
    let (error, _) = failure_of("let add = func(a, b) => a + b; add(1);");

    assert_eq!(
        error.to_string(),
        "runtime error: arity mismatch: expected 2 arguments, got 1"
    );
}

#[test]
fn syntax_errors_run_nothing() {
    let (error, output) = failure_of("outn(1); let = 2;");

    assert!(matches!(error, Error::Parse(_)));
    assert_eq!(output, "");
}
