pub mod error;
pub mod expressions;
pub mod statements;

use std::rc::Rc;

use crate::ast::{Node, NodeId, Program};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};
pub use error::{Expected, ParseError};
use statements::{parse_block, parse_statement};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    program: Program,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(token) if token.kind == TokenKind::Eof) {
            let end = tokens.last().map(|token| token.end).unwrap_or(0);
            tokens.push(Token {
                kind: TokenKind::Eof,
                start: end,
                end,
                position: Default::default(),
            });
        }
        Self {
            tokens,
            position: 0,
            program: Program::default(),
        }
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    /// Looks `offset` tokens ahead without consuming; clamps to the final
    /// `Eof`.
    pub(crate) fn peek_nth(&self, offset: usize) -> &TokenKind {
        let index = (self.position + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    /// Never advances past the final `Eof`.
    pub(crate) fn next_token(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.next_token();
        if token.kind == token_kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected_token(token_kind, token))
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Rc<str>, ParseError> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            _ => Err(ParseError::unexpected_other(Expected::Identifier, token)),
        }
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.program.push(node)
    }

    /// Chains statements right-leaning: `[a, b, c]` becomes `seq(a, seq(b, c))`.
    pub(crate) fn sequence(&mut self, statements: Vec<NodeId>) -> Option<NodeId> {
        let mut statements = statements.into_iter().rev();
        let last = statements.next()?;
        Some(statements.fold(last, |rest, first| {
            self.push(Node::Sequence { first, rest })
        }))
    }

    /// A program is either one block (when it starts with `{`) or a flat run
    /// of statements evaluated directly in the global scope.
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let root = if self.check(&TokenKind::LBrace) {
            let block = parse_block(&mut self)?;
            if !self.check(&TokenKind::Eof) {
                return Err(ParseError::TrailingInput(self.next_token()));
            }
            Some(block)
        } else {
            let mut statements = Vec::new();
            while !self.check(&TokenKind::Eof) {
                statements.push(parse_statement(&mut self)?);
            }
            self.sequence(statements)
        };

        self.program.set_root(root);
        tracing::debug!(nodes = self.program.len(), "parsed program");
        Ok(self.program)
    }
}

/// Tokenizes and parses `source` in one go.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(tokenize(source)?).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::lexer::LexError;
    use crate::token::Position;
    use pretty_assertions::assert_eq;

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let program = parse(input).unwrap();

            assert_eq!(program.to_string(), expected, "for `{}`", input)
        }
    }

    fn test_parse_errors(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let error = parse(input).unwrap_err();

            assert_eq!(error.to_string(), expected, "for `{}`", input)
        }
    }

    #[test]
    fn test_expression_precedence() {
        let tests = vec![
            ("-a * b;", "((-a) * b)"),
            ("!-a;", "(!(-a))"),
            ("a + b + c;", "((a + b) + c)"),
            ("a + b - c;", "((a + b) - c)"),
            ("a * b * c;", "((a * b) * c)"),
            ("a * b / c;", "((a * b) / c)"),
            ("a + b / c;", "(a + (b / c))"),
            ("a % b * c;", "((a % b) * c)"),
            ("a + b * c + d / e - f;", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5;", "(3 + 4); ((-5) * 5)"),
            ("5 > 4 == 3 < 4;", "((5 > 4) == (3 < 4))"),
            ("5 <= 4 != 3 >= 4;", "((5 <= 4) != (3 >= 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5;",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("a == b * c + d;", "(a == ((b * c) + d))"),
            ("a || b && c || d;", "((a || (b && c)) || d)"),
            ("a && b == c || !d;", "((a && (b == c)) || (!d))"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_grouped_expressions() {
        let tests = vec![
            ("1 + (2 + 3) + 4;", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2;", "((5 + 5) * 2)"),
            ("2 / (5 + 5);", "(2 / (5 + 5))"),
            ("-(5 + 5);", "(-(5 + 5))"),
            ("!(true == true);", "(!(true == true))"),
            ("(a || b) && c;", "((a || b) && c)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_expression() {
        let tests = vec![
            ("a + add(b * c) + d;", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8));",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("make(5)(3);", "make(5)(3)"),
            ("f();", "f()"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_statements() {
        let tests = vec![
            ("let x = 5;", "let x = 5"),
            ("var x = 5;", "let x = 5"),
            ("const y = x + 1;", "const y = (x + 1)"),
            ("x = x * 2;", "x = (x * 2)"),
            ("outn(x);", "outn(x)"),
            ("x == 2;", "(x == 2)"),
            ("let ok = outn(1);", "let ok = outn(1)"),
            ("{ let a = 1; a; }", "{ let a = 1; a }"),
            ("{}", "{}"),
            ("", ""),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_conditionals() {
        let tests = vec![
            ("if (x < y) { x; }", "if ((x < y)) { x }"),
            (
                "if (x < y) { x; } else { y; }",
                "if ((x < y)) { x } else { y }",
            ),
            (
                "if (a) { 1; } elif (b) { 2; } elif (c) { 3; } else { 4; }",
                "if (a) { 1 } elif (b) { 2 } elif (c) { 3 } else { 4 }",
            ),
            ("if (a) {} elif (b) {}", "if (a) {} elif (b) {}"),
            ("let r = if (a) { 1; } else { 2; };", "let r = if (a) { 1 } else { 2 }"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_while_loops() {
        let tests = vec![
            (
                "while (i < 10) { i = i + 1; }",
                "while ((i < 10)) { i = (i + 1) }",
            ),
            ("let r = while (false) { 1; };", "let r = while (false) { 1 }"),
            ("while (true) {}", "while (true) {}"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_function_literals() {
        let tests = vec![
            ("let id = func(x) => x;", "let id = func(x) => x"),
            ("let none = func() => 1;", "let none = func() => 1"),
            (
                "let add = func(x, y) => { x + y; };",
                "let add = func(x, y) => { (x + y) }",
            ),
            (
                "let make = func(n) => func(x) => x + n;",
                "let make = func(n) => func(x) => (x + n)",
            ),
            ("let dup = func(a, a) => a;", "let dup = func(a, a) => a"),
            (
                "func side() => { outn(99); true };",
                "let side = func() => { outn(99); true }",
            ),
            ("func twice(x) => x * 2", "let twice = func(x) => (x * 2)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_optional_terminators() {
        let tests = vec![
            ("{ outn(99); true }", "{ outn(99); true }"),
            ("let x = 1; x", "let x = 1; x"),
            ("{ let x = 1 }", "{ let x = 1 }"),
            ("if (a) { b } ; c;", "if (a) { b }; c"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_sequences_lean_right() {
        let program = parse("a; b; c;").unwrap();
        let root = program.root().unwrap();

        let Node::Sequence { first, rest } = &program[root] else {
            panic!("expected a sequence, got {:?}", program[root]);
        };
        assert_eq!(program[*first], Node::Identifier("a".into()));
        let Node::Sequence { first, rest } = &program[*rest] else {
            panic!("expected a nested sequence");
        };
        assert_eq!(program[*first], Node::Identifier("b".into()));
        assert_eq!(program[*rest], Node::Identifier("c".into()));
    }

    #[test]
    fn test_block_program_shape() {
        let program = parse("{ outn(1); }").unwrap();
        let root = program.root().unwrap();
        assert!(matches!(program[root], Node::Block(Some(_))));

        let program = parse("outn(1); { outn(2); }").unwrap();
        let root = program.root().unwrap();
        assert!(matches!(program[root], Node::Sequence { .. }));

        let program = parse("").unwrap();
        assert_eq!(program.root(), None);
    }

    #[test]
    fn test_errors() {
        let tests = vec![
            (
                "let = 5;",
                "expected identifier, found '=' at line 1, column 5",
            ),
            (
                "let x 5;",
                "expected '=', found number 5 at line 1, column 7",
            ),
            (
                "let x = 5 6;",
                "expected ';', found number 6 at line 1, column 11",
            ),
            ("1 +;", "expected expression, found ';' at line 1, column 4"),
            (
                "(1 + 2;",
                "expected ')', found ';' at line 1, column 7",
            ),
            (
                "if x { 1; }",
                "expected '(', found identifier 'x' at line 1, column 4",
            ),
            (
                "while (true) outn(1);",
                "expected '{', found 'outn' at line 1, column 14",
            ),
            (
                "func(1) => 1;",
                "expected identifier, found number 1 at line 1, column 6",
            ),
            (
                "func(a b) => 1;",
                "expected ')', found identifier 'b' at line 1, column 8",
            ),
            (
                "func(a) a;",
                "expected '=>', found identifier 'a' at line 1, column 9",
            ),
            (
                "{ let a = 1;",
                "expected '}', found end of input at line 1, column 13",
            ),
            (
                "{ 1; } 2;",
                "expected end of input after the program block, found number 2 at line 1, column 8",
            ),
            ("outn 1;", "expected '(', found number 1 at line 1, column 6"),
            ("else { }", "expected expression, found 'else' at line 1, column 1"),
            (
                "1 = 2;",
                "expected ';', found '=' at line 1, column 3",
            ),
        ];

        test_parse_errors(tests)
    }

    #[test]
    fn test_lex_errors_surface_through_parse() {
        assert_eq!(
            parse("let a = 1 $ 2;"),
            Err(ParseError::Lex(LexError::UnexpectedCharacter {
                character: '$',
                position: Position { line: 1, column: 11 },
            }))
        );
    }

    #[test]
    fn test_parser_appends_missing_eof() {
        let program = Parser::new(Vec::new()).parse_program().unwrap();
        assert_eq!(program.root(), None);
    }
}
