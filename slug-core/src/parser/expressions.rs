use crate::ast::{BinaryOperator, Branch, Builtin, FunctionLiteral, Node, NodeId, UnaryOperator};
use crate::parser::error::{Expected, ParseError};
use crate::parser::statements::parse_block;
use crate::parser::Parser;
use crate::stack::ensure_sufficient_stack;
use crate::token::TokenKind;

pub fn binary_operator(token: &TokenKind) -> Option<BinaryOperator> {
    match token {
        TokenKind::Or => Some(BinaryOperator::Or),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Equal => Some(BinaryOperator::Equal),
        TokenKind::NotEqual => Some(BinaryOperator::NotEqual),
        TokenKind::LessThan => Some(BinaryOperator::LessThan),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::GreaterThan => Some(BinaryOperator::GreaterThan),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::Plus => Some(BinaryOperator::Plus),
        TokenKind::Minus => Some(BinaryOperator::Minus),
        TokenKind::Asterisk => Some(BinaryOperator::Multiply),
        TokenKind::Slash => Some(BinaryOperator::Divide),
        TokenKind::Percent => Some(BinaryOperator::Modulo),
        _ => None,
    }
}

pub fn parse_expression(parser: &mut Parser) -> Result<NodeId, ParseError> {
    ensure_sufficient_stack(|| {
        let left = parse_unary(parser)?;
        parse_binary_rhs(parser, 0, left)
    })
}

/// Precedence climbing: folds operators binding at least as tightly as
/// `min_precedence` into `left`, recursing only when the following operator
/// binds tighter than the one just consumed. Equal precedence associates left.
fn parse_binary_rhs(
    parser: &mut Parser,
    min_precedence: u8,
    mut left: NodeId,
) -> Result<NodeId, ParseError> {
    loop {
        let Some(operator) = binary_operator(&parser.peek().kind) else {
            return Ok(left);
        };
        let precedence = operator.precedence();
        if precedence < min_precedence {
            return Ok(left);
        }
        parser.next_token();

        let mut right = parse_unary(parser)?;
        if let Some(next) = binary_operator(&parser.peek().kind) {
            if precedence < next.precedence() {
                right = parse_binary_rhs(parser, precedence + 1, right)?;
            }
        }

        left = parser.push(Node::Binary {
            operator,
            left,
            right,
        });
    }
}

fn parse_unary(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let operator = match parser.peek().kind {
        TokenKind::Bang => UnaryOperator::Not,
        TokenKind::Minus => UnaryOperator::Negate,
        _ => return parse_primary(parser),
    };
    parser.next_token();

    let operand = ensure_sufficient_stack(|| parse_unary(parser))?;
    Ok(parser.push(Node::Unary { operator, operand }))
}

fn parse_primary(parser: &mut Parser) -> Result<NodeId, ParseError> {
    match parser.peek().kind {
        TokenKind::Function => return parse_function_literal(parser),
        TokenKind::Outn => return parse_builtin_call(parser, Builtin::Outn),
        TokenKind::If => return parse_if_chain(parser),
        TokenKind::While => return parse_while(parser),
        _ => {}
    }

    let token = parser.next_token();
    match token.kind {
        TokenKind::Int(value) => Ok(parser.push(Node::IntegerLiteral(value))),
        TokenKind::Boolean(text) => Ok(parser.push(Node::BooleanLiteral(&*text == "true"))),
        TokenKind::Ident(name) => {
            let identifier = parser.push(Node::Identifier(name));
            parse_calls(parser, identifier)
        }
        TokenKind::LParen => parse_grouped_expression(parser),
        _ => Err(ParseError::unexpected_other(Expected::Expression, token)),
    }
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let expression = parse_expression(parser)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

/// Elements separated by `separator` up to and including `terminator`. The
/// opening token must already be consumed.
fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    separator: TokenKind,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();
    if parser.eat(&terminator) {
        return Ok(elements);
    }

    loop {
        elements.push(parse_element(parser)?);

        let next = parser.next_token();
        if next.kind == separator {
            continue;
        } else if next.kind == terminator {
            return Ok(elements);
        } else {
            return Err(ParseError::unexpected_token(terminator, next));
        }
    }
}

/// Argument lists directly following an identifier: `f(a)(b)`.
fn parse_calls(parser: &mut Parser, mut callee: NodeId) -> Result<NodeId, ParseError> {
    while parser.eat(&TokenKind::LParen) {
        let arguments = parse_sequence(
            parser,
            parse_expression,
            TokenKind::Comma,
            TokenKind::RParen,
        )?;
        callee = parser.push(Node::Call { callee, arguments });
    }

    Ok(callee)
}

fn parse_builtin_call(parser: &mut Parser, builtin: Builtin) -> Result<NodeId, ParseError> {
    parser.next_token();
    parser.expect_token(TokenKind::LParen)?;
    let argument = parse_expression(parser)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(parser.push(Node::BuiltinCall {
        builtin,
        arguments: vec![argument],
    }))
}

pub fn parse_function_literal(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parser.expect_token(TokenKind::Function)?;
    parse_function_tail(parser)
}

/// Everything after `func` (and the name, for declarations): parameters,
/// `=>`, and the body.
pub fn parse_function_tail(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| parser.parse_ident(),
        TokenKind::Comma,
        TokenKind::RParen,
    )?;
    parser.expect_token(TokenKind::FatArrow)?;

    let body = if parser.check(&TokenKind::LBrace) {
        parse_block(parser)?
    } else {
        parse_expression(parser)?
    };

    Ok(parser.push(Node::FunctionLiteral(FunctionLiteral {
        parameters: parameters.into(),
        body,
    })))
}

fn parse_branch(parser: &mut Parser) -> Result<Branch, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let condition = parse_expression(parser)?;
    parser.expect_token(TokenKind::RParen)?;
    let body = parse_block(parser)?;

    Ok(Branch { condition, body })
}

pub fn parse_if_chain(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parser.expect_token(TokenKind::If)?;

    let mut branches = vec![parse_branch(parser)?];
    while parser.eat(&TokenKind::Elif) {
        branches.push(parse_branch(parser)?);
    }
    let otherwise = if parser.eat(&TokenKind::Else) {
        Some(parse_block(parser)?)
    } else {
        None
    };

    Ok(parser.push(Node::If {
        branches,
        otherwise,
    }))
}

pub fn parse_while(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parser.expect_token(TokenKind::While)?;
    parser.expect_token(TokenKind::LParen)?;
    let condition = parse_expression(parser)?;
    parser.expect_token(TokenKind::RParen)?;
    let body = parse_block(parser)?;

    Ok(parser.push(Node::While { condition, body }))
}
