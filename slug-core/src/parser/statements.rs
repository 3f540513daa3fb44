use crate::ast::{Node, NodeId};
use crate::parser::expressions::{
    parse_expression, parse_function_tail, parse_if_chain, parse_while,
};
use crate::parser::{ParseError, Parser};
use crate::stack::ensure_sufficient_stack;
use crate::token::TokenKind;

pub fn parse_statement(parser: &mut Parser) -> Result<NodeId, ParseError> {
    ensure_sufficient_stack(|| {
        let kind = parser.peek().kind.clone();
        match kind {
            TokenKind::Let | TokenKind::Const => parse_declaration(parser),
            TokenKind::Function if matches!(parser.peek_nth(1), TokenKind::Ident(_)) => {
                parse_function_declaration(parser)
            }
            TokenKind::Ident(_) if *parser.peek_nth(1) == TokenKind::Assign => {
                parse_assignment(parser)
            }
            TokenKind::If | TokenKind::While | TokenKind::LBrace => {
                let statement = match kind {
                    TokenKind::If => parse_if_chain(parser)?,
                    TokenKind::While => parse_while(parser)?,
                    _ => parse_block(parser)?,
                };
                parser.eat(&TokenKind::SemiColon);
                Ok(statement)
            }
            _ => parse_expression_statement(parser),
        }
    })
}

pub fn parse_block(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parser.expect_token(TokenKind::LBrace)?;

    let mut statements = Vec::new();
    while !parser.check(&TokenKind::RBrace) && !parser.check(&TokenKind::Eof) {
        statements.push(parse_statement(parser)?);
    }
    parser.expect_token(TokenKind::RBrace)?;

    let inner = parser.sequence(statements);
    Ok(parser.push(Node::Block(inner)))
}

/// `;` ends a simple statement; it may be left out right before a `}` or at
/// the end of input.
fn expect_terminator(parser: &mut Parser) -> Result<(), ParseError> {
    if parser.eat(&TokenKind::SemiColon)
        || parser.check(&TokenKind::RBrace)
        || parser.check(&TokenKind::Eof)
    {
        Ok(())
    } else {
        Err(ParseError::unexpected_token(
            TokenKind::SemiColon,
            parser.next_token(),
        ))
    }
}

fn parse_declaration(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let constant = parser.next_token().kind == TokenKind::Const;
    let name = parser.parse_ident()?;
    parser.expect_token(TokenKind::Assign)?;
    let value = parse_expression(parser)?;
    expect_terminator(parser)?;

    Ok(parser.push(Node::Declaration {
        name,
        value,
        constant,
    }))
}

/// `func name(params) => body` declares `name` like `let` would.
fn parse_function_declaration(parser: &mut Parser) -> Result<NodeId, ParseError> {
    parser.expect_token(TokenKind::Function)?;
    let name = parser.parse_ident()?;
    let value = parse_function_tail(parser)?;
    parser.eat(&TokenKind::SemiColon);

    Ok(parser.push(Node::Declaration {
        name,
        value,
        constant: false,
    }))
}

fn parse_assignment(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let name = parser.parse_ident()?;
    parser.expect_token(TokenKind::Assign)?;
    let value = parse_expression(parser)?;
    expect_terminator(parser)?;

    Ok(parser.push(Node::Assignment { name, value }))
}

fn parse_expression_statement(parser: &mut Parser) -> Result<NodeId, ParseError> {
    let expression = parse_expression(parser)?;
    expect_terminator(parser)?;
    Ok(expression)
}
