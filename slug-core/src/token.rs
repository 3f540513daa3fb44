use std::fmt::Display;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Ident(Rc<str>),
    Int(i64),
    /// Keeps the source text (`true` or `false`).
    Boolean(Rc<str>),

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Percent,

    Equal,
    NotEqual,

    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,

    And,
    Or,

    Comma,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    FatArrow,

    // Keywords
    Let,
    Const,
    If,
    Elif,
    Else,
    While,
    Function,
    Outn,

    Eof,
}

/// 1-based line and column of a byte offset in the source.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub position: Position,
}

pub(crate) fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "let" | "var" => Some(TokenKind::Let),
        "const" => Some(TokenKind::Const),
        "if" => Some(TokenKind::If),
        "elif" => Some(TokenKind::Elif),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "func" => Some(TokenKind::Function),
        "true" | "false" => Some(TokenKind::Boolean(ident.into())),
        "outn" => Some(TokenKind::Outn),
        _ => None,
    }
}

impl TokenKind {
    fn to_str(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Ident(_) | Int(_) | Boolean(_) | Eof => "",
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Percent => "%",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            GreaterEqual => ">=",
            LessThan => "<",
            LessEqual => "<=",
            And => "&&",
            Or => "||",
            Comma => ",",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            FatArrow => "=>",
            Let => "let",
            Const => "const",
            If => "if",
            Elif => "elif",
            Else => "else",
            While => "while",
            Function => "func",
            Outn => "outn",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Int(value) => write!(f, "number {}", value),
            TokenKind::Boolean(text) => write!(f, "boolean '{}'", text),
            TokenKind::Eof => write!(f, "end of input"),
            other => write!(f, "'{}'", other.to_str()),
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.position)
    }
}
