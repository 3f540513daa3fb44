use thiserror::Error;

use crate::token::{keywords, Position, Token, TokenKind};

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("unexpected character '{character}' at {position}")]
    UnexpectedCharacter { character: char, position: Position },
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    line_start: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            line: 1,
            line_start: 0,
            failed: false,
        }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn position_at(&self, offset: usize) -> Position {
        Position {
            line: self.line,
            column: offset - self.line_start + 1,
        }
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.next_idx(),
            position: self.position_at(start),
        }
    }

    /// The end-of-stream marker, positioned after the last consumed byte.
    pub fn eof(&self) -> Token {
        let end = self.input.len();
        Token {
            kind: TokenKind::Eof,
            start: end,
            end,
            position: self.position_at(end),
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.iter.peek() {
                Some(&(idx, '\n')) => {
                    self.iter.next();
                    self.line += 1;
                    self.line_start = idx + 1;
                }
                Some(&(_, ' ' | '\t' | '\r')) => {
                    self.iter.next();
                }
                Some(&(idx, '/')) if self.input[idx + 1..].starts_with('/') => {
                    while self.iter.next_if(|(_, ch)| *ch != '\n').is_some() {}
                }
                _ => return,
            }
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_letter(*ch) || ch.is_ascii_digit())
            .is_some()
        {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        let kind = keywords(ident).unwrap_or_else(|| TokenKind::Ident(ident.into()));
        self.token(kind, start)
    }

    /// The first digit at `start` has already been consumed.
    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let end = self.next_idx();
        let value = self.input[start..end].bytes().fold(0i64, |value, digit| {
            value.wrapping_mul(10).wrapping_add(i64::from(digit - b'0'))
        });

        self.token(TokenKind::Int(value), start)
    }

    /// Picks `matched` when the next character is `next`, consuming it.
    fn either(&mut self, next: char, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.iter.next_if(|(_, ch)| *ch == next).is_some() {
            matched
        } else {
            otherwise
        }
    }

    fn unexpected(&mut self, character: char, idx: usize) -> LexError {
        self.failed = true;
        LexError::UnexpectedCharacter {
            character,
            position: self.position_at(idx),
        }
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_trivia();

        let (idx, ch) = self.iter.next()?;
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::SemiColon,
            ',' => TokenKind::Comma,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    TokenKind::Equal
                } else {
                    self.either('>', TokenKind::FatArrow, TokenKind::Assign)
                }
            }
            '!' => self.either('=', TokenKind::NotEqual, TokenKind::Bang),
            '<' => self.either('=', TokenKind::LessEqual, TokenKind::LessThan),
            '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::GreaterThan),
            '&' | '|' => {
                if self.iter.next_if(|(_, next)| *next == ch).is_none() {
                    return Some(Err(self.unexpected(ch, idx)));
                }
                if ch == '&' {
                    TokenKind::And
                } else {
                    TokenKind::Or
                }
            }
            c if Tokenizer::is_letter(c) => return Some(Ok(self.read_identifier(idx))),
            c if c.is_ascii_digit() => return Some(Ok(self.read_number(idx))),
            _ => return Some(Err(self.unexpected(ch, idx))),
        };
        Some(Ok(self.token(kind, idx)))
    }
}

/// Scans the whole input. The result always ends with exactly one
/// [`TokenKind::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();

    for token in tokenizer.by_ref() {
        let token = token?;
        tracing::trace!(kind = ?token.kind, start = token.start, end = token.end, "token");
        tokens.push(token);
    }
    tokens.push(tokenizer.eof());

    Ok(tokens)
}
