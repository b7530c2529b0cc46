//! Tokenizer for the header dictionary literal

use super::cursor::{ByteCursor, Parser};
use crate::error::{NpyError, Result};

/// A header token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Colon,
    Comma,
    /// Quoted string, quotes stripped. No escape sequences.
    Str(&'a str),
    /// Unsigned decimal integer
    Int(u64),
    /// Bare word such as `True`
    Ident(&'a str),
    End,
}

impl Token<'_> {
    pub fn describe(&self) -> String {
        match self {
            Token::LBrace => "'{'".into(),
            Token::RBrace => "'}'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Colon => "':'".into(),
            Token::Comma => "','".into(),
            Token::Str(s) => format!("string {:?}", s),
            Token::Int(n) => format!("integer {}", n),
            Token::Ident(s) => format!("identifier {}", s),
            Token::End => "end of header".into(),
        }
    }
}

/// A token and the offset where it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub token: Token<'a>,
    pub position: usize,
}

/// Skip whitespace and read one token
pub fn token() -> Lexer {
    Lexer
}

pub struct Lexer;

impl<'a> Parser<'a> for Lexer {
    type Output = Lexeme<'a>;

    fn parse(&self, cursor: ByteCursor<'a>) -> Result<(Self::Output, ByteCursor<'a>)> {
        let cursor = cursor.skip_ws();
        let position = cursor.position();
        let lexeme = |token| Lexeme { token, position };

        let Some(b) = cursor.peek() else {
            return Ok((lexeme(Token::End), cursor));
        };

        let punct = match b {
            b'{' => Some(Token::LBrace),
            b'}' => Some(Token::RBrace),
            b'(' => Some(Token::LParen),
            b')' => Some(Token::RParen),
            b':' => Some(Token::Colon),
            b',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(t) = punct {
            return Ok((lexeme(t), cursor.advance(1)));
        }

        match b {
            b'\'' | b'"' => {
                let (s, cursor) = quoted_string(cursor)?;
                Ok((lexeme(Token::Str(s)), cursor))
            }
            b'0'..=b'9' => {
                let (digits, cursor) = cursor.take_while(|b| b.is_ascii_digit());
                let value = digits
                    .iter()
                    .try_fold(0u64, |acc, &d| {
                        acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
                    })
                    .ok_or_else(|| NpyError::syntax("Integer literal out of range", position))?;
                Ok((lexeme(Token::Int(value)), cursor))
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let (word, cursor) =
                    cursor.take_while(|b| b.is_ascii_alphanumeric() || b == b'_');
                // ASCII by construction
                let word = std::str::from_utf8(word)
                    .map_err(|_| NpyError::syntax("Invalid identifier", position))?;
                Ok((lexeme(Token::Ident(word)), cursor))
            }
            other => Err(NpyError::syntax(
                format!("Unexpected character {:?}", other as char),
                position,
            )),
        }
    }
}

/// Read a single- or double-quoted string; the opening quote closes it
fn quoted_string(cursor: ByteCursor<'_>) -> Result<(&str, ByteCursor<'_>)> {
    let start = cursor.position();
    let quote = cursor.peek().unwrap_or(b'\'');
    let (body, cursor) = cursor.advance(1).take_while(|b| b != quote);
    if cursor.eos() {
        return Err(NpyError::syntax("Unterminated string literal", start));
    }
    let s = std::str::from_utf8(body)
        .map_err(|_| NpyError::syntax("Invalid UTF-8 in string literal", start + 1))?;
    Ok((s, cursor.advance(1)))
}
