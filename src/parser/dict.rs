//! Header dictionary parsing
//!
//! Accepts the restricted literal `{'descr': '<f4', 'fortran_order': False,
//! 'shape': (2, 3), }`: quoted keys limited to `descr`, `fortran_order` and
//! `shape`, comma separated, with an optional trailing comma.

use super::cursor::{ByteCursor, Parser};
use super::shape::parse_shape;
use super::token::{Lexeme, Token, token};
use crate::error::{NpyError, Result};
use crate::types::{DType, Header};

/// Parse the header dictionary into its decoded fields
pub fn parse_dict(max_dim: usize, reject_duplicate_keys: bool) -> DictParser {
    DictParser {
        max_dim,
        reject_duplicate_keys,
    }
}

pub struct DictParser {
    max_dim: usize,
    reject_duplicate_keys: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Descr,
    Shape,
    FortranOrder,
}

impl Key {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "descr" => Some(Key::Descr),
            "shape" => Some(Key::Shape),
            "fortran_order" => Some(Key::FortranOrder),
            _ => None,
        }
    }
}

fn unexpected(what: &str, lexeme: Lexeme<'_>) -> NpyError {
    NpyError::syntax(
        format!("Expected {}, found {}", what, lexeme.token.describe()),
        lexeme.position,
    )
}

impl<'a> Parser<'a> for DictParser {
    type Output = Header;

    fn parse(&self, cursor: ByteCursor<'a>) -> Result<(Self::Output, ByteCursor<'a>)> {
        let (open, mut cursor) = token().parse(cursor)?;
        if open.token != Token::LBrace {
            return Err(unexpected("'{' to open header", open));
        }

        let mut descr: Option<&'a str> = None;
        let mut shape: Vec<u64> = Vec::new();
        let mut fortran_order = false;
        let mut seen: Vec<Key> = Vec::with_capacity(3);

        loop {
            let (lexeme, next) = token().parse(cursor)?;
            cursor = next;
            let key = match lexeme.token {
                Token::RBrace => break,
                Token::Str(name) => Key::from_name(name).ok_or_else(|| {
                    NpyError::syntax(format!("Unknown header key {:?}", name), lexeme.position)
                })?,
                _ => return Err(unexpected("quoted key or '}'", lexeme)),
            };
            if seen.contains(&key) && self.reject_duplicate_keys {
                return Err(NpyError::syntax(
                    format!("Duplicate header key {:?}", key),
                    lexeme.position,
                ));
            }
            seen.push(key);

            let (colon, next) = token().parse(cursor)?;
            cursor = next;
            if colon.token != Token::Colon {
                return Err(unexpected("':' after key", colon));
            }

            match key {
                Key::Descr => {
                    let (value, next) = token().parse(cursor)?;
                    cursor = next;
                    match value.token {
                        Token::Str(s) => descr = Some(s),
                        _ => return Err(unexpected("quoted descr string", value)),
                    }
                }
                Key::Shape => {
                    let (value, next) = parse_shape(self.max_dim).parse(cursor)?;
                    cursor = next;
                    shape = value;
                }
                Key::FortranOrder => {
                    let (value, next) = token().parse(cursor)?;
                    cursor = next;
                    fortran_order = match value.token {
                        Token::Ident("True") => true,
                        Token::Ident("False") => false,
                        _ => return Err(unexpected("True or False", value)),
                    };
                }
            }

            let (sep, next) = token().parse(cursor)?;
            cursor = next;
            match sep.token {
                Token::Comma => {}
                Token::RBrace => break,
                _ => return Err(unexpected("',' or '}'", sep)),
            }
        }

        let descr =
            descr.ok_or_else(|| NpyError::syntax("Missing 'descr' key", cursor.position()))?;
        let dtype = DType::from_descr(descr)?;

        Ok((
            Header {
                dtype,
                shape,
                fortran_order,
            },
            cursor,
        ))
    }
}
