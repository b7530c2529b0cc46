//! Shape tuple parsing: `(2, 3)`, `(5,)`, `()`

use super::cursor::{ByteCursor, Parser};
use super::token::{Token, token};
use crate::error::{NpyError, Result};

/// Parse a parenthesized tuple of unsigned integers
pub fn parse_shape(max_dim: usize) -> ShapeParser {
    ShapeParser { max_dim }
}

pub struct ShapeParser {
    max_dim: usize,
}

impl<'a> Parser<'a> for ShapeParser {
    type Output = Vec<u64>;

    fn parse(&self, cursor: ByteCursor<'a>) -> Result<(Self::Output, ByteCursor<'a>)> {
        let (open, mut cursor) = token().parse(cursor)?;
        if open.token != Token::LParen {
            return Err(NpyError::syntax(
                format!("Expected '(' to open shape, found {}", open.token.describe()),
                open.position,
            ));
        }

        let mut shape = Vec::new();
        loop {
            // An item or the closing paren (empty tuple or trailing comma)
            let (item, next) = token().parse(cursor)?;
            cursor = next;
            match item.token {
                Token::RParen => return Ok((shape, cursor)),
                Token::Int(n) => {
                    if shape.len() == self.max_dim {
                        return Err(NpyError::TooManyDimensions {
                            limit: self.max_dim,
                        });
                    }
                    shape.push(n);
                }
                other => {
                    return Err(NpyError::syntax(
                        format!("Expected dimension in shape, found {}", other.describe()),
                        item.position,
                    ));
                }
            }

            let (sep, next) = token().parse(cursor)?;
            cursor = next;
            match sep.token {
                Token::Comma => {}
                Token::RParen => return Ok((shape, cursor)),
                other => {
                    return Err(NpyError::syntax(
                        format!("Expected ',' or ')' in shape, found {}", other.describe()),
                        sep.position,
                    ));
                }
            }
        }
    }
}
