//! Cursor over header bytes and the parser trait built on it

use crate::error::Result;

/// Position within an immutable byte buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn eos(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Current byte, if any
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    /// Cursor advanced by `n` bytes, clamped to the end
    pub fn advance(self, n: usize) -> Self {
        Self {
            data: self.data,
            position: (self.position + n).min(self.data.len()),
        }
    }

    /// Remaining bytes from the current position
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Advance while `pred` holds, returning the consumed span
    pub fn take_while(self, pred: impl Fn(u8) -> bool) -> (&'a [u8], Self) {
        let len = self.rest().iter().take_while(|&&b| pred(b)).count();
        (&self.rest()[..len], self.advance(len))
    }

    /// Skip Python whitespace
    pub fn skip_ws(self) -> Self {
        self.take_while(is_space).1
    }
}

/// Whitespace as understood by the header grammar
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// A parser consumes input from a cursor and yields a value plus the new cursor
pub trait Parser<'a> {
    type Output;

    fn parse(&self, cursor: ByteCursor<'a>) -> Result<(Self::Output, ByteCursor<'a>)>;
}
