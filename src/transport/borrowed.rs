//! Transport over a buffer the caller already holds in memory

use super::{Transport, check_alignment};
use crate::config::LoadOptions;
use crate::error::{NpyError, Result};
use crate::parser::{Prelude, parse_header};
use crate::types::{Header, Payload};

/// Payload borrows from the caller's buffer; nothing is copied
pub struct SliceTransport<'a> {
    bytes: &'a [u8],
}

impl<'a> SliceTransport<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl<'a> Transport<'a> for SliceTransport<'a> {
    fn name(&self) -> &'static str {
        "borrowed"
    }

    fn read_header(&mut self, options: &LoadOptions) -> Result<(Prelude, Header)> {
        parse_header(self.bytes, options)
    }

    fn acquire_payload(self, prelude: &Prelude, len: usize) -> Result<Payload<'a>> {
        check_alignment(prelude)?;

        let offset = prelude.payload_offset();
        let remaining = self.bytes.len().saturating_sub(offset);
        if offset > self.bytes.len() || remaining != len {
            return Err(NpyError::SizeMismatch {
                expected: len as u64,
                actual: remaining as u64,
            });
        }
        Ok(Payload::External(&self.bytes[offset..]))
    }
}
