//! Zero-copy transport over a private mapping of the whole file

use super::{Transport, check_alignment};
use crate::config::LoadOptions;
use crate::error::{NpyError, Result};
use crate::parser::{Prelude, parse_header};
use crate::types::{Header, MappedRegion, Payload};
use memmap2::MmapMut;
use tracing::trace;

/// Payload aliases the mapping at the header's aligned end
pub struct MappedTransport {
    map: MmapMut,
}

impl MappedTransport {
    pub fn new(map: MmapMut) -> Self {
        Self { map }
    }
}

impl Transport<'static> for MappedTransport {
    fn name(&self) -> &'static str {
        "mapped"
    }

    fn read_header(&mut self, options: &LoadOptions) -> Result<(Prelude, Header)> {
        let (prelude, header) = parse_header(&self.map, options)?;
        trace!(?prelude, ?header, "parsed mapped header");
        Ok((prelude, header))
    }

    fn acquire_payload(self, prelude: &Prelude, len: usize) -> Result<Payload<'static>> {
        check_alignment(prelude)?;

        // The payload must run exactly to the end of the mapping
        let offset = prelude.payload_offset();
        let total = self.map.len();
        let remaining = total.saturating_sub(offset);
        if offset > total || remaining != len {
            return Err(NpyError::SizeMismatch {
                expected: len as u64,
                actual: remaining as u64,
            });
        }

        Ok(Payload::Mapped(MappedRegion::new(self.map, offset, len)))
    }
}
