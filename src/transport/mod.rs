//! Payload transport: how the bytes of a file reach memory
//!
//! A [`ByteSource`] is probed for mapping support. Mappable sources use the
//! [`MappedTransport`]; anything else is read sequentially by the
//! [`BufferedTransport`]. In-memory buffers the caller already holds go
//! through the [`SliceTransport`] without copying.

mod borrowed;
mod buffered;
mod mapped;
mod source;

pub use borrowed::SliceTransport;
pub use buffered::BufferedTransport;
pub use mapped::MappedTransport;
pub use source::{ByteSink, ByteSource, StreamSource};

use crate::config::LoadOptions;
use crate::error::{NpyError, Result};
use crate::parser::Prelude;
use crate::types::{ALIGNMENT, Header, Payload};
use tracing::debug;

/// One way of getting the header and payload out of a source
pub trait Transport<'a> {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Read and parse the prelude and header
    fn read_header(&mut self, options: &LoadOptions) -> Result<(Prelude, Header)>;

    /// Obtain exactly `len` payload bytes following the header
    fn acquire_payload(self, prelude: &Prelude, len: usize) -> Result<Payload<'a>>;
}

/// Payload must start on an `ALIGNMENT` boundary
pub(crate) fn check_alignment(prelude: &Prelude) -> Result<()> {
    let offset = prelude.payload_offset();
    if offset % ALIGNMENT != 0 {
        return Err(NpyError::Alignment {
            offset,
            alignment: ALIGNMENT,
        });
    }
    Ok(())
}

/// Mapped or buffered transport chosen by probing a source
pub enum SourceTransport<S> {
    Mapped(MappedTransport),
    Buffered(BufferedTransport<S>),
}

impl<S: ByteSource> SourceTransport<S> {
    /// Prefer a private mapping when the source offers one
    pub fn select(mut source: S, options: &LoadOptions) -> Self {
        if options.allow_mmap {
            if let Some(map) = source.map_if_possible() {
                debug!(len = map.len(), "using mapped transport");
                return SourceTransport::Mapped(MappedTransport::new(map));
            }
        }
        debug!("using buffered transport");
        SourceTransport::Buffered(BufferedTransport::new(source))
    }
}

impl<S: ByteSource> Transport<'static> for SourceTransport<S> {
    fn name(&self) -> &'static str {
        match self {
            SourceTransport::Mapped(t) => t.name(),
            SourceTransport::Buffered(t) => t.name(),
        }
    }

    fn read_header(&mut self, options: &LoadOptions) -> Result<(Prelude, Header)> {
        match self {
            SourceTransport::Mapped(t) => t.read_header(options),
            SourceTransport::Buffered(t) => t.read_header(options),
        }
    }

    fn acquire_payload(self, prelude: &Prelude, len: usize) -> Result<Payload<'static>> {
        match self {
            SourceTransport::Mapped(t) => t.acquire_payload(prelude, len),
            SourceTransport::Buffered(t) => t.acquire_payload(prelude, len),
        }
    }
}
