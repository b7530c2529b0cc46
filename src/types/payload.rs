//! Payload storage with an explicit ownership tag

use memmap2::MmapMut;
use tracing::trace;

/// Who owns the payload bytes, and therefore how they are released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Aliases a private mapping of the backing store; released by unmapping
    Mapped,
    /// Heap buffer owned by the array; released by freeing
    Owned,
    /// Caller's memory; never released by the codec
    External,
    /// Already released
    Empty,
}

/// A private copy-on-write mapping plus the payload window inside it
pub struct MappedRegion {
    map: MmapMut,
    offset: usize,
    len: usize,
}

impl MappedRegion {
    /// Caller guarantees `offset + len <= map.len()`
    pub(crate) fn new(map: MmapMut, offset: usize, len: usize) -> Self {
        debug_assert!(offset + len <= map.len());
        Self { map, offset, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.map[self.offset..self.offset + self.len]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.map[self.offset..self.offset + self.len]
    }

    /// Size of the whole mapping, header included
    pub fn mapped_len(&self) -> usize {
        self.map.len()
    }
}

/// Payload bytes of an array
pub enum Payload<'a> {
    Mapped(MappedRegion),
    Owned(Vec<u8>),
    External(&'a [u8]),
    Empty,
}

impl std::fmt::Debug for Payload<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Mapped(m) => f
                .debug_struct("Mapped")
                .field("offset", &m.offset)
                .field("len", &m.len)
                .finish(),
            Payload::Owned(b) => f.debug_tuple("Owned").field(&b.len()).finish(),
            Payload::External(b) => f.debug_tuple("External").field(&b.len()).finish(),
            Payload::Empty => f.write_str("Empty"),
        }
    }
}

impl<'a> Payload<'a> {
    pub fn ownership(&self) -> Ownership {
        match self {
            Payload::Mapped(_) => Ownership::Mapped,
            Payload::Owned(_) => Ownership::Owned,
            Payload::External(_) => Ownership::External,
            Payload::Empty => Ownership::Empty,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Mapped(m) => m.as_bytes(),
            Payload::Owned(b) => b,
            Payload::External(b) => b,
            Payload::Empty => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable access to the bytes.
    ///
    /// External payloads are read-only, so they are copied into an owned
    /// buffer first.
    pub fn make_mut(&mut self) -> &mut [u8] {
        if let Payload::External(b) = *self {
            *self = Payload::Owned(b.to_vec());
        }
        match self {
            Payload::Mapped(m) => m.as_bytes_mut(),
            Payload::Owned(b) => b,
            Payload::External(_) | Payload::Empty => &mut [],
        }
    }

    /// Release the payload according to its ownership. Safe to call repeatedly.
    pub fn release(&mut self) {
        match std::mem::replace(self, Payload::Empty) {
            Payload::Mapped(m) => {
                trace!(len = m.mapped_len(), "unmapping payload");
                drop(m);
            }
            Payload::Owned(b) => {
                trace!(len = b.len(), "freeing payload");
                drop(b);
            }
            Payload::External(_) | Payload::Empty => {}
        }
    }

    /// Detach from any borrowed memory
    pub fn into_owned(self) -> Payload<'static> {
        match self {
            Payload::Mapped(m) => Payload::Mapped(m),
            Payload::Owned(b) => Payload::Owned(b),
            Payload::External(b) => Payload::Owned(b.to_vec()),
            Payload::Empty => Payload::Empty,
        }
    }
}
