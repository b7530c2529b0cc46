//! Prelude serialization

use crate::types::{MAGIC, PRELUDE_SIZE_V1, WRITE_VERSION};

/// Magic, version 1.0 and a little-endian u16 header length
pub fn serialize_prelude(header_len: u16) -> [u8; PRELUDE_SIZE_V1] {
    let mut out = [0u8; PRELUDE_SIZE_V1];
    out[..6].copy_from_slice(MAGIC);
    out[6] = WRITE_VERSION.0;
    out[7] = WRITE_VERSION.1;
    out[8..].copy_from_slice(&header_len.to_le_bytes());
    out
}
