//! Prelude parsing: magic, version and header length

use crate::error::{NpyError, Result};
use crate::types::{MAGIC, PRELUDE_SIZE_V1, Version, prelude_size};

/// Decoded prelude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prelude {
    pub version: Version,
    /// Length of the header text that follows the prelude
    pub header_len: usize,
    /// Bytes occupied by the prelude itself (10 or 12)
    pub consumed: usize,
}

impl Prelude {
    /// Offset of the payload: prelude plus header
    pub fn payload_offset(&self) -> usize {
        self.consumed + self.header_len
    }
}

/// Check the magic and read the version bytes.
///
/// Needs 8 bytes; returns the version and the total prelude size for it.
pub fn parse_magic_version(bytes: &[u8]) -> Result<(Version, usize)> {
    if bytes.len() < MAGIC.len() || &bytes[..MAGIC.len()] != MAGIC {
        return Err(NpyError::InvalidMagic);
    }
    if bytes.len() < MAGIC.len() + 2 {
        return Err(NpyError::Truncated {
            expected: (MAGIC.len() + 2) as u64,
            actual: bytes.len() as u64,
        });
    }

    let version = Version {
        major: bytes[6],
        minor: bytes[7],
    };
    let size = prelude_size(version.major).ok_or(NpyError::UnsupportedVersion {
        major: version.major,
        minor: version.minor,
    })?;
    Ok((version, size))
}

/// Parse a complete prelude from the start of `bytes`
pub fn parse_prelude(bytes: &[u8]) -> Result<Prelude> {
    let (version, consumed) = parse_magic_version(bytes)?;
    if bytes.len() < consumed {
        return Err(NpyError::Truncated {
            expected: consumed as u64,
            actual: bytes.len() as u64,
        });
    }

    let header_len = if consumed == PRELUDE_SIZE_V1 {
        u16::from_le_bytes([bytes[8], bytes[9]]) as usize
    } else {
        u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize
    };

    Ok(Prelude {
        version,
        header_len,
        consumed,
    })
}
