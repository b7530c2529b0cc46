//! Format constants

/// Magic bytes identifying an npy file
pub const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Major version produced by the writer
pub const WRITE_VERSION: (u8, u8) = (1, 0);

/// Prelude size (magic + version + 2-byte length) for version 1
pub const PRELUDE_SIZE_V1: usize = 10;

/// Prelude size (magic + version + 4-byte length) for version 2
pub const PRELUDE_SIZE_V2: usize = 12;

/// Payload offsets must be a multiple of this
pub const ALIGNMENT: usize = 16;

/// Default limit on shape dimensionality
pub const DEFAULT_MAX_DIM: usize = 32;

/// Smallest buffer the header encoder will write into
pub const MIN_HEADER_CAPACITY: usize = 64;

/// Largest prelude + header a version 1 file can carry
pub const MAX_HEADER_CAPACITY_V1: usize = PRELUDE_SIZE_V1 + u16::MAX as usize;

/// Prelude size for a given major version, if supported
pub fn prelude_size(major: u8) -> Option<usize> {
    match major {
        1 => Some(PRELUDE_SIZE_V1),
        2 => Some(PRELUDE_SIZE_V2),
        _ => None,
    }
}
