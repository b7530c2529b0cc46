//! Error types for npyframe

use crate::types::DType;
use std::borrow::Cow;
use std::io;
use thiserror::Error;

/// Result alias used throughout the codec
pub type Result<T> = std::result::Result<T, NpyError>;

/// Error raised while decoding or encoding an npy container
#[derive(Debug, Error)]
pub enum NpyError {
    /// Magic bytes missing or wrong
    #[error("Invalid magic bytes, not an npy file")]
    InvalidMagic,
    /// Major version other than 1 or 2
    #[error("Unsupported npy version: {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },
    /// Malformed header dictionary, tuple or string literal
    #[error("{message} at position {position}")]
    Syntax {
        message: Cow<'static, str>,
        position: usize,
    },
    /// Descriptor string outside the supported `[<>][iuf][1248]` set
    #[error("Unsupported dtype descriptor: {0:?}")]
    UnsupportedDtype(String),
    /// Payload offset is not a multiple of the format alignment
    #[error("Payload offset {offset} is not aligned to {alignment} bytes")]
    Alignment { offset: usize, alignment: usize },
    /// Backing store or payload size differs from what the header declares
    #[error("Data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
    /// Source ended before the declared number of bytes was read
    #[error("Truncated input: expected {expected} bytes, got {actual}")]
    Truncated { expected: u64, actual: u64 },
    /// Destination buffer too small for the serialized header
    #[error("Header needs {required} bytes but only {capacity} are available")]
    CapacityExceeded { required: usize, capacity: usize },
    /// Underlying read or write failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Payload allocation failed; `None` when the size overflows the address space
    #[error("Out of memory allocating payload ({})", fmt_requested(.requested))]
    OutOfMemory { requested: Option<usize> },
    /// Element width outside 8/16/32/64 bits
    #[error("Unsupported element width: {0} bits")]
    UnsupportedWidth(u32),
    /// Declared header length exceeds the configured limit
    #[error("Header length {len} exceeds limit of {limit} bytes")]
    HeaderTooLarge { len: usize, limit: usize },
    /// Shape has more dimensions than allowed
    #[error("Shape has more than {limit} dimensions")]
    TooManyDimensions { limit: usize },
}

fn fmt_requested(requested: &Option<usize>) -> String {
    match requested {
        Some(n) => format!("{} bytes", n),
        None => "size overflows usize".to_string(),
    }
}

impl NpyError {
    pub(crate) fn syntax(message: impl Into<Cow<'static, str>>, position: usize) -> Self {
        NpyError::Syntax {
            message: message.into(),
            position,
        }
    }
}

/// Error for typed access to a payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Requested element type differs from the stored dtype
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: DType, actual: DType },
    /// Payload is not in host byte order
    #[error("payload is stored as {0}, which is not host byte order")]
    ForeignByteOrder(DType),
    /// Payload address is not aligned for the element type
    #[error("payload is not aligned for the element type")]
    Misaligned,
}
