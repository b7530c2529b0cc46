//! Core types for the npy container

mod array;
mod dtype;
mod element;
mod header;
mod payload;

pub use array::{Header, NpyArray, Version};
pub use dtype::{ByteOrder, DType, ElementKind};
pub use element::Element;
pub use header::{
    ALIGNMENT, DEFAULT_MAX_DIM, MAGIC, MAX_HEADER_CAPACITY_V1, MIN_HEADER_CAPACITY,
    PRELUDE_SIZE_V1, PRELUDE_SIZE_V2, WRITE_VERSION, prelude_size,
};
pub use payload::{MappedRegion, Ownership, Payload};
