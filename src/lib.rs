//! npyframe - Reader and writer for the `.npy` array container
//!
//! An `.npy` file is a 10 or 12 byte prelude (magic, version, header length),
//! an ASCII header holding a restricted Python dictionary literal, and the raw
//! element bytes. This crate reads and writes the numeric subset of the
//! format: signed, unsigned and floating elements of 1, 2, 4 or 8 bytes.
//!
//! # Features
//!
//! - Zero-copy loading from memory-mapped files, with buffered reads as the
//!   fallback for sources that cannot be mapped
//! - Two-phase loading: inspect the header before touching the payload
//! - Byte order normalization to the host on load
//! - 16-byte aligned headers on save
//!
//! # Example
//!
//! ```rust
//! use npyframe::{NpyArray, load_from_slice, writer};
//!
//! let array = NpyArray::from_vec(vec![2, 3], vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! let bytes = writer::to_bytes(&array).unwrap();
//!
//! let loaded = load_from_slice(&bytes).unwrap();
//! assert_eq!(loaded.shape, vec![2, 3]);
//! assert_eq!(loaded.to_vec::<f32>().unwrap()[4], 5.0);
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod parser;
pub mod swap;
pub mod transport;
pub mod types;
pub mod writer;

#[cfg(feature = "ndarray")]
pub mod ndarray_ext;

// Re-export common types at crate root
pub use config::LoadOptions;
pub use error::{AccessError, NpyError, Result};
pub use loader::{Loader, load, load_from_slice, load_from_slice_with, load_path, load_with};
pub use transport::{ByteSink, ByteSource, StreamSource};
pub use types::{
    ByteOrder, DType, Element, ElementKind, Header, MAGIC, NpyArray, Ownership, Payload, Version,
};
pub use writer::save_path;

#[cfg(feature = "ndarray")]
pub use ndarray_ext::NdarrayError;
