//! Serialization of npy arrays

mod header;
mod prelude;

pub use header::{encode_header, encode_header_into, serialize_dict, serialize_shape};
pub use prelude::serialize_prelude;

use crate::error::{NpyError, Result};
use crate::transport::ByteSink;
use crate::types::NpyArray;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// One write call; anything short of the full buffer is fatal
fn write_once<K: ByteSink + ?Sized>(sink: &mut K, bytes: &[u8]) -> Result<()> {
    let written = sink.write_bytes(bytes)?;
    if written != bytes.len() {
        return Err(NpyError::Io(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {} of {} bytes", written, bytes.len()),
        )));
    }
    Ok(())
}

/// Write header then payload to a sink
pub fn write<K: ByteSink + ?Sized>(sink: &mut K, array: &NpyArray<'_>) -> Result<()> {
    let expected = array.expected_size()?;
    let data = array.data();
    if data.len() != expected {
        return Err(NpyError::SizeMismatch {
            expected: expected as u64,
            actual: data.len() as u64,
        });
    }

    let header = encode_header(array)?;
    debug!(
        dtype = %array.dtype,
        shape = ?array.shape,
        header_len = header.len(),
        payload_len = data.len(),
        "writing npy array"
    );
    write_once(sink, &header)?;
    if !data.is_empty() {
        write_once(sink, data)?;
    }
    Ok(())
}

/// Serialize an array to bytes
pub fn to_bytes(array: &NpyArray<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write(&mut buf, array)?;
    Ok(buf)
}

/// Create or truncate a file and write the array to it
pub fn save_path(path: impl AsRef<Path>, array: &NpyArray<'_>) -> Result<()> {
    let mut file = File::create(path)?;
    write(&mut file, array)
}
