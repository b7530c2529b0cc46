//! Loading: prelude and header first, payload second

use crate::config::LoadOptions;
use crate::error::{NpyError, Result};
use crate::parser::Prelude;
use crate::swap::swap_bytes;
use crate::transport::{ByteSource, SliceTransport, SourceTransport, Transport};
use crate::types::{ByteOrder, Header, NpyArray, Version};
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;
use tracing::debug;

/// A file whose header has been parsed but whose payload is not yet loaded
pub struct Loader<'a, T: Transport<'a>> {
    transport: T,
    options: LoadOptions,
    prelude: Prelude,
    header: Header,
    _payload: PhantomData<&'a [u8]>,
}

impl<S: ByteSource> Loader<'static, SourceTransport<S>> {
    /// Probe `source` for mapping support and parse its header
    pub fn open(source: S, options: LoadOptions) -> Result<Self> {
        let transport = SourceTransport::select(source, &options);
        Self::new(transport, options)
    }
}

impl<'a> Loader<'a, SliceTransport<'a>> {
    /// Parse the header of an in-memory file
    pub fn from_slice(bytes: &'a [u8], options: LoadOptions) -> Result<Self> {
        Self::new(SliceTransport::new(bytes), options)
    }
}

impl<'a, T: Transport<'a>> Loader<'a, T> {
    /// Parse the header through an explicit transport
    pub fn new(mut transport: T, options: LoadOptions) -> Result<Self> {
        let (prelude, header) = transport.read_header(&options)?;
        debug!(
            transport = transport.name(),
            version = prelude.version.major,
            dtype = %header.dtype,
            shape = ?header.shape,
            "parsed npy header"
        );
        Ok(Self {
            transport,
            options,
            prelude,
            header,
            _payload: PhantomData,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn version(&self) -> Version {
        self.prelude.version
    }

    /// Length of the header text, padding and newline included
    pub fn header_len(&self) -> usize {
        self.prelude.header_len
    }

    pub fn payload_offset(&self) -> usize {
        self.prelude.payload_offset()
    }

    /// Name of the transport in use
    pub fn strategy(&self) -> &'static str {
        self.transport.name()
    }

    /// Acquire the payload and normalize its byte order
    pub fn finish(self) -> Result<NpyArray<'a>> {
        let len = self.header.payload_len()?;
        let payload = self.transport.acquire_payload(&self.prelude, len)?;
        let mut array = NpyArray::from_header(
            self.prelude.version,
            self.prelude.header_len,
            self.header,
            payload,
        );

        if self.options.normalize_byte_order && array.dtype.needs_swap() {
            normalize(&mut array)?;
        }
        Ok(array)
    }
}

/// Swap a payload into host byte order and retag the dtype
fn normalize(array: &mut NpyArray<'_>) -> Result<()> {
    let dtype = array.dtype;
    let count = array.data().len() / dtype.element_size().max(1);
    debug!(from = %dtype, count, "swapping payload to host byte order");
    swap_bytes(count, dtype.bit_width, array.payload_mut().make_mut())?;
    array.dtype = dtype.with_byte_order(ByteOrder::host());
    Ok(())
}

/// Load an array from a source with default options
pub fn load<S: ByteSource>(source: S) -> Result<NpyArray<'static>> {
    load_with(source, &LoadOptions::default())
}

/// Load an array from a source
pub fn load_with<S: ByteSource>(source: S, options: &LoadOptions) -> Result<NpyArray<'static>> {
    Loader::open(source, options.clone())?.finish()
}

/// Load an array from memory; the payload borrows from `bytes`
pub fn load_from_slice(bytes: &[u8]) -> Result<NpyArray<'_>> {
    load_from_slice_with(bytes, &LoadOptions::default())
}

/// Load an array from memory with options
pub fn load_from_slice_with<'a>(bytes: &'a [u8], options: &LoadOptions) -> Result<NpyArray<'a>> {
    Loader::from_slice(bytes, options.clone())?.finish()
}

/// Open a file and load it
pub fn load_path(path: impl AsRef<Path>) -> Result<NpyArray<'static>> {
    let file = File::open(path).map_err(NpyError::Io)?;
    load(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::StreamSource;
    use crate::types::{ElementKind, MAGIC, Ownership};
    use std::io::Cursor;

    fn npy(dict: &str, payload: &[u8]) -> Vec<u8> {
        let mut text = dict.to_string();
        while (10 + text.len() + 1) % 16 != 0 {
            text.push(' ');
        }
        text.push('\n');
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(text.len() as u16).to_le_bytes());
        bytes.extend_from_slice(text.as_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_two_phase_load() {
        let bytes = npy("{'descr': '<i2', 'shape': (3,)}", &[1, 0, 2, 0, 3, 0]);
        let loader = Loader::open(Cursor::new(bytes), LoadOptions::default()).unwrap();
        assert_eq!(loader.strategy(), "buffered");
        assert_eq!(loader.header().shape, vec![3]);
        assert_eq!(loader.header().dtype.kind, ElementKind::SignedInt);
        assert_eq!(loader.version(), Version { major: 1, minor: 0 });
        assert_eq!(loader.payload_offset() % 16, 0);
        assert_eq!(loader.header_len() + 10, loader.payload_offset());

        let array = loader.finish().unwrap();
        assert_eq!(array.to_vec::<i16>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_big_endian_is_normalized() {
        let payload: Vec<u8> = [1.5f64, -3.0].iter().flat_map(|v| v.to_be_bytes()).collect();
        let bytes = npy("{'descr': '>f8', 'shape': (2,)}", &payload);

        let array = load(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(array.dtype.byte_order, ByteOrder::host());
        assert_eq!(array.to_vec::<f64>().unwrap(), vec![1.5, -3.0]);

        let raw = load_with(
            Cursor::new(bytes),
            &LoadOptions::default().with_normalize_byte_order(false),
        )
        .unwrap();
        assert_eq!(raw.dtype.byte_order, ByteOrder::Big);
        assert_eq!(raw.data(), payload.as_slice());
        assert_eq!(raw.to_vec::<f64>().unwrap(), vec![1.5, -3.0]);
    }

    #[test]
    fn test_slice_load_promotes_on_swap() {
        let foreign = if ByteOrder::host().is_little() { ">" } else { "<" };
        let payload = [0u8, 1, 0, 2];
        let bytes = npy(&format!("{{'descr': '{foreign}u2', 'shape': (2,)}}"), &payload);

        let array = load_from_slice(&bytes).unwrap();
        assert_eq!(array.ownership(), Ownership::Owned);
        assert_eq!(array.as_slice::<u16>().unwrap(), &[1, 2]);
        // Input left untouched
        assert_eq!(&bytes[bytes.len() - 4..], &payload);
    }

    #[test]
    fn test_slice_load_borrows_native() {
        let native = if ByteOrder::host().is_little() { "<" } else { ">" };
        let bytes = npy(&format!("{{'descr': '{native}u2', 'shape': (2,)}}"), &[7, 7, 7, 7]);
        let array = load_from_slice(&bytes).unwrap();
        assert_eq!(array.ownership(), Ownership::External);
    }

    #[test]
    fn test_failed_load_reports_kind() {
        let bytes = npy("{'descr': '<f4', 'shape': (10, 10)}", &[0u8; 396]);
        assert!(matches!(
            load(Cursor::new(bytes.clone())),
            Err(NpyError::SizeMismatch { expected: 400, actual: 396 })
        ));
        assert!(matches!(
            load_from_slice(&bytes),
            Err(NpyError::SizeMismatch { expected: 400, actual: 396 })
        ));
        assert!(matches!(
            load(StreamSource::new(&bytes[..])),
            Err(NpyError::Truncated { expected: 400, actual: 396 })
        ));
    }

    #[test]
    fn test_max_dim_option() {
        let bytes = npy("{'descr': '<u1', 'shape': (1, 1, 1)}", &[5]);
        let options = LoadOptions::default().with_max_dim(2);
        assert!(matches!(
            load_from_slice_with(&bytes, &options),
            Err(NpyError::TooManyDimensions { limit: 2 })
        ));
        assert_eq!(load_from_slice(&bytes).unwrap().dim(), 3);
    }
}
