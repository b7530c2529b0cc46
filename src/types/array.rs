//! Array descriptor: header fields plus payload

use super::payload::{Ownership, Payload};
use super::{DType, Element, WRITE_VERSION};
use crate::error::{AccessError, NpyError, Result};

/// Format version tags from the prelude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Default for Version {
    fn default() -> Self {
        Self {
            major: WRITE_VERSION.0,
            minor: WRITE_VERSION.1,
        }
    }
}

/// Fields decoded from the header dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub dtype: DType,
    pub shape: Vec<u64>,
    pub fortran_order: bool,
}

impl Header {
    /// Total number of elements; an empty shape is a scalar
    pub fn num_elements(&self) -> u64 {
        element_count(&self.shape)
    }

    /// Payload size in bytes
    pub fn payload_len(&self) -> Result<usize> {
        payload_len(&self.shape, self.dtype)
    }
}

/// Product of the dimensions, saturating at `u64::MAX`
fn element_count(shape: &[u64]) -> u64 {
    if shape.contains(&0) {
        return 0;
    }
    shape.iter().fold(1u64, |acc, &dim| acc.saturating_mul(dim))
}

/// Checked `product(shape) * element_size`
fn payload_len(shape: &[u64], dtype: DType) -> Result<usize> {
    if !matches!(dtype.bit_width, 8 | 16 | 32 | 64) {
        return Err(NpyError::UnsupportedWidth(dtype.bit_width));
    }
    if shape.contains(&0) {
        return Ok(0);
    }
    shape
        .iter()
        .try_fold(dtype.element_size(), |acc, &dim| {
            usize::try_from(dim).ok().and_then(|d| acc.checked_mul(d))
        })
        .ok_or(NpyError::OutOfMemory { requested: None })
}

/// One decoded or to-be-encoded array
#[derive(Debug)]
pub struct NpyArray<'a> {
    pub version: Version,
    /// Length of the header text including padding and newline
    pub header_len: usize,
    pub dtype: DType,
    pub shape: Vec<u64>,
    /// Recorded only; bytes are never reordered
    pub fortran_order: bool,
    payload: Payload<'a>,
}

impl NpyArray<'static> {
    /// Array over an owned byte buffer
    pub fn new(dtype: DType, shape: Vec<u64>, data: Vec<u8>) -> Self {
        Self::from_payload(dtype, shape, Payload::Owned(data))
    }

    /// Copy typed values into an owned array in host byte order
    pub fn from_vec<T: Element>(shape: Vec<u64>, values: Vec<T>) -> Self {
        let data = bytemuck::cast_slice::<T, u8>(&values).to_vec();
        Self::new(T::dtype(), shape, data)
    }
}

impl<'a> NpyArray<'a> {
    /// Array over caller-owned bytes; the codec never frees them
    pub fn from_bytes(dtype: DType, shape: Vec<u64>, data: &'a [u8]) -> Self {
        Self::from_payload(dtype, shape, Payload::External(data))
    }

    /// Zero-copy array over caller-owned typed values
    pub fn from_slice<T: Element>(shape: Vec<u64>, values: &'a [T]) -> Self {
        Self::from_bytes(T::dtype(), shape, bytemuck::cast_slice(values))
    }

    pub(crate) fn from_payload(dtype: DType, shape: Vec<u64>, payload: Payload<'a>) -> Self {
        Self {
            version: Version::default(),
            header_len: 0,
            dtype,
            shape,
            fortran_order: false,
            payload,
        }
    }

    pub(crate) fn from_header(
        version: Version,
        header_len: usize,
        header: Header,
        payload: Payload<'a>,
    ) -> Self {
        Self {
            version,
            header_len,
            dtype: header.dtype,
            shape: header.shape,
            fortran_order: header.fortran_order,
            payload,
        }
    }

    pub fn with_fortran_order(mut self, fortran_order: bool) -> Self {
        self.fortran_order = fortran_order;
        self
    }

    /// Number of dimensions
    pub fn dim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements, recomputed from the shape
    pub fn num_elements(&self) -> u64 {
        element_count(&self.shape)
    }

    /// Payload size in bytes implied by shape and dtype
    pub fn expected_size(&self) -> Result<usize> {
        payload_len(&self.shape, self.dtype)
    }

    /// Raw payload bytes
    pub fn data(&self) -> &[u8] {
        self.payload.as_bytes()
    }

    /// Mutable payload bytes; borrowed payloads are copied first
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.payload.make_mut()
    }

    pub fn payload(&self) -> &Payload<'a> {
        &self.payload
    }

    pub(crate) fn payload_mut(&mut self) -> &mut Payload<'a> {
        &mut self.payload
    }

    pub fn ownership(&self) -> Ownership {
        self.payload.ownership()
    }

    /// Unmap or free the payload. Safe to call any number of times.
    pub fn release(&mut self) {
        self.payload.release();
    }

    /// Detach from any borrowed payload
    pub fn into_owned(self) -> NpyArray<'static> {
        NpyArray {
            version: self.version,
            header_len: self.header_len,
            dtype: self.dtype,
            shape: self.shape,
            fortran_order: self.fortran_order,
            payload: self.payload.into_owned(),
        }
    }

    fn check_type<T: Element>(&self) -> std::result::Result<(), AccessError> {
        let expected = T::dtype();
        if expected.kind != self.dtype.kind || expected.bit_width != self.dtype.bit_width {
            return Err(AccessError::TypeMismatch {
                expected,
                actual: self.dtype,
            });
        }
        Ok(())
    }

    /// Zero-copy typed view of the payload.
    ///
    /// Requires host byte order and an address aligned for `T`.
    pub fn as_slice<T: Element>(&self) -> std::result::Result<&[T], AccessError> {
        self.check_type::<T>()?;
        if self.dtype.needs_swap() {
            return Err(AccessError::ForeignByteOrder(self.dtype));
        }
        // Empty buffers carry a dangling pointer that need not be aligned for T
        if self.data().is_empty() {
            return Ok(&[]);
        }
        bytemuck::try_cast_slice(self.data()).map_err(|_| AccessError::Misaligned)
    }

    /// Copy the payload out as typed values, converting byte order if needed
    pub fn to_vec<T: Element>(&self) -> std::result::Result<Vec<T>, AccessError> {
        self.check_type::<T>()?;
        let size = std::mem::size_of::<T>();
        let swap = self.dtype.needs_swap();
        let values = self
            .data()
            .chunks_exact(size)
            .map(|chunk| {
                if swap {
                    let mut buf = [0u8; 8];
                    buf[..size].copy_from_slice(chunk);
                    buf[..size].reverse();
                    bytemuck::pod_read_unaligned(&buf[..size])
                } else {
                    bytemuck::pod_read_unaligned(chunk)
                }
            })
            .collect();
        Ok(values)
    }
}
