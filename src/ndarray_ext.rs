//! ndarray integration for npy arrays
//!
//! Conversions between [`NpyArray`] and ndarray's dynamic-dimension arrays.
//! `fortran_order` selects the memory layout ndarray is told about; payload
//! bytes themselves are never reordered.
//!
//! Enable with the `ndarray` feature flag.

use crate::error::AccessError;
use crate::types::{Element, NpyArray};
use ndarray::{ArrayBase, ArrayD, ArrayViewD, Data, Dimension, IxDyn, ShapeBuilder};
use thiserror::Error;

/// Error type for ndarray conversions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NdarrayError {
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Shape doesn't match data length
    #[error("shape {shape:?} doesn't match payload of {data_len} bytes")]
    ShapeMismatch { shape: Vec<u64>, data_len: usize },
}

fn dims(array: &NpyArray<'_>) -> Result<Vec<usize>, NdarrayError> {
    array
        .shape
        .iter()
        .map(|&d| usize::try_from(d))
        .collect::<Result<_, _>>()
        .map_err(|_| shape_mismatch(array))
}

fn shape_mismatch(array: &NpyArray<'_>) -> NdarrayError {
    NdarrayError::ShapeMismatch {
        shape: array.shape.clone(),
        data_len: array.data().len(),
    }
}

// =============================================================================
// From ndarray to npy
// =============================================================================

impl NpyArray<'static> {
    /// Copy an ndarray into an owned array in host byte order.
    ///
    /// Column-major inputs keep their layout and are tagged `fortran_order`;
    /// anything else is written row-major.
    pub fn from_ndarray<T, S, D>(arr: &ArrayBase<S, D>) -> Self
    where
        T: Element,
        S: Data<Elem = T>,
        D: Dimension,
    {
        let shape: Vec<u64> = arr.shape().iter().map(|&d| d as u64).collect();
        let fortran = arr.ndim() > 1 && !arr.is_standard_layout() && arr.t().is_standard_layout();

        let values: Vec<T> = if fortran {
            arr.t().iter().copied().collect()
        } else {
            arr.iter().copied().collect()
        };
        NpyArray::from_vec(shape, values).with_fortran_order(fortran)
    }
}

// =============================================================================
// From npy to ndarray
// =============================================================================

impl<'a> NpyArray<'a> {
    /// Copy into an owned ndarray, converting byte order if needed
    pub fn to_ndarray<T: Element>(&self) -> Result<ArrayD<T>, NdarrayError> {
        let values = self.to_vec::<T>()?;
        let shape = IxDyn(&dims(self)?).set_f(self.fortran_order);
        ArrayD::from_shape_vec(shape, values).map_err(|_| shape_mismatch(self))
    }

    /// Zero-copy view; needs host byte order and an aligned payload
    pub fn as_ndarray_view<T: Element>(&self) -> Result<ArrayViewD<'_, T>, NdarrayError> {
        let slice = self.as_slice::<T>()?;
        let shape = IxDyn(&dims(self)?).set_f(self.fortran_order);
        ArrayViewD::from_shape(shape, slice).map_err(|_| shape_mismatch(self))
    }
}
