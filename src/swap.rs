//! In-place byte order reversal of fixed-width elements

use crate::error::{NpyError, Result};

/// Reverse the bytes of each of `count` elements of `bit_width` bits.
///
/// A no-op for 8-bit elements. `data` must hold exactly
/// `count * bit_width / 8` bytes.
pub fn swap_bytes(count: usize, bit_width: u32, data: &mut [u8]) -> Result<()> {
    let size = match bit_width {
        8 => return Ok(()),
        16 => 2,
        32 => 4,
        64 => 8,
        other => return Err(NpyError::UnsupportedWidth(other)),
    };

    let expected = count
        .checked_mul(size)
        .ok_or(NpyError::OutOfMemory { requested: None })?;
    if data.len() != expected {
        return Err(NpyError::SizeMismatch {
            expected: expected as u64,
            actual: data.len() as u64,
        });
    }

    for element in data.chunks_exact_mut(size) {
        element.reverse();
    }
    Ok(())
}
