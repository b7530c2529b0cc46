//! Header text serialization and padding

use super::prelude::serialize_prelude;
use crate::error::{NpyError, Result};
use crate::types::{ALIGNMENT, MAX_HEADER_CAPACITY_V1, MIN_HEADER_CAPACITY, NpyArray, PRELUDE_SIZE_V1};
use std::fmt::Write;

/// Shape tuple in canonical form: every dimension followed by `", "`
pub fn serialize_shape(shape: &[u64]) -> String {
    let mut out = String::with_capacity(2 + shape.len() * 4);
    out.push('(');
    for dim in shape {
        // Writing to a String cannot fail
        let _ = write!(out, "{}, ", dim);
    }
    out.push(')');
    out
}

/// Dictionary text with keys in canonical order, without padding
pub fn serialize_dict(array: &NpyArray<'_>) -> Result<String> {
    let fortran = if array.fortran_order { "True" } else { "False" };
    Ok(format!(
        "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
        array.dtype.descr()?,
        fortran,
        serialize_shape(&array.shape)
    ))
}

/// Spaces needed so that prelude, text and trailing newline end on an
/// `ALIGNMENT` boundary
fn padding_for(text_len: usize) -> usize {
    let unpadded = PRELUDE_SIZE_V1 + text_len + 1;
    (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT
}

/// Write prelude and padded header into `buf`; returns bytes written
pub fn encode_header_into(buf: &mut [u8], array: &NpyArray<'_>) -> Result<usize> {
    if buf.len() < MIN_HEADER_CAPACITY {
        return Err(NpyError::CapacityExceeded {
            required: MIN_HEADER_CAPACITY,
            capacity: buf.len(),
        });
    }

    let text = serialize_dict(array)?;
    let header_len = text.len() + padding_for(text.len()) + 1;
    let total = PRELUDE_SIZE_V1 + header_len;
    if total > buf.len() {
        return Err(NpyError::CapacityExceeded {
            required: total,
            capacity: buf.len(),
        });
    }
    let Ok(len_field) = u16::try_from(header_len) else {
        return Err(NpyError::CapacityExceeded {
            required: total,
            capacity: MAX_HEADER_CAPACITY_V1,
        });
    };

    buf[..PRELUDE_SIZE_V1].copy_from_slice(&serialize_prelude(len_field));
    let (body, tail) = buf[PRELUDE_SIZE_V1..total].split_at_mut(text.len());
    body.copy_from_slice(text.as_bytes());
    let last = tail.len() - 1;
    tail[..last].fill(b' ');
    tail[last] = b'\n';
    Ok(total)
}

/// Prelude and padded header as a fresh buffer
pub fn encode_header(array: &NpyArray<'_>) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; MAX_HEADER_CAPACITY_V1];
    let len = encode_header_into(&mut buf, array)?;
    buf.truncate(len);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadOptions;
    use crate::parser::parse_header;
    use crate::types::{ByteOrder, DType, ElementKind};

    fn f4_le(shape: Vec<u64>) -> NpyArray<'static> {
        let dtype = DType::new(ElementKind::Float, 32).with_byte_order(ByteOrder::Little);
        NpyArray::new(dtype, shape, vec![])
    }

    #[test]
    fn test_shape_text() {
        assert_eq!(serialize_shape(&[]), "()");
        assert_eq!(serialize_shape(&[7]), "(7, )");
        assert_eq!(serialize_shape(&[2, 3]), "(2, 3, )");
    }

    #[test]
    fn test_dict_text() {
        let text = serialize_dict(&f4_le(vec![2, 3])).unwrap();
        assert_eq!(
            text,
            "{'descr': '<f4', 'fortran_order': False, 'shape': (2, 3, ), }"
        );
        let text = serialize_dict(&f4_le(vec![]).with_fortran_order(true)).unwrap();
        assert!(text.contains("'fortran_order': True"));
        assert!(text.ends_with("'shape': (), }"));
    }

    #[test]
    fn test_padding_alignment() {
        for dims in 0..=32 {
            let shape: Vec<u64> = (0..dims).map(|d| d * 1001).collect();
            let bytes = encode_header(&f4_le(shape)).unwrap();
            assert_eq!(bytes.len() % ALIGNMENT, 0);
            assert_eq!(*bytes.last().unwrap(), b'\n');
            assert!(bytes.len() >= MIN_HEADER_CAPACITY);
        }
    }

    #[test]
    fn test_encoded_header_parses_back() {
        let array = f4_le(vec![4, 0, 9]).with_fortran_order(true);
        let bytes = encode_header(&array).unwrap();
        let (prelude, header) = parse_header(&bytes, &LoadOptions::default()).unwrap();
        assert_eq!(prelude.payload_offset(), bytes.len());
        assert_eq!(header.shape, vec![4, 0, 9]);
        assert_eq!(header.dtype, array.dtype);
        assert!(header.fortran_order);
    }

    #[test]
    fn test_capacity() {
        let array = f4_le(vec![2, 3]);
        let mut small = [0u8; 32];
        assert!(matches!(
            encode_header_into(&mut small, &array),
            Err(NpyError::CapacityExceeded { required: 64, capacity: 32 })
        ));

        let mut exact = [0u8; 80];
        assert_eq!(encode_header_into(&mut exact, &array).unwrap(), 80);

        let long = f4_le(vec![u64::MAX; 8]);
        let mut buf = [0u8; 96];
        assert!(matches!(
            encode_header_into(&mut buf, &long),
            Err(NpyError::CapacityExceeded { capacity: 96, .. })
        ));
    }

    #[test]
    fn test_unsupported_width_is_reported() {
        let dtype = DType::new(ElementKind::Float, 24);
        let array = NpyArray::new(dtype, vec![1], vec![]);
        assert!(matches!(
            encode_header(&array),
            Err(NpyError::UnsupportedWidth(24))
        ));
    }
}
