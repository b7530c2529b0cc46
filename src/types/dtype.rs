//! Element data types and the three-character descriptor codec

use crate::error::{NpyError, Result};
use std::fmt;
use std::str::FromStr;

/// Byte order of multi-byte elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the running host
    pub fn host() -> Self {
        if u16::from_ne_bytes([1, 0]) == 1 {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    pub fn is_little(self) -> bool {
        self == ByteOrder::Little
    }

    fn symbol(self) -> char {
        match self {
            ByteOrder::Little => '<',
            ByteOrder::Big => '>',
        }
    }
}

/// Numeric kind of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    SignedInt,
    UnsignedInt,
    Float,
}

impl ElementKind {
    /// Floats count as signed
    pub fn is_signed(self) -> bool {
        !matches!(self, ElementKind::UnsignedInt)
    }

    fn symbol(self) -> char {
        match self {
            ElementKind::SignedInt => 'i',
            ElementKind::UnsignedInt => 'u',
            ElementKind::Float => 'f',
        }
    }
}

/// Decoded element type: byte order, kind and width
///
/// The descriptor text (e.g. `<f4`) is always derived from these fields,
/// so the two forms cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DType {
    pub byte_order: ByteOrder,
    pub kind: ElementKind,
    /// Bits per element; valid values are 8, 16, 32 and 64
    pub bit_width: u32,
}

impl DType {
    /// Element type in host byte order
    pub fn new(kind: ElementKind, bit_width: u32) -> Self {
        Self {
            byte_order: ByteOrder::host(),
            kind,
            bit_width,
        }
    }

    pub fn with_byte_order(self, byte_order: ByteOrder) -> Self {
        Self { byte_order, ..self }
    }

    /// Size in bytes of a single element
    pub fn element_size(self) -> usize {
        (self.bit_width / 8) as usize
    }

    /// Whether the payload must be byte swapped to match the host
    pub fn needs_swap(self) -> bool {
        self.bit_width > 8 && self.byte_order != ByteOrder::host()
    }

    /// Decode a descriptor string such as `<f4` or `>u2`.
    ///
    /// Only `[<>][iuf][1248]` is accepted. Odd combinations such as `<f1`
    /// pass through untouched.
    pub fn from_descr(descr: &str) -> Result<Self> {
        let unsupported = || NpyError::UnsupportedDtype(descr.to_string());
        let bytes = descr.as_bytes();
        if bytes.len() != 3 {
            return Err(unsupported());
        }

        let byte_order = match bytes[0] {
            b'<' => ByteOrder::Little,
            b'>' => ByteOrder::Big,
            _ => return Err(unsupported()),
        };
        let kind = match bytes[1] {
            b'i' => ElementKind::SignedInt,
            b'u' => ElementKind::UnsignedInt,
            b'f' => ElementKind::Float,
            _ => return Err(unsupported()),
        };
        let bit_width = match bytes[2] {
            b'1' => 8,
            b'2' => 16,
            b'4' => 32,
            b'8' => 64,
            _ => return Err(unsupported()),
        };

        Ok(Self {
            byte_order,
            kind,
            bit_width,
        })
    }

    /// Encode as a three-character descriptor string
    pub fn descr(self) -> Result<String> {
        let size = match self.bit_width {
            8 => '1',
            16 => '2',
            32 => '4',
            64 => '8',
            other => return Err(NpyError::UnsupportedWidth(other)),
        };
        Ok([self.byte_order.symbol(), self.kind.symbol(), size]
            .iter()
            .collect())
    }
}

impl FromStr for DType {
    type Err = NpyError;

    fn from_str(s: &str) -> Result<Self> {
        DType::from_descr(s)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.byte_order.symbol(),
            self.kind.symbol(),
            self.bit_width / 8
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descr() {
        let dt = DType::from_descr("<f4").unwrap();
        assert_eq!(dt.byte_order, ByteOrder::Little);
        assert_eq!(dt.kind, ElementKind::Float);
        assert_eq!(dt.bit_width, 32);
        assert!(dt.kind.is_signed());

        let dt = DType::from_descr(">u2").unwrap();
        assert_eq!(dt.byte_order, ByteOrder::Big);
        assert_eq!(dt.kind, ElementKind::UnsignedInt);
        assert_eq!(dt.bit_width, 16);
        assert!(!dt.kind.is_signed());

        let dt: DType = "<i8".parse().unwrap();
        assert_eq!(dt.kind, ElementKind::SignedInt);
        assert_eq!(dt.element_size(), 8);
    }

    #[test]
    fn test_descr_inverse() {
        for order in ["<", ">"] {
            for kind in ["i", "u", "f"] {
                for size in ["1", "2", "4", "8"] {
                    let s = format!("{order}{kind}{size}");
                    let dt = DType::from_descr(&s).unwrap();
                    assert_eq!(dt.descr().unwrap(), s);
                    assert_eq!(dt.to_string(), s);
                }
            }
        }
    }

    #[test]
    fn test_odd_combinations_pass_through() {
        let dt = DType::from_descr("<f1").unwrap();
        assert_eq!(dt.kind, ElementKind::Float);
        assert_eq!(dt.bit_width, 8);
    }

    #[test]
    fn test_rejects_bad_descr() {
        for bad in ["", "<f", "<f44", "|u1", "=f4", "<c8", "<f3", "<f16", "f4<"] {
            assert!(
                matches!(DType::from_descr(bad), Err(NpyError::UnsupportedDtype(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_descr_rejects_bad_width() {
        let dt = DType {
            byte_order: ByteOrder::Little,
            kind: ElementKind::Float,
            bit_width: 24,
        };
        assert!(matches!(dt.descr(), Err(NpyError::UnsupportedWidth(24))));
    }

    #[test]
    fn test_host_order_is_consistent() {
        let expected = if cfg!(target_endian = "little") {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        };
        assert_eq!(ByteOrder::host(), expected);
        assert_eq!(DType::new(ElementKind::Float, 32).byte_order, expected);
        assert!(!DType::new(ElementKind::Float, 32).needs_swap());
    }

    #[test]
    fn test_single_byte_never_swaps() {
        let dt = DType::new(ElementKind::UnsignedInt, 8).with_byte_order(ByteOrder::Big);
        assert!(!dt.needs_swap());
        let dt = dt.with_byte_order(ByteOrder::Little);
        assert!(!dt.needs_swap());
    }
}
