//! Rust primitives that can be stored in an npy payload

use super::{DType, ElementKind};

/// Plain-old-data element type with a fixed dtype mapping
pub trait Element: bytemuck::Pod {
    const KIND: ElementKind;

    /// Dtype of this element in host byte order
    fn dtype() -> DType {
        DType::new(Self::KIND, (std::mem::size_of::<Self>() * 8) as u32)
    }
}

impl Element for u8 {
    const KIND: ElementKind = ElementKind::UnsignedInt;
}
impl Element for i8 {
    const KIND: ElementKind = ElementKind::SignedInt;
}
impl Element for u16 {
    const KIND: ElementKind = ElementKind::UnsignedInt;
}
impl Element for i16 {
    const KIND: ElementKind = ElementKind::SignedInt;
}
impl Element for u32 {
    const KIND: ElementKind = ElementKind::UnsignedInt;
}
impl Element for i32 {
    const KIND: ElementKind = ElementKind::SignedInt;
}
impl Element for u64 {
    const KIND: ElementKind = ElementKind::UnsignedInt;
}
impl Element for i64 {
    const KIND: ElementKind = ElementKind::SignedInt;
}
impl Element for f32 {
    const KIND: ElementKind = ElementKind::Float;
}
impl Element for f64 {
    const KIND: ElementKind = ElementKind::Float;
}
