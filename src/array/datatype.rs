//! Native element types.
//!
//! [`Element`] ties each supported Rust primitive to its [`ElementType`] tag and to the
//! matching [`Storage`] variant. Only these eight types can back an array; callers reading or
//! writing through [`Scalar`] may use any primitive.
use crate::{
    array::{storage::Storage, value::Scalar},
    dtype::ElementType,
};

pub trait Element: Scalar + Default + PartialEq + std::fmt::Debug {
    /// The tag for this native type.
    const TYPE: ElementType;

    /// Borrow the typed buffer, if `storage` holds this type.
    fn slice(storage: &Storage) -> Option<&[Self]>;

    fn slice_mut(storage: &mut Storage) -> Option<&mut [Self]>;

    /// Wrap a typed buffer in its storage variant.
    fn into_storage(data: Vec<Self>) -> Storage;

    /// Decode one element from exactly `size_of::<Self>()` native-endian bytes.
    fn decode_ne(bytes: &[u8]) -> Self;

    fn encode_ne(self, out: &mut bytes::BytesMut);
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const TYPE: ElementType = ElementType::$variant;

            fn slice(storage: &Storage) -> Option<&[Self]> {
                match storage {
                    Storage::$variant(buf) => Some(buf.as_slice()),
                    _ => None,
                }
            }

            fn slice_mut(storage: &mut Storage) -> Option<&mut [Self]> {
                match storage {
                    Storage::$variant(buf) => Some(buf.as_mut_slice()),
                    _ => None,
                }
            }

            fn into_storage(data: Vec<Self>) -> Storage {
                Storage::$variant(data)
            }

            #[inline]
            fn decode_ne(bytes: &[u8]) -> Self {
                let mut raw = [0u8; size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_ne_bytes(raw)
            }

            #[inline]
            fn encode_ne(self, out: &mut bytes::BytesMut) {
                out.extend_from_slice(&self.to_ne_bytes());
            }
        }
    };
}

impl_element!(u8, UnsignedByte);
impl_element!(i8, SignedByte);
impl_element!(u16, UnsignedShort);
impl_element!(i16, SignedShort);
impl_element!(u32, UnsignedInt);
impl_element!(i32, SignedInt);
impl_element!(f32, Float);
impl_element!(f64, Double);
