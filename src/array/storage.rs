use std::collections::TryReserveError;

use crate::{
    array::{
        datatype::Element,
        value::{Scalar, Value},
    },
    dtype::ElementType,
};

/// Exclusively owned element buffer, one variant per [`ElementType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    UnsignedByte(Vec<u8>),
    SignedByte(Vec<i8>),
    UnsignedShort(Vec<u16>),
    SignedShort(Vec<i16>),
    UnsignedInt(Vec<u32>),
    SignedInt(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

/// Run `$body` with `$buf` bound to the typed buffer of whichever variant `$storage` holds.
macro_rules! dispatch {
    ($storage:expr, $buf:ident => $body:expr) => {
        match $storage {
            Storage::UnsignedByte($buf) => $body,
            Storage::SignedByte($buf) => $body,
            Storage::UnsignedShort($buf) => $body,
            Storage::SignedShort($buf) => $body,
            Storage::UnsignedInt($buf) => $body,
            Storage::SignedInt($buf) => $body,
            Storage::Float($buf) => $body,
            Storage::Double($buf) => $body,
        }
    };
}

fn zeroed<T: Element>(len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, T::default());
    Ok(buf)
}

impl Storage {
    /// Reserve and zero-fill `len` elements of `element_type`.
    pub fn try_zeroed(element_type: ElementType, len: usize) -> Result<Self, TryReserveError> {
        Ok(match element_type {
            ElementType::UnsignedByte => Storage::UnsignedByte(zeroed(len)?),
            ElementType::SignedByte => Storage::SignedByte(zeroed(len)?),
            ElementType::UnsignedShort => Storage::UnsignedShort(zeroed(len)?),
            ElementType::SignedShort => Storage::SignedShort(zeroed(len)?),
            ElementType::UnsignedInt => Storage::UnsignedInt(zeroed(len)?),
            ElementType::SignedInt => Storage::SignedInt(zeroed(len)?),
            ElementType::Float => Storage::Float(zeroed(len)?),
            ElementType::Double => Storage::Double(zeroed(len)?),
        })
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Storage::UnsignedByte(_) => ElementType::UnsignedByte,
            Storage::SignedByte(_) => ElementType::SignedByte,
            Storage::UnsignedShort(_) => ElementType::UnsignedShort,
            Storage::SignedShort(_) => ElementType::SignedShort,
            Storage::UnsignedInt(_) => ElementType::UnsignedInt,
            Storage::SignedInt(_) => ElementType::SignedInt,
            Storage::Float(_) => ElementType::Float,
            Storage::Double(_) => ElementType::Double,
        }
    }

    pub fn len(&self) -> usize {
        dispatch!(self, buf => buf.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Native to caller direction. `None` when `offset` is past the end.
    #[inline]
    pub fn read(&self, offset: usize) -> Option<Value> {
        dispatch!(self, buf => buf.get(offset).map(|v| v.into_value()))
    }

    /// Caller to native direction. Returns `false` when `offset` is past the end.
    #[inline]
    pub fn write(&mut self, offset: usize, value: Value) -> bool {
        dispatch!(self, buf => match buf.get_mut(offset) {
            Some(slot) => {
                *slot = Scalar::from_value(value);
                true
            }
            None => false,
        })
    }

    pub fn fill(&mut self, value: Value) {
        dispatch!(self, buf => buf.fill(Scalar::from_value(value)))
    }

    /// Copy the elements at `offsets`, in order, into a new buffer of the same type.
    ///
    /// Every offset must be in bounds.
    pub(crate) fn gather(&self, offsets: &[usize]) -> Storage {
        dispatch!(self, buf => Element::into_storage(
            offsets.iter().map(|&o| buf[o]).collect::<Vec<_>>()
        ))
    }

    pub fn to_ne_bytes(&self) -> bytes::Bytes {
        let width = self.element_type().byte_width();
        let mut out = bytes::BytesMut::with_capacity(self.len() * width);
        dispatch!(self, buf => {
            for &v in buf.iter() {
                v.encode_ne(&mut out);
            }
        });
        out.freeze()
    }

    /// Overwrite every element from native-endian bytes.
    ///
    /// Returns the expected byte length as the error when `bytes` has the wrong size.
    pub fn load_ne_bytes(&mut self, bytes: &[u8]) -> Result<(), usize> {
        let width = self.element_type().byte_width();
        let expected = self.len() * width;
        if bytes.len() != expected {
            return Err(expected);
        }
        dispatch!(self, buf => {
            for (slot, chunk) in buf.iter_mut().zip(bytes.chunks_exact(width)) {
                *slot = Element::decode_ne(chunk);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_has_requested_type_and_len() {
        for ty in ElementType::ALL {
            let s = Storage::try_zeroed(ty, 7).unwrap();
            assert_eq!(s.element_type(), ty);
            assert_eq!(s.len(), 7);
            assert_eq!(u8::from_value(s.read(6).unwrap()), 0);
            assert_eq!(f64::from_value(s.read(3).unwrap()), 0.0);
        }
    }

    #[test]
    fn zeroed_reports_capacity_overflow() {
        assert!(Storage::try_zeroed(ElementType::Double, usize::MAX).is_err());
    }

    #[test]
    fn write_converts_to_native() {
        let mut s = Storage::try_zeroed(ElementType::UnsignedByte, 2).unwrap();
        assert!(s.write(0, 3.7f64.into_value()));
        assert!(s.write(1, (-1i32).into_value()));
        assert_eq!(s, Storage::UnsignedByte(vec![3, 255]));
        assert!(!s.write(2, 1u8.into_value()));
        assert_eq!(s.read(2), None);
    }

    #[test]
    fn fill_and_gather() {
        let mut s = Storage::try_zeroed(ElementType::SignedShort, 4).unwrap();
        s.fill((-7i32).into_value());
        assert_eq!(s, Storage::SignedShort(vec![-7; 4]));
        s.write(2, 9u8.into_value());
        assert_eq!(s.gather(&[2, 0, 2]), Storage::SignedShort(vec![9, -7, 9]));
    }

    #[test]
    fn ne_bytes_roundtrip() {
        let s = Storage::Float(vec![1.0, -2.5, 1e-3]);
        let bytes = s.to_ne_bytes();
        assert_eq!(bytes.len(), 12);
        let mut back = Storage::try_zeroed(ElementType::Float, 3).unwrap();
        back.load_ne_bytes(&bytes).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.load_ne_bytes(&bytes[..8]), Err(12));
    }
}
