//! Caller-side numeric representations.
//!
//! Every element crosses the array boundary as a [`Value`]: the caller's type is widened into
//! one of three lossless lanes, and the native element type narrows out of it again. Both
//! directions use Rust `as` semantics (via [`num_traits::AsPrimitive`]):
//! - float to integer truncates toward zero and saturates at the integer's bounds
//! - integer to narrower integer keeps the low bits
//! - integer to float rounds to the nearest representable value
//!
//! Going through the widest lane of the source's own kind gives the same result as a direct
//! `as` cast between the two types.
use num_traits::AsPrimitive;

/// A scalar in its widest lossless lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl Value {
    #[inline]
    pub fn cast<T>(self) -> T
    where
        T: Copy + 'static,
        u64: AsPrimitive<T>,
        i64: AsPrimitive<T>,
        f64: AsPrimitive<T>,
    {
        match self {
            Value::Unsigned(v) => v.as_(),
            Value::Signed(v) => v.as_(),
            Value::Float(v) => v.as_(),
        }
    }
}

/// A numeric type callers can read from or write into any array.
pub trait Scalar: Copy + 'static {
    fn into_value(self) -> Value;
    fn from_value(value: Value) -> Self;
}

macro_rules! impl_scalar {
    ($ty:ty, $lane:ident, $wide:ty) => {
        impl Scalar for $ty {
            #[inline]
            fn into_value(self) -> Value {
                Value::$lane(self as $wide)
            }

            #[inline]
            fn from_value(value: Value) -> Self {
                value.cast()
            }
        }
    };
}

impl_scalar!(u8, Unsigned, u64);
impl_scalar!(u16, Unsigned, u64);
impl_scalar!(u32, Unsigned, u64);
impl_scalar!(u64, Unsigned, u64);
impl_scalar!(usize, Unsigned, u64);
impl_scalar!(i8, Signed, i64);
impl_scalar!(i16, Signed, i64);
impl_scalar!(i32, Signed, i64);
impl_scalar!(i64, Signed, i64);
impl_scalar!(isize, Signed, i64);
impl_scalar!(f32, Float, f64);
impl_scalar!(f64, Float, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn convert<A: Scalar, B: Scalar>(a: A) -> B {
        B::from_value(a.into_value())
    }

    #[test]
    fn float_to_int_truncates_toward_zero() {
        assert_eq!(convert::<f64, i32>(2.9), 2);
        assert_eq!(convert::<f64, i32>(-2.9), -2);
        assert_eq!(convert::<f32, u8>(7.99), 7);
    }

    #[test]
    fn float_to_int_saturates() {
        assert_eq!(convert::<f64, u8>(300.0), 255);
        assert_eq!(convert::<f64, u8>(-1.0), 0);
        assert_eq!(convert::<f64, i16>(f64::NAN), 0);
    }

    #[test]
    fn int_narrowing_keeps_low_bits() {
        assert_eq!(convert::<i32, u8>(-1), 255);
        assert_eq!(convert::<i32, u8>(256 + 20), 20);
        assert_eq!(convert::<u32, i16>(0xFFFF), -1);
        assert_eq!(convert::<i64, i8>(-129), 127);
    }

    #[test]
    fn matches_direct_casts() {
        let samples = [0i32, 1, -1, 127, 128, -128, 40_000, -40_000, i32::MAX, i32::MIN];
        for s in samples {
            assert_eq!(convert::<i32, u8>(s), s as u8);
            assert_eq!(convert::<i32, i16>(s), s as i16);
            assert_eq!(convert::<i32, f32>(s), s as f32);
            assert_eq!(convert::<i32, u32>(s), s as u32);
        }
        assert_eq!(convert::<u64, i64>(u64::MAX), -1);
        assert_eq!(convert::<f32, f64>(0.1f32), 0.1f32 as f64);
    }
}
