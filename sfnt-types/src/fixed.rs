//! fixed-point numerical types

use crate::Scalar;

// shared between Fixed and F2Dot14
macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
        #[doc = concat!(stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction." )]
        pub struct $name($ty);

        impl $name {
            const INT_MASK: $ty = !0 << $fract_bits;
            const ROUND: $ty = 1 << ($fract_bits - 1);
            const ONE: $ty = 1 << $fract_bits;
            const FRACT_BITS: usize = $fract_bits;

            /// The representation of 1.0 in this format.
            pub const UNIT: Self = Self(Self::ONE);

            /// Create from the underlying raw bit pattern.
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// The underlying raw bit pattern.
            pub const fn to_bits(self) -> $ty {
                self.0
            }

            /// Returns the nearest integer value.
            pub fn round(self) -> Self {
                Self(self.0.wrapping_add(Self::ROUND) & Self::INT_MASK)
            }

            /// The in-memory big-endian representation.
            pub const fn to_be_bytes(self) -> [u8; $bits / 8] {
                self.0.to_be_bytes()
            }

            /// Create from big-endian bytes.
            pub const fn from_be_bytes(bytes: [u8; $bits / 8]) -> Self {
                Self(<$ty>::from_be_bytes(bytes))
            }
        }

        impl Scalar for $name {
            const RAW_BYTE_LEN: usize = $bits / 8;

            fn read(bytes: &[u8]) -> Option<Self> {
                <$ty>::read(bytes).map(Self)
            }
        }
    };
}

/// impl float conversion methods.
///
/// We convert to different float types in order to ensure we can roundtrip
/// without floating point error.
macro_rules! float_conv {
    ($name:ident, $to:ident, $from:ident, $ty:ty) => {
        impl $name {
            #[doc = concat!("Creates a fixed point value from an ", stringify!($ty), ".")]
            ///
            /// This operation is lossy; the float is rounded to the nearest
            /// representable value.
            pub fn $from(x: $ty) -> Self {
                Self((x * Self::ONE as $ty).round() as _)
            }

            #[doc = concat!("Returns the value as an ", stringify!($ty), ".")]
            ///
            /// This operation is lossless: all representable values can be
            /// round-tripped.
            pub fn $to(self) -> $ty {
                let int = ((self.0 & Self::INT_MASK) >> Self::FRACT_BITS) as $ty;
                let fract = (self.0 & !Self::INT_MASK) as $ty / Self::ONE as $ty;
                int + fract
            }
        }

        // we can losslessly go to float, so use those fmt impls
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.$to().fmt(f)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.$to().fmt(f)
            }
        }
    };
}

fixed_impl!(F2Dot14, 16, 14, i16);
fixed_impl!(Fixed, 32, 16, i32);
float_conv!(F2Dot14, to_f32, from_f32, f32);
float_conv!(Fixed, to_f64, from_f64, f64);

#[cfg(test)]
mod tests {
    #![allow(overflowing_literals)] // we want to specify byte values directly
    use super::*;

    #[test]
    fn f2dot14_floats() {
        // examples from the OpenType data types table
        assert_eq!(F2Dot14::from_bits(0x7000), F2Dot14::from_f32(1.75));
        assert_eq!(F2Dot14::from_bits(0x0000), F2Dot14::from_f32(0.0));
        assert_eq!(F2Dot14::from_bits(0x8000), F2Dot14::from_f32(-2.0));
    }

    #[test]
    fn roundtrip_f2dot14() {
        for i in i16::MIN..=i16::MAX {
            let val = F2Dot14::from_bits(i);
            assert_eq!(val, F2Dot14::from_f32(val.to_f32()));
        }
    }

    #[test]
    fn fixed_floats() {
        assert_eq!(Fixed::from_bits(0x0001_0000), Fixed::from_f64(1.0));
        assert_eq!(Fixed::from_bits(0x7fff_0000), Fixed::from_f64(32767.));
        assert_eq!(Fixed::from_bits(0xffff_0000), Fixed::from_f64(-1.0));
    }

    #[test]
    fn be_bytes() {
        assert_eq!(Fixed::from_f64(1.0).to_be_bytes(), [0, 1, 0, 0]);
        assert_eq!(F2Dot14::from_f32(1.0).to_be_bytes(), [0x40, 0]);
    }
}
