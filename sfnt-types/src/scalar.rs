//! reading fixed-width values from big-endian bytes

/// A fixed-width type that can be read from raw big-endian bytes.
///
/// This is implemented for the integer primitives as well as for the scalar
/// newtypes in this crate; it is the bound used by the cursor types in
/// `read-sfnt`.
pub trait Scalar: Sized + Copy {
    /// The length of this type's raw representation, in bytes.
    const RAW_BYTE_LEN: usize;

    /// Interpret the start of `bytes` as this type.
    ///
    /// Returns `None` if fewer than [`RAW_BYTE_LEN`](Self::RAW_BYTE_LEN)
    /// bytes are available.
    fn read(bytes: &[u8]) -> Option<Self>;
}

macro_rules! int_scalar {
    ($ty:ty) => {
        impl Scalar for $ty {
            const RAW_BYTE_LEN: usize = std::mem::size_of::<$ty>();

            fn read(bytes: &[u8]) -> Option<Self> {
                bytes
                    .get(..Self::RAW_BYTE_LEN)
                    .map(|raw| <$ty>::from_be_bytes(raw.try_into().unwrap()))
            }
        }
    };
}

int_scalar!(u8);
int_scalar!(i8);
int_scalar!(u16);
int_scalar!(i16);
int_scalar!(u32);
int_scalar!(i32);
int_scalar!(i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_is_big_endian() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(u16::read(&bytes), Some(0x0102));
        assert_eq!(u32::read(&bytes), Some(0x01020304));
        assert_eq!(i16::read(&[0xff, 0xfe]), Some(-2));
    }

    #[test]
    fn short_buffer() {
        assert_eq!(u32::read(&[0x01, 0x02]), None);
        assert_eq!(u8::read(&[]), None);
    }
}
