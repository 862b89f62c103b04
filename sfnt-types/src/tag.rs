use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use crate::Scalar;

/// An OpenType tag.
///
/// A tag is a 4-byte array where each byte is in the printable ASCII range
/// `(0x20..=0x7E)`. We do not strictly enforce this constraint, as it is
/// possible to encounter invalid tags in existing fonts, and these need to be
/// representable.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes.
    ///
    /// This does not perform any validation; use [`Tag::new_checked`] for a
    /// constructor that validates input.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Attempt to create a `Tag` from raw bytes.
    ///
    /// The slice must contain between 1 and 4 bytes, each in the printable
    /// ASCII range (`0x20..=0x7E`); shorter input is padded with spaces.
    pub const fn new_checked(src: &[u8]) -> Result<Self, InvalidTag> {
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [0x20; 4];
        let mut i = 0;
        while i < src.len() {
            let byte = src[i];
            if byte < 0x20 || byte > 0x7e {
                return Err(InvalidTag::InvalidByte { pos: i, byte });
            }
            raw[i] = byte;
            i += 1;
        }
        Ok(Tag(raw))
    }

    /// Construct a new `Tag` from a big-endian `u32`, without validation.
    pub const fn from_u32(src: u32) -> Self {
        Self::from_be_bytes(src.to_be_bytes())
    }

    /// Create a tag from raw big-endian bytes.
    ///
    /// This does not check the input, and is only intended to be used during
    /// parsing, where invalid inputs are accepted.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    // for symmetry with the integer types we encode/decode
    /// Return the memory representation of this tag.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// This tag as a big-endian `u32`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

/// An error representing an invalid tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidTag {
    /// The tag was not between 1 and 4 bytes in length.
    InvalidLength(usize),
    /// The tag contained a byte outside the printable ASCII range.
    InvalidByte { pos: usize, byte: u8 },
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(src.as_bytes())
    }
}

impl Scalar for Tag {
    const RAW_BYTE_LEN: usize = 4;

    fn read(bytes: &[u8]) -> Option<Self> {
        bytes
            .get(..4)
            .map(|raw| Tag::from_be_bytes(raw.try_into().unwrap()))
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // a dumpable version of this tag, with non-printable bytes escaped
        for byte in self.0 {
            if (0x20..=0x7e).contains(&byte) {
                Display::fmt(&(byte as char), f)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Tag(\"{self}\")")
    }
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "invalid byte 0x{byte:02X} at index {pos}")
            }
            InvalidTag::InvalidLength(len) => write!(f, "invalid length ({len})"),
        }
    }
}

impl std::error::Error for InvalidTag {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test() {
        assert_eq!(Tag::new(b"head").to_string(), "head");
        assert_eq!(Tag::from_str("glyf").unwrap(), Tag::new(b"glyf"));
        assert_eq!(Tag::new_checked(b"CFF").unwrap(), Tag::new(b"CFF "));
        assert_eq!(Tag::new(b"OTTO").to_u32(), 0x4F54_544F);
    }

    #[test]
    fn invalid_bytes() {
        assert!(Tag::new_checked(b"\x01abc").is_err());
        assert!(Tag::new_checked(b"").is_err());
        assert!(Tag::new_checked(b"abcde").is_err());
    }

    #[test]
    fn ordering_matches_bytes() {
        // the table directory is sorted by tag as raw bytes
        let mut tags = vec![Tag::new(b"name"), Tag::new(b"DSIG"), Tag::new(b"cmap")];
        tags.sort();
        assert_eq!(
            tags,
            [Tag::new(b"DSIG"), Tag::new(b"cmap"), Tag::new(b"name")]
        );
    }
}
