//! a datetime type

use crate::Scalar;

/// A simple datetime type.
///
/// This is represented as a number of seconds since 12:00 midnight,
/// January 1, 1904, UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LongDateTime(i64);

impl LongDateTime {
    /// Create with a number of seconds relative to 1904-01-01 00:00.
    pub const fn new(secs: i64) -> Self {
        Self(secs)
    }

    /// The number of seconds since 00:00 1904-01-01, UTC.
    ///
    /// This can be a negative number, which presumably represents a date
    /// prior to the reference date.
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl Scalar for LongDateTime {
    const RAW_BYTE_LEN: usize = 8;

    fn read(bytes: &[u8]) -> Option<Self> {
        i64::read(bytes).map(Self)
    }
}
