//! 16-bit signed and unsigned font-units

use crate::Scalar;

/// 16-bit signed quantity in font design units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FWord(i16);

/// 16-bit unsigned quantity in font design units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UfWord(u16);

impl FWord {
    pub const fn new(raw: i16) -> Self {
        Self(raw)
    }

    pub const fn to_i16(self) -> i16 {
        self.0
    }

    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl UfWord {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn to_u16(self) -> u16 {
        self.0
    }

    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl Scalar for FWord {
    const RAW_BYTE_LEN: usize = 2;

    fn read(bytes: &[u8]) -> Option<Self> {
        i16::read(bytes).map(Self)
    }
}

impl Scalar for UfWord {
    const RAW_BYTE_LEN: usize = 2;

    fn read(bytes: &[u8]) -> Option<Self> {
        u16::read(bytes).map(Self)
    }
}
