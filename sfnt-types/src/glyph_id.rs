//! Glyph Identifiers
//!
//! Although these are treated as u16s in the spec, we choose to represent
//! them as a distinct type.

use crate::Scalar;

/// A 16-bit glyph identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphId16(u16);

impl GlyphId16 {
    /// The identifier reserved for unknown glyphs
    pub const NOTDEF: GlyphId16 = GlyphId16(0);

    /// Construct a new `GlyphId16`.
    pub const fn new(raw: u16) -> Self {
        GlyphId16(raw)
    }

    /// The identifier as a u16.
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl Default for GlyphId16 {
    fn default() -> Self {
        GlyphId16::NOTDEF
    }
}

impl std::fmt::Display for GlyphId16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GID_{}", self.0)
    }
}

impl From<u16> for GlyphId16 {
    fn from(raw: u16) -> Self {
        GlyphId16(raw)
    }
}

impl Scalar for GlyphId16 {
    const RAW_BYTE_LEN: usize = 2;

    fn read(bytes: &[u8]) -> Option<Self> {
        u16::read(bytes).map(Self)
    }
}
