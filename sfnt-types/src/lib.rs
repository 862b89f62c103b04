//! Scalar types used in sfnt font files.
//!
//! All multi-byte values in an sfnt file are big-endian; this crate provides
//! the fixed-width types those files are made of, along with conversions to
//! and from their raw big-endian representation.

#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod fixed;
mod fword;
mod glyph_id;
mod longdatetime;
mod scalar;
mod tag;

pub use fixed::{F2Dot14, Fixed};
pub use fword::{FWord, UfWord};
pub use glyph_id::GlyphId16;
pub use longdatetime::LongDateTime;
pub use scalar::Scalar;
pub use tag::{InvalidTag, Tag};

/// The sfnt version tag for fonts with TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x0001_0000;

/// The sfnt version tag for fonts with CFF outlines ('OTTO').
pub const CFF_SFNT_VERSION: u32 = 0x4F54_544F;
