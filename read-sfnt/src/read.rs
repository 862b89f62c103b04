//! Traits for interpreting font data

use sfnt_types::Tag;

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// In the case of a table, the `read` method is responsible for ensuring the
/// input data is consistent: that any versioned fields are present as
/// required by the version, and that any array lengths are not
/// out-of-bounds.
pub trait FontRead<'a>: Sized {
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A read or offset was past the end of the data.
    ///
    /// At the whole-font level this means the file is truncated, which is
    /// not recoverable.
    OutOfBounds,
    /// A format or version field with a value the format does not define.
    InvalidFormat(i64),
    /// A format the spec defines but this crate does not implement.
    ///
    /// Callers are expected to skip the table (or subtable) and continue
    /// with a degraded result.
    UnsupportedFormat(i64),
    InvalidSfnt(u32),
    InvalidArrayLen,
    TableIsMissing(Tag),
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "unexpected end of data"),
            ReadError::InvalidFormat(x) => write!(f, "invalid format '{x}'"),
            ReadError::UnsupportedFormat(x) => write!(f, "unsupported format '{x}'"),
            ReadError::InvalidSfnt(ver) => write!(f, "invalid sfnt version 0x{ver:08X}"),
            ReadError::InvalidArrayLen => {
                write!(f, "specified array length not a multiple of item size")
            }
            ReadError::TableIsMissing(tag) => write!(f, "the {tag} table is missing"),
            ReadError::MalformedData(msg) => write!(f, "malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}
