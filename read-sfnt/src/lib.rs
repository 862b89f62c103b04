//! Reading binary sfnt font tables.
//!
//! This crate provides memory safe parsing of font files: a bounds-checked
//! cursor over raw bytes, the sfnt table directory, and decoders for the
//! individual tables an outline editor needs (head, hhea, hmtx, maxp, cmap,
//! kern, name, loca, glyf, CFF, post).
//!
//! It is unopinionated about what the decoded data means; the `plume` crate
//! layers the editable outline model on top of it.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font_data;
mod read;
mod table_directory;
pub mod tables;

pub use font_data::{Cursor, FontData};
pub use read::{FontRead, ReadError};
pub use table_directory::{
    compute_checksum, ChecksumMismatch, FontRef, TableDirectory, TableRecord,
};

/// Public re-export of the sfnt-types crate.
pub extern crate sfnt_types as types;

/// A table with a canonical location in the table directory.
pub trait TopLevelTable {
    /// The table's tag.
    const TAG: types::Tag;
}
