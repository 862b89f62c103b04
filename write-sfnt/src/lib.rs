//! Writing binary sfnt font tables.
//!
//! The counterpart to `read-sfnt`: serializers for the table types defined
//! there, builders for the tables that need assembling (cmap, name, glyf
//! with loca, CFF), and [`FontBuilder`] for producing a whole file with a
//! correct table directory and checksums.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

#[macro_use]
mod write;

mod font_builder;
pub mod tables;
mod util;
mod validate;

pub use font_builder::FontBuilder;
pub use util::SearchRange;
pub use validate::{Validate, ValidationCtx, ValidationReport};
pub use write::{dump_table, FontWrite, TableWriter};

/// Public re-export of the sfnt-types crate.
pub extern crate sfnt_types as types;
