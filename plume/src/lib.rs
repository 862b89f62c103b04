//! An editable outline font model, with import from and export to the
//! binary sfnt formats.
//!
//! The model keeps every outline as cubic beziers. TrueType quadratic
//! outlines are lifted exactly on import; on export they are refit within
//! a configurable error bound. CFF outlines pass through unchanged.
//!
//! Import is lenient: damaged optional tables degrade into
//! [`ImportWarning`]s instead of failing the whole font. Export is strict
//! and moves through a typed pipeline, so a font that validates cannot
//! fail halfway through serialization.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod conv;
mod eot;
mod error;
mod export;
mod font;
mod import;
mod svg;

pub use error::{ExportError, ImportError, ImportWarning};
pub use export::{export, DirectoryAssembled, ExportFormat, Finalized, TablesBuilt, Validated};
pub use font::{Component, Contour, Font, Glyph, KernPair, Outline, Segment};

pub extern crate kurbo;
pub extern crate sfnt_types as types;
