//! Import and export errors

use read_sfnt::ReadError;
use sfnt_types::Tag;
use write_sfnt::ValidationReport;

/// A fatal problem while reading a font file.
///
/// Import only fails outright when the container itself is unusable;
/// damage that is local to one table becomes an [`ImportWarning`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The data ended before a required structure was complete.
    UnexpectedEndOfData,
    /// The file is not an sfnt container we recognize.
    UnrecognizedContainer(u32),
    /// A table every font must carry is absent.
    MissingTable(Tag),
    /// A required table is present but unusable.
    MalformedTable { tag: Tag, detail: String },
}

impl ImportError {
    pub(crate) fn in_table(tag: Tag, err: ReadError) -> ImportError {
        match err {
            ReadError::OutOfBounds => ImportError::UnexpectedEndOfData,
            ReadError::TableIsMissing(tag) => ImportError::MissingTable(tag),
            other => ImportError::MalformedTable {
                tag,
                detail: other.to_string(),
            },
        }
    }
}

impl From<ReadError> for ImportError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::OutOfBounds => ImportError::UnexpectedEndOfData,
            ReadError::InvalidSfnt(version) => ImportError::UnrecognizedContainer(version),
            ReadError::TableIsMissing(tag) => ImportError::MissingTable(tag),
            other => ImportError::MalformedTable {
                tag: Tag::default(),
                detail: other.to_string(),
            },
        }
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::UnexpectedEndOfData => write!(f, "unexpected end of data"),
            ImportError::UnrecognizedContainer(version) => {
                write!(f, "unrecognized sfnt version 0x{version:08X}")
            }
            ImportError::MissingTable(tag) => write!(f, "required table '{tag}' is missing"),
            ImportError::MalformedTable { tag, detail } => {
                write!(f, "table '{tag}' is malformed: {detail}")
            }
        }
    }
}

impl std::error::Error for ImportError {}

/// A recoverable problem noticed during import.
///
/// The font is still usable; the warning records what was dropped or
/// degraded so the caller can surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// An optional table could not be parsed and was ignored.
    MalformedTable { tag: Tag, detail: String },
    /// A table's bytes do not sum to the checksum stored in the directory.
    ChecksumMismatch { tag: Tag, stored: u32, computed: u32 },
    /// A subtable uses a format this crate does not decode.
    UnsupportedSubformat { tag: Tag, format: i64 },
    /// One glyph's outline could not be fully recovered.
    DegradedGlyph { glyph: u16, detail: String },
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportWarning::MalformedTable { tag, detail } => {
                write!(f, "ignoring malformed '{tag}' table: {detail}")
            }
            ImportWarning::ChecksumMismatch {
                tag,
                stored,
                computed,
            } => write!(
                f,
                "'{tag}' checksum is {computed:08X}, directory says {stored:08X}"
            ),
            ImportWarning::UnsupportedSubformat { tag, format } => {
                write!(f, "'{tag}' subtable format {format} is not supported")
            }
            ImportWarning::DegradedGlyph { glyph, detail } => {
                write!(f, "glyph {glyph} was degraded: {detail}")
            }
        }
    }
}

/// A problem that prevents a font from being exported.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The composite glyph graph contains a reference cycle through this
    /// glyph.
    InvalidGlyphGraph { glyph: usize },
    /// A component references a glyph index the font does not have.
    DanglingComponent { glyph: usize, target: usize },
    /// One codepoint is assigned to two different glyphs.
    CmapConflict { codepoint: char },
    /// A codepoint the character map format cannot hold.
    UnsupportedCodepoint(char),
    /// A contour with too few points to enclose any area.
    DegenerateContour { glyph: usize },
    /// A cubic segment that could not be fit with quadratics within the
    /// error bound.
    UnfittableCurve { glyph: usize },
    /// The font has no glyphs at all.
    NoGlyphs,
    /// A serialized table failed its pre-write validation.
    InvalidTable(ValidationReport),
}

impl From<ValidationReport> for ExportError {
    fn from(report: ValidationReport) -> Self {
        ExportError::InvalidTable(report)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::InvalidGlyphGraph { glyph } => {
                write!(f, "glyph {glyph} is part of a component cycle")
            }
            ExportError::DanglingComponent { glyph, target } => {
                write!(f, "glyph {glyph} references nonexistent glyph {target}")
            }
            ExportError::CmapConflict { codepoint } => write!(
                f,
                "codepoint U+{:04X} is assigned to two glyphs",
                *codepoint as u32
            ),
            ExportError::UnsupportedCodepoint(c) => write!(
                f,
                "codepoint U+{:04X} cannot be stored in the character map",
                *c as u32
            ),
            ExportError::DegenerateContour { glyph } => {
                write!(f, "glyph {glyph} has a degenerate contour")
            }
            ExportError::UnfittableCurve { glyph } => {
                write!(f, "glyph {glyph} has a curve that cannot be fit")
            }
            ExportError::NoGlyphs => write!(f, "the font has no glyphs"),
            ExportError::InvalidTable(report) => write!(f, "{report}"),
        }
    }
}

impl std::error::Error for ExportError {}
