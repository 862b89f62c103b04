//! The [loca](https://docs.microsoft.com/en-us/typography/opentype/spec/loca) table

use std::ops::Range;

use sfnt_types::{GlyphId16, Tag};

use crate::{FontData, ReadError, TopLevelTable};

/// The glyph offsets in the short format are stored halved; the long format
/// stores them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loca {
    Short(Vec<u16>),
    Long(Vec<u32>),
}

impl TopLevelTable for Loca {
    const TAG: Tag = Tag::new(b"loca");
}

impl Loca {
    /// Parse the table. `is_long` is head.indexToLocFormat == 1.
    pub fn read(data: FontData<'_>, num_glyphs: u16, is_long: bool) -> Result<Self, ReadError> {
        let n_offsets = num_glyphs as usize + 1;
        let mut cursor = data.cursor();
        let loca = if is_long {
            Loca::Long(cursor.read_array(n_offsets)?)
        } else {
            Loca::Short(cursor.read_array(n_offsets)?)
        };
        // offsets must be monotone or the glyph ranges are nonsense
        let mut prev = 0u32;
        for i in 0..n_offsets {
            let off = loca.offset(i).unwrap();
            if off < prev {
                return Err(ReadError::MalformedData("loca offsets must not decrease"));
            }
            prev = off;
        }
        Ok(loca)
    }

    /// The number of glyphs this table indexes.
    pub fn num_glyphs(&self) -> u16 {
        let len = match self {
            Loca::Short(offsets) => offsets.len(),
            Loca::Long(offsets) => offsets.len(),
        };
        len.saturating_sub(1) as u16
    }

    fn offset(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(offsets) => offsets.get(idx).map(|v| *v as u32 * 2),
            Loca::Long(offsets) => offsets.get(idx).copied(),
        }
    }

    /// The byte range of this glyph within the glyf table.
    ///
    /// An empty range means an empty glyph (no outline), which is how
    /// glyphs like space are stored.
    pub fn get_range(&self, gid: GlyphId16) -> Option<Range<usize>> {
        let idx = gid.to_u16() as usize;
        let start = self.offset(idx)?;
        let end = self.offset(idx + 1)?;
        Some(start as usize..end as usize)
    }
}
