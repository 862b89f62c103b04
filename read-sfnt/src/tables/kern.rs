//! The [kern](https://docs.microsoft.com/en-us/typography/opentype/spec/kern) table

use sfnt_types::{FWord, GlyphId16, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// A horizontal kerning adjustment for a pair of glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernPair {
    pub left: GlyphId16,
    pub right: GlyphId16,
    pub value: FWord,
}

/// The legacy kerning table.
///
/// Only format 0 subtables are decoded; other formats are counted in
/// `skipped_subtables` so the caller can report degraded data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kern {
    pairs: Vec<KernPair>,
    pub skipped_subtables: usize,
}

impl TopLevelTable for Kern {
    const TAG: Tag = Tag::new(b"kern");
}

// coverage bit 0: horizontal data
const COVERAGE_HORIZONTAL: u16 = 0x0001;
// coverage bits 8..15: subtable format
const COVERAGE_FORMAT_SHIFT: u16 = 8;

impl<'a> FontRead<'a> for Kern {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        if version != 0 {
            return Err(ReadError::UnsupportedFormat(version as i64));
        }
        let n_tables: u16 = cursor.read()?;
        let mut pairs = Vec::new();
        let mut skipped_subtables = 0;
        for _ in 0..n_tables {
            let subtable_start = cursor.position()?;
            let _sub_version: u16 = cursor.read()?;
            let length: u16 = cursor.read()?;
            let coverage: u16 = cursor.read()?;
            let format = coverage >> COVERAGE_FORMAT_SHIFT;
            if format == 0 && coverage & COVERAGE_HORIZONTAL != 0 {
                let n_pairs: u16 = cursor.read()?;
                // searchRange, entrySelector, rangeShift
                cursor.advance_by(3 * 2);
                for _ in 0..n_pairs {
                    pairs.push(KernPair {
                        left: cursor.read()?,
                        right: cursor.read()?,
                        value: cursor.read()?,
                    });
                }
            } else {
                log::warn!("skipping kern subtable with format {format}");
                skipped_subtables += 1;
            }
            // the length field positions the next subtable regardless of
            // how much of this one we consumed
            let consumed = cursor.position()? - subtable_start;
            if (length as usize) < consumed {
                return Err(ReadError::MalformedData("kern subtable length too small"));
            }
            cursor.advance_by(length as usize - consumed);
        }
        Ok(Kern {
            pairs,
            skipped_subtables,
        })
    }
}

impl Kern {
    pub fn pairs(&self) -> &[KernPair] {
        &self.pairs
    }

    /// The kerning value for this pair, if one is present.
    pub fn value(&self, left: GlyphId16, right: GlyphId16) -> Option<FWord> {
        self.pairs
            .iter()
            .find(|pair| pair.left == left && pair.right == right)
            .map(|pair| pair.value)
    }
}
