//! The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use sfnt_types::{FWord, GlyphId16, Tag, UfWord};

use crate::{FontData, ReadError, TopLevelTable};

/// An advance width and left side bearing for a single glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongMetric {
    pub advance: UfWord,
    pub side_bearing: FWord,
}

/// The horizontal metrics table.
///
/// Glyphs past `numberOfHMetrics` share the last stored advance and carry
/// only a side bearing; `metric` resolves that for the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Hmtx {
    h_metrics: Vec<LongMetric>,
    left_side_bearings: Vec<FWord>,
}

impl TopLevelTable for Hmtx {
    const TAG: Tag = Tag::new(b"hmtx");
}

impl Hmtx {
    /// Parse the table. Lengths come from hhea and maxp, not the data.
    pub fn read(
        data: FontData<'_>,
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> Result<Self, ReadError> {
        if number_of_h_metrics == 0 || number_of_h_metrics > num_glyphs {
            return Err(ReadError::MalformedData(
                "numberOfHMetrics must be in 1..=numGlyphs",
            ));
        }
        let mut cursor = data.cursor();
        let mut h_metrics = Vec::with_capacity(number_of_h_metrics as usize);
        for _ in 0..number_of_h_metrics {
            h_metrics.push(LongMetric {
                advance: cursor.read()?,
                side_bearing: cursor.read()?,
            });
        }
        let n_bearings = num_glyphs - number_of_h_metrics;
        let left_side_bearings = cursor.read_array(n_bearings as usize)?;
        Ok(Hmtx {
            h_metrics,
            left_side_bearings,
        })
    }

    /// The metrics for this glyph, or `None` if the id is out of range.
    pub fn metric(&self, gid: GlyphId16) -> Option<LongMetric> {
        let idx = gid.to_u16() as usize;
        if let Some(metric) = self.h_metrics.get(idx) {
            return Some(*metric);
        }
        let side_bearing = *self.left_side_bearings.get(idx - self.h_metrics.len())?;
        let advance = self.h_metrics.last()?.advance;
        Some(LongMetric {
            advance,
            side_bearing,
        })
    }

    pub fn advance(&self, gid: GlyphId16) -> Option<UfWord> {
        self.metric(gid).map(|m| m.advance)
    }
}
