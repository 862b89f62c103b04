//! The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table

use sfnt_types::{FWord, Fixed, Tag, UfWord};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The horizontal header table.
#[derive(Debug, Clone, PartialEq)]
pub struct Hhea {
    pub version: Fixed,
    pub ascender: FWord,
    pub descender: FWord,
    pub line_gap: FWord,
    pub advance_width_max: UfWord,
    pub min_left_side_bearing: FWord,
    pub min_right_side_bearing: FWord,
    pub x_max_extent: FWord,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub metric_data_format: i16,
    /// The number of entries in the hmtx advance array.
    pub number_of_h_metrics: u16,
}

impl TopLevelTable for Hhea {
    const TAG: Tag = Tag::new(b"hhea");
}

impl<'a> FontRead<'a> for Hhea {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let ascender = cursor.read()?;
        let descender = cursor.read()?;
        let line_gap = cursor.read()?;
        let advance_width_max = cursor.read()?;
        let min_left_side_bearing = cursor.read()?;
        let min_right_side_bearing = cursor.read()?;
        let x_max_extent = cursor.read()?;
        let caret_slope_rise = cursor.read()?;
        let caret_slope_run = cursor.read()?;
        let caret_offset = cursor.read()?;
        // four reserved fields
        cursor.advance_by(4 * 2);
        let metric_data_format = cursor.read()?;
        let number_of_h_metrics = cursor.read()?;
        Ok(Hhea {
            version,
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format,
            number_of_h_metrics,
        })
    }
}
