//! Writing the cmap table

use sfnt_types::GlyphId16;

use crate::util::SearchRange;
use crate::write::{FontWrite, TableWriter};

/// A mapping the character map cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmapError {
    /// One codepoint was assigned to two different glyphs.
    Conflict(char),
    /// A codepoint outside the basic multilingual plane.
    OutOfRange(char),
}

impl std::fmt::Display for CmapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmapError::Conflict(c) => {
                write!(f, "codepoint U+{:04X} is mapped to two glyphs", *c as u32)
            }
            CmapError::OutOfRange(c) => write!(
                f,
                "codepoint U+{:04X} is outside the basic multilingual plane",
                *c as u32
            ),
        }
    }
}

impl std::error::Error for CmapError {}

/// Builds a cmap with a single format 4 subtable.
///
/// The subtable is written once and referenced from both the Unicode BMP
/// and Windows Unicode BMP encoding records.
#[derive(Debug, Clone, Default)]
pub struct CmapBuilder {
    mappings: Vec<(char, GlyphId16)>,
}

// a codepoint and glyph run that one delta segment can express
struct Segment {
    start: u16,
    end: u16,
    delta: i16,
}

impl CmapBuilder {
    pub fn new(mappings: Vec<(char, GlyphId16)>) -> Self {
        CmapBuilder { mappings }
    }

    pub fn map(&mut self, codepoint: char, glyph: GlyphId16) {
        self.mappings.push((codepoint, glyph));
    }

    pub fn build(&self) -> Result<Vec<u8>, CmapError> {
        let segments = self.segments()?;
        let subtable = write_format_4(&segments);

        let mut writer = TableWriter::default();
        0u16.write_into(&mut writer); // version
        2u16.write_into(&mut writer); // numTables
        let subtable_offset = (4 + 2 * 8) as u32;
        for (platform_id, encoding_id) in [(0u16, 3u16), (3, 1)] {
            platform_id.write_into(&mut writer);
            encoding_id.write_into(&mut writer);
            subtable_offset.write_into(&mut writer);
        }
        writer.write_slice(&subtable);
        writer.pad_to_4byte_aligned();
        Ok(writer.into_data())
    }

    /// Merge sorted mappings into delta segments.
    ///
    /// A run of consecutive codepoints mapped to consecutive glyph ids
    /// shares one segment; the final 0xFFFF segment is appended.
    fn segments(&self) -> Result<Vec<Segment>, CmapError> {
        let mut mappings = Vec::with_capacity(self.mappings.len());
        for (codepoint, glyph) in &self.mappings {
            let raw = u32::from(*codepoint);
            if raw >= 0xFFFF {
                return Err(CmapError::OutOfRange(*codepoint));
            }
            mappings.push((raw as u16, *glyph));
        }
        mappings.sort();
        let conflict = mappings
            .windows(2)
            .find(|pair| pair[0].0 == pair[1].0 && pair[0].1 != pair[1].1);
        if let Some(pair) = conflict {
            // the u16 came from a char, so this roundtrip cannot fail
            let c = char::from_u32(pair[0].0 as u32).unwrap();
            return Err(CmapError::Conflict(c));
        }
        mappings.dedup();

        let mut segments: Vec<Segment> = Vec::new();
        for (codepoint, glyph) in mappings {
            let gid = glyph.to_u16();
            match segments.last_mut() {
                Some(seg)
                    if codepoint == seg.end + 1
                        && gid as i32 == codepoint as i32 + seg.delta as i32 =>
                {
                    seg.end = codepoint;
                }
                _ => segments.push(Segment {
                    start: codepoint,
                    end: codepoint,
                    delta: (gid as i32 - codepoint as i32) as i16,
                }),
            }
        }
        segments.push(Segment {
            start: 0xFFFF,
            end: 0xFFFF,
            delta: 1,
        });
        Ok(segments)
    }
}

fn write_format_4(segments: &[Segment]) -> Vec<u8> {
    let seg_count = segments.len();
    let length = 16 + seg_count * 8;
    let mut writer = TableWriter::default();
    4u16.write_into(&mut writer); // format
    (length as u16).write_into(&mut writer);
    0u16.write_into(&mut writer); // language
    ((seg_count * 2) as u16).write_into(&mut writer);
    let search = SearchRange::compute(seg_count, 2);
    search.search_range.write_into(&mut writer);
    search.entry_selector.write_into(&mut writer);
    search.range_shift.write_into(&mut writer);
    for seg in segments {
        seg.end.write_into(&mut writer);
    }
    0u16.write_into(&mut writer); // reservedPad
    for seg in segments {
        seg.start.write_into(&mut writer);
    }
    for seg in segments {
        seg.delta.write_into(&mut writer);
    }
    for _ in segments {
        0u16.write_into(&mut writer); // no glyph id array is ever needed
    }
    writer.into_data()
}

impl FontWrite for CmapBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        // a failed build means the mappings were not validated first
        match self.build() {
            Ok(data) => writer.write_slice(&data),
            Err(err) => log::error!("dropping unbuildable cmap: {err}"),
        }
    }
}
