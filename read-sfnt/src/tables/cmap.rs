//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use sfnt_types::{GlyphId16, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// A platform/encoding pair and its decoded subtable.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub subtable: CmapSubtable,
}

/// A character map subtable.
#[derive(Debug, Clone, PartialEq)]
pub enum CmapSubtable {
    Format0(Format0),
    Format4(Format4),
    /// A format we recognize but do not decode. The caller should continue
    /// with another subtable if one is available.
    Unsupported(u16),
}

/// A byte encoding subtable: 256 glyph ids indexed by byte value.
#[derive(Debug, Clone, PartialEq)]
pub struct Format0 {
    glyph_ids: Vec<u8>,
}

/// A segment mapping subtable covering the basic multilingual plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Format4 {
    end_codes: Vec<u16>,
    start_codes: Vec<u16>,
    id_deltas: Vec<i16>,
    id_range_offsets: Vec<u16>,
    glyph_id_array: Vec<u16>,
}

/// The character to glyph index mapping table.
#[derive(Debug, Clone, PartialEq)]
pub struct Cmap {
    records: Vec<EncodingRecord>,
}

impl TopLevelTable for Cmap {
    const TAG: Tag = Tag::new(b"cmap");
}

impl<'a> FontRead<'a> for Cmap {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _version: u16 = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let mut records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let platform_id: u16 = cursor.read()?;
            let encoding_id: u16 = cursor.read()?;
            let offset: u32 = cursor.read()?;
            let sub_data = data
                .split_off(offset as usize)
                .ok_or(ReadError::OutOfBounds)?;
            let subtable = CmapSubtable::read(sub_data)?;
            if let CmapSubtable::Unsupported(format) = subtable {
                log::warn!("cmap subtable with unsupported format {format}");
            }
            records.push(EncodingRecord {
                platform_id,
                encoding_id,
                subtable,
            });
        }
        Ok(Cmap { records })
    }
}

impl Cmap {
    pub fn records(&self) -> &[EncodingRecord] {
        &self.records
    }

    /// The subtable to use for codepoint lookups.
    ///
    /// Windows Unicode BMP is preferred, then any Unicode platform
    /// subtable, then whatever decodable subtable is left.
    pub fn best_subtable(&self) -> Option<&CmapSubtable> {
        let decodable = || {
            self.records
                .iter()
                .filter(|rec| !matches!(rec.subtable, CmapSubtable::Unsupported(_)))
        };
        decodable()
            .find(|rec| rec.platform_id == 3 && rec.encoding_id == 1)
            .or_else(|| decodable().find(|rec| rec.platform_id == 0))
            .or_else(|| decodable().next())
            .map(|rec| &rec.subtable)
    }

    /// `true` if any subtable could not be decoded.
    pub fn has_unsupported_subtables(&self) -> bool {
        self.records
            .iter()
            .any(|rec| matches!(rec.subtable, CmapSubtable::Unsupported(_)))
    }

    pub fn map_codepoint(&self, codepoint: char) -> Option<GlyphId16> {
        self.best_subtable()?.map_codepoint(codepoint)
    }

    /// All codepoint to glyph assignments in the preferred subtable,
    /// in codepoint order.
    pub fn mappings(&self) -> Vec<(char, GlyphId16)> {
        self.best_subtable()
            .map(|sub| sub.mappings())
            .unwrap_or_default()
    }
}

impl CmapSubtable {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            0 => Format0::read(data).map(CmapSubtable::Format0),
            4 => Format4::read(data).map(CmapSubtable::Format4),
            _ => Ok(CmapSubtable::Unsupported(format)),
        }
    }

    pub fn map_codepoint(&self, codepoint: char) -> Option<GlyphId16> {
        match self {
            CmapSubtable::Format0(sub) => sub.map_codepoint(codepoint),
            CmapSubtable::Format4(sub) => sub.map_codepoint(codepoint),
            CmapSubtable::Unsupported(_) => None,
        }
    }

    pub fn mappings(&self) -> Vec<(char, GlyphId16)> {
        match self {
            CmapSubtable::Format0(sub) => sub.mappings(),
            CmapSubtable::Format4(sub) => sub.mappings(),
            CmapSubtable::Unsupported(_) => Vec::new(),
        }
    }
}

impl Format0 {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let _length: u16 = cursor.read()?;
        let _language: u16 = cursor.read()?;
        let glyph_ids = cursor.read_bytes(256)?.to_vec();
        Ok(Format0 { glyph_ids })
    }

    pub fn map_codepoint(&self, codepoint: char) -> Option<GlyphId16> {
        let gid = *self.glyph_ids.get(codepoint as usize)?;
        (gid != 0).then(|| GlyphId16::new(gid as u16))
    }

    pub fn mappings(&self) -> Vec<(char, GlyphId16)> {
        self.glyph_ids
            .iter()
            .enumerate()
            .filter(|(_, gid)| **gid != 0)
            .map(|(cp, gid)| (cp as u8 as char, GlyphId16::new(*gid as u16)))
            .collect()
    }
}

impl Format4 {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let length: u16 = cursor.read()?;
        let _language: u16 = cursor.read()?;
        let seg_count_x2: u16 = cursor.read()?;
        if seg_count_x2 == 0 || seg_count_x2 % 2 != 0 {
            return Err(ReadError::MalformedData("bad segCountX2 in cmap format 4"));
        }
        let seg_count = (seg_count_x2 / 2) as usize;
        // searchRange, entrySelector, rangeShift
        cursor.advance_by(3 * 2);
        let end_codes = cursor.read_array::<u16>(seg_count)?;
        let _reserved: u16 = cursor.read()?;
        let start_codes = cursor.read_array::<u16>(seg_count)?;
        let id_deltas = cursor.read_array::<i16>(seg_count)?;
        let id_range_offsets = cursor.read_array::<u16>(seg_count)?;
        // everything between here and the table's stated length is the
        // glyph id array, shared by the range offsets
        let array_bytes = (length as usize)
            .checked_sub(cursor.position()?)
            .ok_or(ReadError::MalformedData("cmap format 4 length too small"))?;
        let glyph_id_array = cursor.read_array::<u16>(array_bytes / 2)?;
        if end_codes.last() != Some(&0xFFFF) {
            return Err(ReadError::MalformedData(
                "cmap format 4 must end with a 0xFFFF segment",
            ));
        }
        for (start, end) in start_codes.iter().zip(&end_codes) {
            if start > end {
                return Err(ReadError::MalformedData("cmap segment start after end"));
            }
        }
        Ok(Format4 {
            end_codes,
            start_codes,
            id_deltas,
            id_range_offsets,
            glyph_id_array,
        })
    }

    fn lookup(&self, codepoint: u16) -> Option<GlyphId16> {
        let seg = self.end_codes.partition_point(|end| *end < codepoint);
        let start = *self.start_codes.get(seg)?;
        if codepoint < start {
            return None;
        }
        let delta = self.id_deltas[seg];
        let range_offset = self.id_range_offsets[seg];
        let gid = if range_offset == 0 {
            (codepoint as i32 + delta as i32) as u16
        } else {
            // the stored offset is relative to the idRangeOffset entry
            // itself; rebase it onto the glyph id array
            let seg_count = self.id_range_offsets.len();
            let idx = (range_offset as usize / 2 + (codepoint - start) as usize)
                .checked_sub(seg_count - seg)?;
            let raw = *self.glyph_id_array.get(idx)?;
            if raw == 0 {
                return None;
            }
            (raw as i32 + delta as i32) as u16
        };
        (gid != 0).then(|| GlyphId16::new(gid))
    }

    pub fn map_codepoint(&self, codepoint: char) -> Option<GlyphId16> {
        let codepoint: u16 = u32::from(codepoint).try_into().ok()?;
        self.lookup(codepoint)
    }

    pub fn mappings(&self) -> Vec<(char, GlyphId16)> {
        let mut out = Vec::new();
        for (seg, (start, end)) in self.start_codes.iter().zip(&self.end_codes).enumerate() {
            for codepoint in *start..=*end {
                if codepoint == 0xFFFF && seg == self.start_codes.len() - 1 {
                    continue;
                }
                if let (Some(gid), Some(c)) =
                    (self.lookup(codepoint), char::from_u32(codepoint as u32))
                {
                    out.push((c, gid));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // A,B,C mapped to gids 1,2,3 via idDelta; 0x64 mapped through the
    // glyph id array.
    fn format4_bytes() -> Vec<u8> {
        let segments: [(u16, u16, i16, u16); 3] = [
            (0x41, 0x43, -0x40, 0),
            // idRangeOffset 4: two u16s ahead of this entry (the final
            // segment's entry, then the first array element)
            (0x64, 0x64, 0, 4),
            (0xFFFF, 0xFFFF, 1, 0),
        ];
        let glyph_id_array: [u16; 1] = [9];
        let seg_count = segments.len();
        let length = 16 + seg_count * 8 + glyph_id_array.len() * 2;
        let mut out = Vec::new();
        out.extend_from_slice(&4u16.to_be_bytes());
        out.extend_from_slice(&(length as u16).to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // language
        out.extend_from_slice(&((seg_count * 2) as u16).to_be_bytes());
        out.extend_from_slice(&[0u8; 6]); // search fields
        for (_, end, _, _) in &segments {
            out.extend_from_slice(&end.to_be_bytes());
        }
        out.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
        for (start, _, _, _) in &segments {
            out.extend_from_slice(&start.to_be_bytes());
        }
        for (_, _, delta, _) in &segments {
            out.extend_from_slice(&delta.to_be_bytes());
        }
        for (_, _, _, offset) in &segments {
            out.extend_from_slice(&offset.to_be_bytes());
        }
        for gid in &glyph_id_array {
            out.extend_from_slice(&gid.to_be_bytes());
        }
        out
    }

    fn cmap_with_format4() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&3u16.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&12u32.to_be_bytes());
        out.extend_from_slice(&format4_bytes());
        out
    }

    #[test]
    fn format4_delta_segments() {
        let cmap = Cmap::read(FontData::new(&cmap_with_format4())).unwrap();
        assert_eq!(cmap.map_codepoint('A'), Some(GlyphId16::new(1)));
        assert_eq!(cmap.map_codepoint('B'), Some(GlyphId16::new(2)));
        assert_eq!(cmap.map_codepoint('C'), Some(GlyphId16::new(3)));
        assert_eq!(cmap.map_codepoint('D'), None);
        assert_eq!(cmap.map_codepoint('@'), None);
    }

    #[test]
    fn format4_range_offset_segment() {
        let cmap = Cmap::read(FontData::new(&cmap_with_format4())).unwrap();
        assert_eq!(cmap.map_codepoint('d'), Some(GlyphId16::new(9)));
    }

    #[test]
    fn mappings_are_complete_and_ordered() {
        let cmap = Cmap::read(FontData::new(&cmap_with_format4())).unwrap();
        assert_eq!(
            cmap.mappings(),
            vec![
                ('A', GlyphId16::new(1)),
                ('B', GlyphId16::new(2)),
                ('C', GlyphId16::new(3)),
                ('d', GlyphId16::new(9)),
            ]
        );
    }

    #[test]
    fn unsupported_format_survives() {
        let mut out = Vec::new();
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&3u16.to_be_bytes());
        out.extend_from_slice(&10u16.to_be_bytes());
        out.extend_from_slice(&12u32.to_be_bytes());
        out.extend_from_slice(&12u16.to_be_bytes()); // format 12
        out.extend_from_slice(&[0u8; 14]);
        let cmap = Cmap::read(FontData::new(&out)).unwrap();
        assert!(cmap.has_unsupported_subtables());
        assert!(cmap.best_subtable().is_none());
        assert!(cmap.mappings().is_empty());
    }

    #[test]
    fn format0_byte_mapping() {
        let mut sub = Vec::new();
        sub.extend_from_slice(&0u16.to_be_bytes());
        sub.extend_from_slice(&262u16.to_be_bytes());
        sub.extend_from_slice(&0u16.to_be_bytes());
        let mut glyph_ids = [0u8; 256];
        glyph_ids[b'A' as usize] = 7;
        sub.extend_from_slice(&glyph_ids);

        let mut out = Vec::new();
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&12u32.to_be_bytes());
        out.extend_from_slice(&sub);

        let cmap = Cmap::read(FontData::new(&out)).unwrap();
        assert_eq!(cmap.map_codepoint('A'), Some(GlyphId16::new(7)));
        assert_eq!(cmap.map_codepoint('B'), None);
    }
}
