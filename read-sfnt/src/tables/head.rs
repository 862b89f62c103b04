//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use sfnt_types::{Fixed, FWord, LongDateTime, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The font header table.
#[derive(Debug, Clone, PartialEq)]
pub struct Head {
    pub version: Fixed,
    pub font_revision: Fixed,
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    pub x_min: FWord,
    pub y_min: FWord,
    pub x_max: FWord,
    pub y_max: FWord,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl Head {
    pub const MAGIC: u32 = 0x5F0F3CF5;
}

impl TopLevelTable for Head {
    const TAG: Tag = Tag::new(b"head");
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let head = Head {
            version: cursor.read()?,
            font_revision: cursor.read()?,
            checksum_adjustment: cursor.read()?,
            magic_number: cursor.read()?,
            flags: cursor.read()?,
            units_per_em: cursor.read()?,
            created: cursor.read()?,
            modified: cursor.read()?,
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
            mac_style: cursor.read()?,
            lowest_rec_ppem: cursor.read()?,
            font_direction_hint: cursor.read()?,
            index_to_loc_format: cursor.read()?,
            glyph_data_format: cursor.read()?,
        };
        if head.magic_number != Self::MAGIC {
            return Err(ReadError::MalformedData("bad magic number in head"));
        }
        if head.units_per_em == 0 {
            return Err(ReadError::MalformedData("unitsPerEm must be non-zero"));
        }
        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn head_bytes() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // fontRevision
        out.extend_from_slice(&0u32.to_be_bytes()); // checksumAdjustment
        out.extend_from_slice(&Head::MAGIC.to_be_bytes());
        out.extend_from_slice(&0b11u16.to_be_bytes()); // flags
        out.extend_from_slice(&1000u16.to_be_bytes()); // unitsPerEm
        out.extend_from_slice(&0i64.to_be_bytes()); // created
        out.extend_from_slice(&0i64.to_be_bytes()); // modified
        for v in [-10i16, -200, 900, 800] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(&0u16.to_be_bytes()); // macStyle
        out.extend_from_slice(&8u16.to_be_bytes()); // lowestRecPPEM
        out.extend_from_slice(&2i16.to_be_bytes()); // fontDirectionHint
        out.extend_from_slice(&0i16.to_be_bytes()); // indexToLocFormat
        out.extend_from_slice(&0i16.to_be_bytes()); // glyphDataFormat
        out
    }

    #[test]
    fn parse_head() {
        let head = Head::read(FontData::new(&head_bytes())).unwrap();
        assert_eq!(head.units_per_em, 1000);
        assert_eq!(head.x_min, FWord::new(-10));
        assert_eq!(head.y_max, FWord::new(800));
        assert_eq!(head.index_to_loc_format, 0);
    }

    #[test]
    fn reject_bad_magic() {
        let mut bytes = head_bytes();
        bytes[12] = 0;
        assert!(matches!(
            Head::read(FontData::new(&bytes)),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn reject_zero_upem() {
        let mut bytes = head_bytes();
        bytes[18..20].copy_from_slice(&0u16.to_be_bytes());
        assert!(Head::read(FontData::new(&bytes)).is_err());
    }
}
