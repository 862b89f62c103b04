//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use sfnt_types::{Fixed, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The maximum profile table.
///
/// Version 0.5 contains only the glyph count and is what CFF fonts carry;
/// version 1.0 adds the TrueType rasterizer maxima.
#[derive(Debug, Clone, PartialEq)]
pub struct Maxp {
    pub version: Fixed,
    pub num_glyphs: u16,
    pub v1: Option<MaxpV1>,
}

/// The version 1.0 fields of maxp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxpV1 {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

impl Maxp {
    pub const VERSION_0_5: Fixed = Fixed::from_bits(0x0000_5000);
    pub const VERSION_1_0: Fixed = Fixed::from_bits(0x0001_0000);
}

impl TopLevelTable for Maxp {
    const TAG: Tag = Tag::new(b"maxp");
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: Fixed = cursor.read()?;
        let num_glyphs = cursor.read()?;
        let v1 = if version == Self::VERSION_1_0 {
            Some(MaxpV1 {
                max_points: cursor.read()?,
                max_contours: cursor.read()?,
                max_composite_points: cursor.read()?,
                max_composite_contours: cursor.read()?,
                max_zones: cursor.read()?,
                max_twilight_points: cursor.read()?,
                max_storage: cursor.read()?,
                max_function_defs: cursor.read()?,
                max_instruction_defs: cursor.read()?,
                max_stack_elements: cursor.read()?,
                max_size_of_instructions: cursor.read()?,
                max_component_elements: cursor.read()?,
                max_component_depth: cursor.read()?,
            })
        } else if version == Self::VERSION_0_5 {
            None
        } else {
            return Err(ReadError::InvalidFormat(version.to_bits() as i64));
        };
        Ok(Maxp {
            version,
            num_glyphs,
            v1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn version_0_5() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0000_5000u32.to_be_bytes());
        bytes.extend_from_slice(&42u16.to_be_bytes());
        let maxp = Maxp::read(FontData::new(&bytes)).unwrap();
        assert_eq!(maxp.num_glyphs, 42);
        assert!(maxp.v1.is_none());
    }

    #[test]
    fn version_1_0() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        bytes.extend_from_slice(&7u16.to_be_bytes());
        for v in 1u16..=13 {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        let maxp = Maxp::read(FontData::new(&bytes)).unwrap();
        assert_eq!(maxp.num_glyphs, 7);
        let v1 = maxp.v1.unwrap();
        assert_eq!(v1.max_points, 1);
        assert_eq!(v1.max_component_depth, 13);
    }

    #[test]
    fn unknown_version() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0002_0000u32.to_be_bytes());
        bytes.extend_from_slice(&7u16.to_be_bytes());
        assert!(matches!(
            Maxp::read(FontData::new(&bytes)),
            Err(ReadError::InvalidFormat(_))
        ));
    }
}
