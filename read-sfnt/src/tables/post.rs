//! The [post](https://docs.microsoft.com/en-us/typography/opentype/spec/post) table

use sfnt_types::{Fixed, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The PostScript table.
///
/// We only read the header fields; glyph name data (version 2.0) is not
/// decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub version: Fixed,
    pub italic_angle: Fixed,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
}

impl TopLevelTable for Post {
    const TAG: Tag = Tag::new(b"post");
}

impl<'a> FontRead<'a> for Post {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(Post {
            version: cursor.read()?,
            italic_angle: cursor.read()?,
            underline_position: cursor.read()?,
            underline_thickness: cursor.read()?,
            is_fixed_pitch: cursor.read()?,
        })
    }
}
