//! Writing the post table

use read_sfnt::tables::post::Post;
use sfnt_types::{Fixed, Tag};

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

impl FontWrite for Post {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        self.italic_angle.write_into(writer);
        self.underline_position.write_into(writer);
        self.underline_thickness.write_into(writer);
        self.is_fixed_pitch.write_into(writer);
        writer.write_slice(&[0u8; 16]); // memory usage fields
    }
}

impl Validate for Post {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table(Tag::new(b"post"), |ctx| {
            // only the header is serialized, so versions that carry glyph
            // names cannot be written faithfully
            if self.version == Fixed::from_f64(2.0) {
                ctx.in_field("version", |ctx| {
                    ctx.report("version 2.0 requires glyph names, which are not written")
                });
            }
        });
    }
}

/// A version 3.0 post table: header only, no glyph names.
pub fn version_3(underline_position: i16, underline_thickness: i16) -> Post {
    Post {
        version: Fixed::from_f64(3.0),
        italic_angle: Fixed::from_f64(0.0),
        underline_position,
        underline_thickness,
        is_fixed_pitch: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump_table;
    use pretty_assertions::assert_eq;
    use read_sfnt::{FontData, FontRead};

    #[test]
    fn roundtrip() {
        let post = version_3(-100, 50);
        let bytes = dump_table(&post).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(Post::read(FontData::new(&bytes)).unwrap(), post);
    }

    #[test]
    fn version_2_is_rejected() {
        let mut post = version_3(-100, 50);
        post.version = Fixed::from_f64(2.0);
        assert!(dump_table(&post).is_err());
    }
}
