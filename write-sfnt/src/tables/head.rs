//! Writing the head table

use read_sfnt::tables::head::Head;
use sfnt_types::Tag;

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

impl FontWrite for Head {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        self.font_revision.write_into(writer);
        // the adjustment is patched in once the whole file is assembled
        0u32.write_into(writer);
        Head::MAGIC.write_into(writer);
        self.flags.write_into(writer);
        self.units_per_em.write_into(writer);
        self.created.write_into(writer);
        self.modified.write_into(writer);
        self.x_min.write_into(writer);
        self.y_min.write_into(writer);
        self.x_max.write_into(writer);
        self.y_max.write_into(writer);
        self.mac_style.write_into(writer);
        self.lowest_rec_ppem.write_into(writer);
        self.font_direction_hint.write_into(writer);
        self.index_to_loc_format.write_into(writer);
        self.glyph_data_format.write_into(writer);
        writer.pad_to_4byte_aligned();
    }
}

impl Validate for Head {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table(Tag::new(b"head"), |ctx| {
            if self.units_per_em == 0 {
                ctx.in_field("units_per_em", |ctx| ctx.report("must be non-zero"));
            }
            if !(0..=1).contains(&self.index_to_loc_format) {
                ctx.in_field("index_to_loc_format", |ctx| ctx.report("must be 0 or 1"));
            }
        });
    }
}
