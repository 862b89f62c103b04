//! Writing the maxp table

use read_sfnt::tables::maxp::Maxp;
use sfnt_types::Tag;

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

impl FontWrite for Maxp {
    fn write_into(&self, writer: &mut TableWriter) {
        let version = if self.v1.is_some() {
            Maxp::VERSION_1_0
        } else {
            Maxp::VERSION_0_5
        };
        version.write_into(writer);
        self.num_glyphs.write_into(writer);
        if let Some(v1) = &self.v1 {
            v1.max_points.write_into(writer);
            v1.max_contours.write_into(writer);
            v1.max_composite_points.write_into(writer);
            v1.max_composite_contours.write_into(writer);
            v1.max_zones.write_into(writer);
            v1.max_twilight_points.write_into(writer);
            v1.max_storage.write_into(writer);
            v1.max_function_defs.write_into(writer);
            v1.max_instruction_defs.write_into(writer);
            v1.max_stack_elements.write_into(writer);
            v1.max_size_of_instructions.write_into(writer);
            v1.max_component_elements.write_into(writer);
            v1.max_component_depth.write_into(writer);
        }
        writer.pad_to_4byte_aligned();
    }
}

impl Validate for Maxp {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table(Tag::new(b"maxp"), |ctx| {
            let expected = if self.v1.is_some() {
                Maxp::VERSION_1_0
            } else {
                Maxp::VERSION_0_5
            };
            if self.version != expected {
                ctx.in_field("version", |ctx| {
                    ctx.report("disagrees with the presence of version 1.0 fields")
                });
            }
        });
    }
}
