//! Writing the hhea table

use read_sfnt::tables::hhea::Hhea;
use sfnt_types::Tag;

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

impl FontWrite for Hhea {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        self.ascender.write_into(writer);
        self.descender.write_into(writer);
        self.line_gap.write_into(writer);
        self.advance_width_max.write_into(writer);
        self.min_left_side_bearing.write_into(writer);
        self.min_right_side_bearing.write_into(writer);
        self.x_max_extent.write_into(writer);
        self.caret_slope_rise.write_into(writer);
        self.caret_slope_run.write_into(writer);
        self.caret_offset.write_into(writer);
        writer.write_slice(&[0u8; 8]); // reserved
        self.metric_data_format.write_into(writer);
        self.number_of_h_metrics.write_into(writer);
    }
}

impl Validate for Hhea {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table(Tag::new(b"hhea"), |ctx| {
            if self.metric_data_format != 0 {
                ctx.in_field("metric_data_format", |ctx| ctx.report("must be 0"));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::dump_table;
    use pretty_assertions::assert_eq;
    use read_sfnt::tables::hhea::Hhea;
    use read_sfnt::{FontData, FontRead};
    use sfnt_types::{FWord, Fixed, UfWord};

    #[test]
    fn roundtrip() {
        let hhea = Hhea {
            version: Fixed::from_f64(1.0),
            ascender: FWord::new(800),
            descender: FWord::new(-200),
            line_gap: FWord::new(90),
            advance_width_max: UfWord::new(1100),
            min_left_side_bearing: FWord::new(-5),
            min_right_side_bearing: FWord::new(-8),
            x_max_extent: FWord::new(1105),
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            metric_data_format: 0,
            number_of_h_metrics: 12,
        };
        let bytes = dump_table(&hhea).unwrap();
        assert_eq!(bytes.len(), 36);
        assert_eq!(Hhea::read(FontData::new(&bytes)).unwrap(), hhea);
    }
}
