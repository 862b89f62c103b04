//! Writing the glyf and loca tables

use read_sfnt::tables::glyf::{
    Anchor, Bbox, CompositeGlyph, CompositeGlyphFlags, CurvePoint, Glyph, SimpleGlyph,
    SimpleGlyphFlags,
};
use sfnt_types::Tag;

use crate::validate::{Validate, ValidationCtx};
use crate::write::{FontWrite, TableWriter};

/// Which flavor of offsets the loca table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaFormat {
    Short = 0,
    Long = 1,
}

/// Builds the glyf table and its loca index together.
///
/// Glyphs must be added in glyph id order. An empty glyph costs no glyf
/// bytes at all, only a repeated loca offset.
#[derive(Debug, Clone, Default)]
pub struct GlyfLocaBuilder {
    glyf: Vec<u8>,
    offsets: Vec<u32>,
}

impl GlyfLocaBuilder {
    pub fn new() -> Self {
        GlyfLocaBuilder {
            glyf: Vec::new(),
            offsets: vec![0],
        }
    }

    pub fn add_glyph(&mut self, glyph: &Glyph) -> &mut Self {
        let mut writer = TableWriter::default();
        glyph.write_into(&mut writer);
        // loca offsets in the short format are halved, so keep every
        // glyph two byte aligned
        writer.pad_to_2byte_aligned();
        self.glyf.extend_from_slice(&writer.into_data());
        self.offsets.push(self.glyf.len() as u32);
        self
    }

    /// Add a glyph with no outline, like a space.
    pub fn add_empty_glyph(&mut self) -> &mut Self {
        self.offsets.push(self.glyf.len() as u32);
        self
    }

    /// Serialize both tables, choosing the smallest valid loca format.
    pub fn build(self) -> (Vec<u8>, Vec<u8>, LocaFormat) {
        let format = if self.glyf.len() < 0x20000 {
            LocaFormat::Short
        } else {
            LocaFormat::Long
        };
        let mut loca = TableWriter::default();
        match format {
            LocaFormat::Short => {
                for offset in &self.offsets {
                    ((offset / 2) as u16).write_into(&mut loca);
                }
            }
            LocaFormat::Long => {
                for offset in &self.offsets {
                    offset.write_into(&mut loca);
                }
            }
        }
        loca.pad_to_4byte_aligned();
        let mut glyf = self.glyf;
        while glyf.len() % 4 != 0 {
            glyf.push(0);
        }
        (glyf, loca.into_data(), format)
    }
}

impl FontWrite for Glyph {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            Glyph::Simple(simple) => simple.write_into(writer),
            Glyph::Composite(composite) => composite.write_into(writer),
        }
    }
}

impl Validate for Glyph {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        match self {
            Glyph::Simple(simple) => simple.validate_impl(ctx),
            Glyph::Composite(composite) => composite.validate_impl(ctx),
        }
    }
}

impl Validate for SimpleGlyph {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table(Tag::new(b"glyf"), |ctx| {
            if self.contours.len() > i16::MAX as usize {
                ctx.in_field("contours", |ctx| ctx.report("count exceeds i16::MAX"));
            }
            let points: usize = self.contours.iter().map(Vec::len).sum();
            ctx.check_u16_len("points", points);
            ctx.check_u16_len("instructions", self.instructions.len());
        });
    }
}

impl Validate for CompositeGlyph {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table(Tag::new(b"glyf"), |ctx| {
            if self.components.is_empty() {
                ctx.in_field("components", |ctx| ctx.report("must not be empty"));
            }
            ctx.check_u16_len("instructions", self.instructions.len());
        });
    }
}

/// The bounding box of a set of contours.
pub fn bbox_of(contours: &[Vec<CurvePoint>]) -> Bbox {
    let mut points = contours.iter().flatten();
    let Some(first) = points.next() else {
        return Bbox::default();
    };
    let mut bbox = Bbox {
        x_min: first.x,
        y_min: first.y,
        x_max: first.x,
        y_max: first.y,
    };
    for point in points {
        bbox.x_min = bbox.x_min.min(point.x);
        bbox.y_min = bbox.y_min.min(point.y);
        bbox.x_max = bbox.x_max.max(point.x);
        bbox.y_max = bbox.y_max.max(point.y);
    }
    bbox
}

impl FontWrite for SimpleGlyph {
    fn write_into(&self, writer: &mut TableWriter) {
        let bbox = bbox_of(&self.contours);
        (self.contours.len() as i16).write_into(writer);
        bbox.x_min.write_into(writer);
        bbox.y_min.write_into(writer);
        bbox.x_max.write_into(writer);
        bbox.y_max.write_into(writer);
        let mut end = 0u16;
        for contour in &self.contours {
            end += contour.len() as u16;
            (end - 1).write_into(writer);
        }
        (self.instructions.len() as u16).write_into(writer);
        writer.write_slice(&self.instructions);

        let (flags, x_deltas, y_deltas) = encode_points(&self.contours);
        writer.write_slice(&flags);
        writer.write_slice(&x_deltas);
        writer.write_slice(&y_deltas);
    }
}

// per-point flags plus packed delta bytes, with repeat runs applied
fn encode_points(contours: &[Vec<CurvePoint>]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut flags: Vec<SimpleGlyphFlags> = Vec::new();
    let mut x_deltas = Vec::new();
    let mut y_deltas = Vec::new();
    let mut last = CurvePoint::on_curve(0, 0);
    for point in contours.iter().flatten() {
        let mut flag = SimpleGlyphFlags::empty();
        if point.on_curve {
            flag |= SimpleGlyphFlags::ON_CURVE_POINT;
        }
        encode_delta(
            point.x.wrapping_sub(last.x),
            &mut flag,
            SimpleGlyphFlags::X_SHORT_VECTOR,
            SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
            &mut x_deltas,
        );
        encode_delta(
            point.y.wrapping_sub(last.y),
            &mut flag,
            SimpleGlyphFlags::Y_SHORT_VECTOR,
            SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
            &mut y_deltas,
        );
        flags.push(flag);
        last = *point;
    }

    let mut packed_flags = Vec::with_capacity(flags.len());
    let mut iter = flags.iter().peekable();
    while let Some(flag) = iter.next() {
        let mut repeats = 0u8;
        while repeats < u8::MAX && iter.peek() == Some(&flag) {
            iter.next();
            repeats += 1;
        }
        if repeats > 0 {
            packed_flags.push((*flag | SimpleGlyphFlags::REPEAT_FLAG).bits());
            packed_flags.push(repeats);
        } else {
            packed_flags.push(flag.bits());
        }
    }
    (packed_flags, x_deltas, y_deltas)
}

fn encode_delta(
    delta: i16,
    flag: &mut SimpleGlyphFlags,
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
    out: &mut Vec<u8>,
) {
    if delta == 0 {
        *flag |= same_or_positive;
    } else if (-255..=255).contains(&delta) {
        *flag |= short;
        if delta > 0 {
            *flag |= same_or_positive;
        }
        out.push(delta.unsigned_abs() as u8);
    } else {
        out.extend_from_slice(&delta.to_be_bytes());
    }
}

/// Remove on-curve points that sit exactly midway between two off-curve
/// neighbors; the format implies them.
pub fn drop_implied_oncurve(contour: &[CurvePoint]) -> Vec<CurvePoint> {
    if contour.len() < 3 {
        return contour.to_vec();
    }
    let n = contour.len();
    (0..n)
        .filter(|i| {
            let point = &contour[*i];
            if !point.on_curve {
                return true;
            }
            let prev = &contour[(*i + n - 1) % n];
            let next = &contour[(*i + 1) % n];
            let implied = !prev.on_curve
                && !next.on_curve
                && prev.x as i32 + next.x as i32 == point.x as i32 * 2
                && prev.y as i32 + next.y as i32 == point.y as i32 * 2;
            !implied
        })
        .map(|i| contour[i])
        .collect()
}

impl FontWrite for CompositeGlyph {
    fn write_into(&self, writer: &mut TableWriter) {
        (-1i16).write_into(writer);
        self.bbox.x_min.write_into(writer);
        self.bbox.y_min.write_into(writer);
        self.bbox.x_max.write_into(writer);
        self.bbox.y_max.write_into(writer);
        let last = self.components.len().saturating_sub(1);
        for (i, component) in self.components.iter().enumerate() {
            let mut flags = component.flags
                & (CompositeGlyphFlags::ROUND_XY_TO_GRID
                    | CompositeGlyphFlags::USE_MY_METRICS
                    | CompositeGlyphFlags::OVERLAP_COMPOUND
                    | CompositeGlyphFlags::SCALED_COMPONENT_OFFSET
                    | CompositeGlyphFlags::UNSCALED_COMPONENT_OFFSET);
            if i != last {
                flags |= CompositeGlyphFlags::MORE_COMPONENTS;
            }
            let words = match component.anchor {
                Anchor::Offset { x, y } => {
                    flags |= CompositeGlyphFlags::ARGS_ARE_XY_VALUES;
                    !(-128..=127).contains(&x) || !(-128..=127).contains(&y)
                }
                Anchor::Point { base, component } => base > 255 || component > 255,
            };
            if words {
                flags |= CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS;
            }
            let transform = &component.transform;
            let identity = *transform == Default::default();
            if !identity {
                if transform.yx.to_bits() != 0 || transform.xy.to_bits() != 0 {
                    flags |= CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO;
                } else if transform.xx == transform.yy {
                    flags |= CompositeGlyphFlags::WE_HAVE_A_SCALE;
                } else {
                    flags |= CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE;
                }
            }
            flags.bits().write_into(writer);
            component.glyph.write_into(writer);
            match component.anchor {
                Anchor::Offset { x, y } if words => {
                    x.write_into(writer);
                    y.write_into(writer);
                }
                Anchor::Offset { x, y } => {
                    (x as i8).write_into(writer);
                    (y as i8).write_into(writer);
                }
                Anchor::Point { base, component } if words => {
                    base.write_into(writer);
                    component.write_into(writer);
                }
                Anchor::Point { base, component } => {
                    (base as u8).write_into(writer);
                    (component as u8).write_into(writer);
                }
            }
            if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
                transform.xx.write_into(writer);
                transform.yx.write_into(writer);
                transform.xy.write_into(writer);
                transform.yy.write_into(writer);
            } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
                transform.xx.write_into(writer);
                transform.yy.write_into(writer);
            } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
                transform.xx.write_into(writer);
            }
        }
    }
}
