//! The [glyf](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use bitflags::bitflags;
use sfnt_types::{F2Dot14, GlyphId16, Tag};

use crate::{Cursor, FontData, FontRead, ReadError, TopLevelTable};

bitflags! {
    /// Flags for a point in a simple glyph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SimpleGlyphFlags: u8 {
        const ON_CURVE_POINT = 0x01;
        const X_SHORT_VECTOR = 0x02;
        const Y_SHORT_VECTOR = 0x04;
        const REPEAT_FLAG = 0x08;
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 0x10;
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 0x20;
        const OVERLAP_SIMPLE = 0x40;
    }
}

bitflags! {
    /// Flags for a component of a composite glyph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CompositeGlyphFlags: u16 {
        const ARG_1_AND_2_ARE_WORDS = 0x0001;
        const ARGS_ARE_XY_VALUES = 0x0002;
        const ROUND_XY_TO_GRID = 0x0004;
        const WE_HAVE_A_SCALE = 0x0008;
        const MORE_COMPONENTS = 0x0020;
        const WE_HAVE_AN_X_AND_Y_SCALE = 0x0040;
        const WE_HAVE_A_TWO_BY_TWO = 0x0080;
        const WE_HAVE_INSTRUCTIONS = 0x0100;
        const USE_MY_METRICS = 0x0200;
        const OVERLAP_COMPOUND = 0x0400;
        const SCALED_COMPONENT_OFFSET = 0x0800;
        const UNSCALED_COMPONENT_OFFSET = 0x1000;
    }
}

/// A point in a TrueType outline, in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint {
    pub x: i16,
    pub y: i16,
    /// `false` for a quadratic control point.
    pub on_curve: bool,
}

impl CurvePoint {
    pub fn on_curve(x: i16, y: i16) -> Self {
        CurvePoint {
            x,
            y,
            on_curve: true,
        }
    }

    pub fn off_curve(x: i16, y: i16) -> Self {
        CurvePoint {
            x,
            y,
            on_curve: false,
        }
    }
}

/// The bounding box stored in a glyph header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bbox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// A glyph with its own outline data.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleGlyph {
    pub bbox: Bbox,
    /// Closed contours, each a ring of points.
    pub contours: Vec<Vec<CurvePoint>>,
    pub instructions: Vec<u8>,
}

/// How a component is positioned relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// An offset in font units.
    Offset { x: i16, y: i16 },
    /// Point matching: align point `component` in the child outline with
    /// point `base` in the outline assembled so far.
    Point { base: u16, component: u16 },
}

/// A 2x2 linear transform applied to a component outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub xx: F2Dot14,
    pub yx: F2Dot14,
    pub xy: F2Dot14,
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            xx: F2Dot14::UNIT,
            yx: F2Dot14::from_bits(0),
            xy: F2Dot14::from_bits(0),
            yy: F2Dot14::UNIT,
        }
    }
}

/// One component of a composite glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub glyph: GlyphId16,
    pub anchor: Anchor,
    pub transform: Transform,
    pub flags: CompositeGlyphFlags,
}

/// A glyph assembled from other glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeGlyph {
    pub bbox: Bbox,
    pub components: Vec<Component>,
    pub instructions: Vec<u8>,
}

/// A single parsed glyph.
#[derive(Debug, Clone, PartialEq)]
pub enum Glyph {
    Simple(SimpleGlyph),
    Composite(CompositeGlyph),
}

/// Marker for the glyf table; glyph data is located through loca.
pub struct Glyf;

impl TopLevelTable for Glyf {
    const TAG: Tag = Tag::new(b"glyf");
}

impl<'a> FontRead<'a> for Glyph {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let n_contours: i16 = cursor.read()?;
        let bbox = Bbox {
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
        };
        if n_contours >= 0 {
            read_simple_glyph(&mut cursor, bbox, n_contours as usize).map(Glyph::Simple)
        } else {
            read_composite_glyph(&mut cursor, bbox).map(Glyph::Composite)
        }
    }
}

fn read_simple_glyph(
    cursor: &mut Cursor<'_>,
    bbox: Bbox,
    n_contours: usize,
) -> Result<SimpleGlyph, ReadError> {
    let end_pts: Vec<u16> = cursor.read_array(n_contours)?;
    let instruction_len: u16 = cursor.read()?;
    let instructions = cursor.read_bytes(instruction_len as usize)?.to_vec();
    let n_points = match end_pts.last() {
        Some(last) => *last as usize + 1,
        None => {
            return Ok(SimpleGlyph {
                bbox,
                contours: Vec::new(),
                instructions,
            })
        }
    };
    for pair in end_pts.windows(2) {
        if pair[1] <= pair[0] {
            return Err(ReadError::MalformedData("endPtsOfContours must increase"));
        }
    }

    // flags, with repeat runs expanded
    let mut flags = Vec::with_capacity(n_points);
    while flags.len() < n_points {
        let flag = SimpleGlyphFlags::from_bits_truncate(cursor.read::<u8>()?);
        flags.push(flag);
        if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
            let count = cursor.read::<u8>()? as usize;
            if flags.len() + count > n_points {
                return Err(ReadError::MalformedData("flag repeat overruns point count"));
            }
            for _ in 0..count {
                flags.push(flag);
            }
        }
    }

    let xs = read_deltas(
        cursor,
        &flags,
        SimpleGlyphFlags::X_SHORT_VECTOR,
        SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
    )?;
    let ys = read_deltas(
        cursor,
        &flags,
        SimpleGlyphFlags::Y_SHORT_VECTOR,
        SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
    )?;

    let mut contours = Vec::with_capacity(n_contours);
    let mut start = 0usize;
    for end in &end_pts {
        let end = *end as usize + 1;
        let contour = (start..end)
            .map(|i| CurvePoint {
                x: xs[i],
                y: ys[i],
                on_curve: flags[i].contains(SimpleGlyphFlags::ON_CURVE_POINT),
            })
            .collect();
        contours.push(contour);
        start = end;
    }
    Ok(SimpleGlyph {
        bbox,
        contours,
        instructions,
    })
}

/// Decode one coordinate array, accumulating deltas to absolute values.
fn read_deltas(
    cursor: &mut Cursor<'_>,
    flags: &[SimpleGlyphFlags],
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<Vec<i16>, ReadError> {
    let mut out = Vec::with_capacity(flags.len());
    let mut value = 0i16;
    for flag in flags {
        let delta = if flag.contains(short) {
            let magnitude = cursor.read::<u8>()? as i16;
            if flag.contains(same_or_positive) {
                magnitude
            } else {
                -magnitude
            }
        } else if flag.contains(same_or_positive) {
            0
        } else {
            cursor.read::<i16>()?
        };
        value = value.wrapping_add(delta);
        out.push(value);
    }
    Ok(out)
}

fn read_composite_glyph(
    cursor: &mut Cursor<'_>,
    bbox: Bbox,
) -> Result<CompositeGlyph, ReadError> {
    let mut components = Vec::new();
    let mut have_instructions = false;
    loop {
        let flags = CompositeGlyphFlags::from_bits_truncate(cursor.read::<u16>()?);
        let glyph: GlyphId16 = cursor.read()?;
        let anchor = if flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES) {
            if flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS) {
                Anchor::Offset {
                    x: cursor.read()?,
                    y: cursor.read()?,
                }
            } else {
                Anchor::Offset {
                    x: cursor.read::<i8>()? as i16,
                    y: cursor.read::<i8>()? as i16,
                }
            }
        } else if flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS) {
            Anchor::Point {
                base: cursor.read()?,
                component: cursor.read()?,
            }
        } else {
            Anchor::Point {
                base: cursor.read::<u8>()? as u16,
                component: cursor.read::<u8>()? as u16,
            }
        };
        let mut transform = Transform::default();
        if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            let scale: F2Dot14 = cursor.read()?;
            transform.xx = scale;
            transform.yy = scale;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            transform.xx = cursor.read()?;
            transform.yy = cursor.read()?;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            transform.xx = cursor.read()?;
            transform.yx = cursor.read()?;
            transform.xy = cursor.read()?;
            transform.yy = cursor.read()?;
        }
        have_instructions |= flags.contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS);
        components.push(Component {
            glyph,
            anchor,
            transform,
            flags,
        });
        if !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
            break;
        }
    }
    let instructions = if have_instructions {
        let len: u16 = cursor.read()?;
        cursor.read_bytes(len as usize)?.to_vec()
    } else {
        Vec::new()
    };
    Ok(CompositeGlyph {
        bbox,
        components,
        instructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn simple_glyph_bytes() -> Vec<u8> {
        // a triangle with one off-curve point, exercising short and long
        // deltas and a repeat run
        let mut out = Vec::new();
        out.extend_from_slice(&1i16.to_be_bytes()); // numberOfContours
        for v in [0i16, 0, 700, 700] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(&2u16.to_be_bytes()); // endPtsOfContours[0]
        out.extend_from_slice(&0u16.to_be_bytes()); // instructionLength
        // flags: on-curve + x/y short positive, repeated once, then an
        // off-curve point with long deltas
        out.push(0x01 | 0x02 | 0x04 | 0x10 | 0x20 | 0x08);
        out.push(1); // repeat count
        out.push(0x00);
        // x deltas: 0, 250 (short), -100 (long)
        out.push(0);
        out.push(250);
        out.extend_from_slice(&(-100i16).to_be_bytes());
        // y deltas: 0, 0, 700 (long)
        out.push(0);
        out.push(0);
        out.extend_from_slice(&700i16.to_be_bytes());
        out
    }

    #[test]
    fn parse_simple() {
        let glyph = Glyph::read(FontData::new(&simple_glyph_bytes())).unwrap();
        let Glyph::Simple(simple) = glyph else {
            panic!("expected a simple glyph");
        };
        assert_eq!(simple.bbox.x_max, 700);
        assert_eq!(
            simple.contours,
            vec![vec![
                CurvePoint::on_curve(0, 0),
                CurvePoint::on_curve(250, 0),
                CurvePoint::off_curve(150, 700),
            ]]
        );
    }

    #[test]
    fn truncated_simple_is_an_error() {
        let bytes = simple_glyph_bytes();
        assert!(matches!(
            Glyph::read(FontData::new(&bytes[..bytes.len() - 2])),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn repeat_overrun_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i16.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.extend_from_slice(&1u16.to_be_bytes()); // two points
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.push(0x08); // repeat
        bytes.push(200); // far too many
        assert!(matches!(
            Glyph::read(FontData::new(&bytes)),
            Err(ReadError::MalformedData(_))
        ));
    }

    fn composite_glyph_bytes() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(-1i16).to_be_bytes());
        for v in [0i16, 0, 900, 900] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        // component 1: word xy offsets, more components
        let flags1 = 0x0001 | 0x0002 | 0x0020;
        out.extend_from_slice(&(flags1 as u16).to_be_bytes());
        out.extend_from_slice(&2u16.to_be_bytes()); // glyph id
        out.extend_from_slice(&300i16.to_be_bytes());
        out.extend_from_slice(&0i16.to_be_bytes());
        // component 2: byte xy offsets with a scale
        let flags2 = 0x0002 | 0x0008;
        out.extend_from_slice(&(flags2 as u16).to_be_bytes());
        out.extend_from_slice(&3u16.to_be_bytes());
        out.push(10);
        out.push(0);
        out.extend_from_slice(&0x2000u16.to_be_bytes()); // 0.5 in F2Dot14
        out
    }

    #[test]
    fn parse_composite() {
        let glyph = Glyph::read(FontData::new(&composite_glyph_bytes())).unwrap();
        let Glyph::Composite(composite) = glyph else {
            panic!("expected a composite glyph");
        };
        assert_eq!(composite.components.len(), 2);
        assert_eq!(composite.components[0].glyph, GlyphId16::new(2));
        assert_eq!(
            composite.components[0].anchor,
            Anchor::Offset { x: 300, y: 0 }
        );
        assert_eq!(composite.components[0].transform, Transform::default());
        assert_eq!(
            composite.components[1].anchor,
            Anchor::Offset { x: 10, y: 0 }
        );
        assert_eq!(
            composite.components[1].transform.xx,
            F2Dot14::from_f32(0.5)
        );
        assert_eq!(
            composite.components[1].transform.yy,
            F2Dot14::from_f32(0.5)
        );
    }
}
