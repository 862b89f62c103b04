//! The editable font model

use kurbo::{Affine, BezPath, PathEl, Point};
use sfnt_types::LongDateTime;

/// A cubic segment of a closed contour, ending at an on-curve point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Point),
    Curve(Point, Point, Point),
}

/// A closed outline contour.
///
/// The contour runs from `start` through each segment's endpoint and is
/// implicitly closed back to `start`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub start: Point,
    pub segments: Vec<Segment>,
}

impl Contour {
    pub fn new(start: impl Into<Point>) -> Self {
        Contour {
            start: start.into(),
            segments: Vec::new(),
        }
    }

    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.segments.push(Segment::Line(p.into()));
        self
    }

    pub fn curve_to(
        &mut self,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> &mut Self {
        self.segments
            .push(Segment::Curve(p1.into(), p2.into(), p3.into()));
        self
    }

    /// The last on-curve point, which the next segment starts from.
    pub fn current_point(&self) -> Point {
        match self.segments.last() {
            Some(Segment::Line(p)) | Some(Segment::Curve(_, _, p)) => *p,
            None => self.start,
        }
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        for segment in &self.segments {
            match segment {
                Segment::Line(p) => path.line_to(*p),
                Segment::Curve(p1, p2, p3) => path.curve_to(*p1, *p2, *p3),
            }
        }
        path.close_path();
        path
    }
}

/// A reference to another glyph's outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    /// Index of the referenced glyph in [`Font::glyphs`].
    pub glyph: usize,
    /// Linear part plus translation, in font units.
    pub transform: Affine,
}

/// A glyph's outline data.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Contours(Vec<Contour>),
    Components(Vec<Component>),
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        match self {
            Outline::Contours(contours) => contours.is_empty(),
            Outline::Components(components) => components.is_empty(),
        }
    }
}

/// A single glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub name: String,
    /// The codepoints the character map assigns to this glyph.
    pub codepoints: Vec<char>,
    pub advance_width: u16,
    pub outline: Outline,
}

impl Glyph {
    pub fn new(name: impl Into<String>, advance_width: u16) -> Self {
        Glyph {
            name: name.into(),
            codepoints: Vec::new(),
            advance_width,
            outline: Outline::Contours(Vec::new()),
        }
    }
}

/// A horizontal kerning adjustment between two glyphs, by glyph index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernPair {
    pub left: usize,
    pub right: usize,
    pub value: i16,
}

/// An editable font.
///
/// Glyph order is glyph id order: index 0 is conventionally `.notdef`.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub family_name: String,
    pub style_name: String,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    pub glyphs: Vec<Glyph>,
    pub kerning: Vec<KernPair>,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            line_gap: 0,
            family_name: "Untitled".into(),
            style_name: "Regular".into(),
            created: LongDateTime::default(),
            modified: LongDateTime::default(),
            glyphs: Vec::new(),
            kerning: Vec::new(),
        }
    }
}

impl Font {
    /// The glyph mapped to this codepoint, if any.
    pub fn glyph_for_codepoint(&self, codepoint: char) -> Option<&Glyph> {
        self.glyphs
            .iter()
            .find(|glyph| glyph.codepoints.contains(&codepoint))
    }

    /// All codepoint to glyph-index assignments, unsorted.
    pub fn codepoint_mappings(&self) -> Vec<(char, usize)> {
        let mut out = Vec::new();
        for (idx, glyph) in self.glyphs.iter().enumerate() {
            for codepoint in &glyph.codepoints {
                out.push((*codepoint, idx));
            }
        }
        out
    }

    pub fn elements_to_contours(path: &BezPath) -> Vec<Contour> {
        let mut contours = Vec::new();
        let mut current: Option<Contour> = None;
        for el in path.elements() {
            match el {
                PathEl::MoveTo(p) => {
                    if let Some(contour) = current.take() {
                        contours.push(contour);
                    }
                    current = Some(Contour::new(*p));
                }
                PathEl::LineTo(p) => {
                    if let Some(contour) = current.as_mut() {
                        contour.line_to(*p);
                    }
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    if let Some(contour) = current.as_mut() {
                        contour.curve_to(*p1, *p2, *p3);
                    }
                }
                PathEl::QuadTo(p1, p2) => {
                    if let Some(contour) = current.as_mut() {
                        let q = kurbo::QuadBez::new(contour.current_point(), *p1, *p2);
                        let c = crate::conv::quad_to_cubic(q);
                        contour.curve_to(c.p1, c.p2, c.p3);
                    }
                }
                PathEl::ClosePath => {
                    if let Some(contour) = current.take() {
                        contours.push(contour);
                    }
                }
            }
        }
        if let Some(contour) = current.take() {
            contours.push(contour);
        }
        contours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn contour_building() {
        let mut contour = Contour::new((0.0, 0.0));
        contour
            .line_to((100.0, 0.0))
            .curve_to((130.0, 0.0), (150.0, 20.0), (150.0, 50.0));
        assert_eq!(contour.current_point(), Point::new(150.0, 50.0));
        let path = contour.to_bez_path();
        assert_eq!(path.elements().len(), 4); // move, line, curve, close
    }

    #[test]
    fn bez_path_roundtrip() {
        let mut contour = Contour::new((10.0, 20.0));
        contour.line_to((100.0, 20.0)).line_to((100.0, 120.0));
        let contours = Font::elements_to_contours(&contour.to_bez_path());
        assert_eq!(contours, vec![contour]);
    }

    #[test]
    fn codepoint_lookup() {
        let mut font = Font::default();
        let mut a = Glyph::new("A", 600);
        a.codepoints.push('A');
        font.glyphs.push(Glyph::new(".notdef", 500));
        font.glyphs.push(a);
        assert_eq!(font.glyph_for_codepoint('A').unwrap().name, "A");
        assert!(font.glyph_for_codepoint('B').is_none());
        assert_eq!(font.codepoint_mappings(), vec![('A', 1)]);
    }
}
