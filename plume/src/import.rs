//! Reading a binary font into the editable model

use kurbo::{Affine, Point, QuadBez};
use rayon::prelude::*;
use read_sfnt::tables::cff::{Cff, OutlineSink};
use read_sfnt::tables::cmap::Cmap;
use read_sfnt::tables::glyf::{Anchor, CurvePoint, Glyph as RawGlyph};
use read_sfnt::tables::head::Head;
use read_sfnt::tables::hhea::Hhea;
use read_sfnt::tables::hmtx::Hmtx;
use read_sfnt::tables::kern::Kern;
use read_sfnt::tables::loca::Loca;
use read_sfnt::tables::maxp::Maxp;
use read_sfnt::tables::name::{name_id, Name};
use read_sfnt::{FontData, FontRead, FontRef, TopLevelTable};
use sfnt_types::{GlyphId16, Tag};

use crate::conv::quad_to_cubic;
use crate::error::{ImportError, ImportWarning};
use crate::font::{Component, Contour, Font, Glyph, KernPair, Outline};

impl Font {
    /// Read a TrueType or OpenType font.
    ///
    /// Problems local to one table or glyph are reported as warnings and
    /// the affected data is dropped; only an unusable container or a
    /// missing required table is an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Font, Vec<ImportWarning>), ImportError> {
        let font = FontRef::from_bytes(bytes)?;
        let mut warnings = Vec::new();
        for mismatch in font.verify_checksums() {
            log::warn!(
                "table '{}' fails its checksum, continuing anyway",
                mismatch.tag
            );
            warnings.push(ImportWarning::ChecksumMismatch {
                tag: mismatch.tag,
                stored: mismatch.stored,
                computed: mismatch.computed,
            });
        }

        let head = read_required::<Head>(&font)?;
        let maxp = read_required::<Maxp>(&font)?;
        let hhea = read_required::<Hhea>(&font)?;
        let hmtx_data = font.expect_table_data(Hmtx::TAG)?;
        let hmtx = Hmtx::read(hmtx_data, hhea.number_of_h_metrics, maxp.num_glyphs)
            .map_err(|e| ImportError::in_table(Hmtx::TAG, e))?;

        let cmap = read_required::<Cmap>(&font)?;
        if cmap.has_unsupported_subtables() {
            for record in cmap.records() {
                if let read_sfnt::tables::cmap::CmapSubtable::Unsupported(format) =
                    record.subtable
                {
                    warnings.push(ImportWarning::UnsupportedSubformat {
                        tag: Cmap::TAG,
                        format: format as i64,
                    });
                }
            }
        }

        let num_glyphs = maxp.num_glyphs;
        log::debug!(
            "importing {num_glyphs} glyphs from a {} font",
            if font.table_directory().is_cff() {
                "CFF"
            } else {
                "TrueType"
            }
        );
        let mut outlines = if font.table_directory().is_cff() {
            let cff_data = font.expect_table_data(Cff::TAG)?;
            let cff = Cff::read(cff_data).map_err(|e| ImportError::in_table(Cff::TAG, e))?;
            decode_cff_glyphs(&cff, num_glyphs)
        } else {
            let loca_data = font.expect_table_data(Loca::TAG)?;
            let loca = Loca::read(loca_data, num_glyphs, head.index_to_loc_format == 1)
                .map_err(|e| ImportError::in_table(Loca::TAG, e))?;
            let glyf = font
                .expect_table_data(Tag::new(b"glyf"))?;
            decode_truetype_glyphs(&loca, glyf, num_glyphs)
        };
        warnings.append(&mut break_component_cycles(&mut outlines));

        let mut glyphs = Vec::with_capacity(num_glyphs as usize);
        for (gid, (outline, mut glyph_warnings)) in outlines.into_iter().enumerate() {
            warnings.append(&mut glyph_warnings);
            let advance = hmtx
                .advance(GlyphId16::new(gid as u16))
                .map(|adv| adv.to_u16())
                .unwrap_or_default();
            let name = if gid == 0 {
                ".notdef".to_string()
            } else {
                format!("glyph{gid}")
            };
            let mut glyph = Glyph::new(name, advance);
            glyph.outline = outline;
            glyphs.push(glyph);
        }

        for (codepoint, gid) in cmap.mappings() {
            match glyphs.get_mut(gid.to_u16() as usize) {
                Some(glyph) => glyph.codepoints.push(codepoint),
                None => warnings.push(ImportWarning::MalformedTable {
                    tag: Cmap::TAG,
                    detail: format!("maps U+{:04X} to nonexistent {gid}", codepoint as u32),
                }),
            }
        }

        let (family_name, style_name) = match read_optional::<Name>(&font, &mut warnings) {
            Some(name) => (
                name.string(name_id::FAMILY).unwrap_or("Untitled").to_string(),
                name.string(name_id::SUBFAMILY).unwrap_or("Regular").to_string(),
            ),
            None => ("Untitled".to_string(), "Regular".to_string()),
        };

        let mut kerning = Vec::new();
        if let Some(kern) = read_optional::<Kern>(&font, &mut warnings) {
            for _ in 0..kern.skipped_subtables {
                warnings.push(ImportWarning::UnsupportedSubformat {
                    tag: Kern::TAG,
                    format: -1,
                });
            }
            for pair in kern.pairs() {
                let left = pair.left.to_u16() as usize;
                let right = pair.right.to_u16() as usize;
                if left < glyphs.len() && right < glyphs.len() {
                    kerning.push(KernPair {
                        left,
                        right,
                        value: pair.value.to_i16(),
                    });
                }
            }
        }

        let font = Font {
            units_per_em: head.units_per_em,
            ascender: hhea.ascender.to_i16(),
            descender: hhea.descender.to_i16(),
            line_gap: hhea.line_gap.to_i16(),
            family_name,
            style_name,
            created: head.created,
            modified: head.modified,
            glyphs,
            kerning,
        };
        Ok((font, warnings))
    }
}

fn read_required<'a, T: FontRead<'a> + TopLevelTable>(
    font: &FontRef<'a>,
) -> Result<T, ImportError> {
    let data = font.expect_table_data(T::TAG)?;
    T::read(data).map_err(|e| ImportError::in_table(T::TAG, e))
}

fn read_optional<'a, T: FontRead<'a> + TopLevelTable>(
    font: &FontRef<'a>,
    warnings: &mut Vec<ImportWarning>,
) -> Option<T> {
    let data = font.table_data(T::TAG)?;
    match T::read(data) {
        Ok(table) => Some(table),
        Err(err) => {
            warnings.push(ImportWarning::MalformedTable {
                tag: T::TAG,
                detail: err.to_string(),
            });
            None
        }
    }
}

type DecodedGlyph = (Outline, Vec<ImportWarning>);

fn decode_truetype_glyphs(
    loca: &Loca,
    glyf: FontData<'_>,
    num_glyphs: u16,
) -> Vec<DecodedGlyph> {
    (0..num_glyphs)
        .into_par_iter()
        .map(|gid| decode_truetype_glyph(loca, glyf, gid, num_glyphs))
        .collect()
}

fn decode_truetype_glyph(
    loca: &Loca,
    glyf: FontData<'_>,
    gid: u16,
    num_glyphs: u16,
) -> DecodedGlyph {
    let empty = Outline::Contours(Vec::new());
    let Some(range) = loca.get_range(GlyphId16::new(gid)) else {
        return (empty, vec![degraded(gid, "no loca entry")]);
    };
    if range.is_empty() {
        return (empty, Vec::new());
    }
    let Some(data) = glyf.slice(range) else {
        return (empty, vec![degraded(gid, "glyph data out of bounds")]);
    };
    match RawGlyph::read(data) {
        Ok(RawGlyph::Simple(simple)) => {
            let contours = simple
                .contours
                .iter()
                .filter(|ring| ring.len() > 1)
                .filter_map(|ring| quad_ring_to_contour(ring))
                .collect();
            (Outline::Contours(contours), Vec::new())
        }
        Ok(RawGlyph::Composite(composite)) => {
            let mut warnings = Vec::new();
            let mut components = Vec::new();
            for raw in &composite.components {
                let target = raw.glyph.to_u16();
                if target >= num_glyphs {
                    return (
                        empty,
                        vec![degraded(
                            gid,
                            &format!("component references nonexistent glyph {target}"),
                        )],
                    );
                }
                let (dx, dy) = match raw.anchor {
                    Anchor::Offset { x, y } => (x as f64, y as f64),
                    Anchor::Point { .. } => {
                        warnings.push(degraded(gid, "point-matching anchor treated as zero"));
                        (0.0, 0.0)
                    }
                };
                let t = &raw.transform;
                components.push(Component {
                    glyph: target as usize,
                    transform: Affine::new([
                        t.xx.to_f32() as f64,
                        t.yx.to_f32() as f64,
                        t.xy.to_f32() as f64,
                        t.yy.to_f32() as f64,
                        dx,
                        dy,
                    ]),
                });
            }
            (Outline::Components(components), warnings)
        }
        Err(err) => (empty, vec![degraded(gid, &err.to_string())]),
    }
}

/// Empty every glyph that takes part in a component cycle.
///
/// The model flattens components by recursion, so the reference graph
/// must be acyclic before the glyphs are accepted.
fn break_component_cycles(glyphs: &mut [DecodedGlyph]) -> Vec<ImportWarning> {
    // 0 unvisited, 1 on the current path, 2 finished
    fn visit(
        glyphs: &[DecodedGlyph],
        gid: usize,
        state: &mut [u8],
        path: &mut Vec<usize>,
        cyclic: &mut [bool],
    ) {
        match state[gid] {
            1 => {
                // back edge: every glyph from gid to the top of the path
                // lies on the cycle
                let pos = path.iter().rposition(|&g| g == gid).unwrap_or(0);
                for &g in &path[pos..] {
                    cyclic[g] = true;
                }
                return;
            }
            2 => return,
            _ => {}
        }
        state[gid] = 1;
        path.push(gid);
        if let Outline::Components(components) = &glyphs[gid].0 {
            for component in components {
                if component.glyph < glyphs.len() {
                    visit(glyphs, component.glyph, state, path, cyclic);
                }
            }
        }
        path.pop();
        state[gid] = 2;
    }

    let mut state = vec![0u8; glyphs.len()];
    let mut cyclic = vec![false; glyphs.len()];
    let mut path = Vec::new();
    for gid in 0..glyphs.len() {
        visit(glyphs, gid, &mut state, &mut path, &mut cyclic);
    }

    let mut warnings = Vec::new();
    for (gid, _) in cyclic.iter().enumerate().filter(|(_, flag)| **flag) {
        glyphs[gid].0 = Outline::Contours(Vec::new());
        warnings.push(degraded(gid as u16, "part of a component cycle"));
    }
    warnings
}

fn degraded(gid: u16, detail: &str) -> ImportWarning {
    ImportWarning::DegradedGlyph {
        glyph: gid,
        detail: detail.to_string(),
    }
}

/// Convert one ring of quadratic points to a cubic contour.
///
/// Consecutive off-curve points imply an on-curve midpoint between them;
/// a ring with no on-curve point at all starts at an implied midpoint.
fn quad_ring_to_contour(ring: &[CurvePoint]) -> Option<Contour> {
    let point = |p: &CurvePoint| Point::new(p.x as f64, p.y as f64);

    // expand implied midpoints so the ring strictly alternates
    let mut expanded: Vec<(Point, bool)> = Vec::with_capacity(ring.len() * 2);
    for (i, p) in ring.iter().enumerate() {
        let next = &ring[(i + 1) % ring.len()];
        expanded.push((point(p), p.on_curve));
        if !p.on_curve && !next.on_curve {
            expanded.push((point(p).midpoint(point(next)), true));
        }
    }
    // rotate so the ring starts on-curve
    let start = expanded.iter().position(|(_, on)| *on)?;
    expanded.rotate_left(start);

    let mut contour = Contour::new(expanded[0].0);
    let mut i = 1;
    while i < expanded.len() {
        let (p, on_curve) = expanded[i];
        if on_curve {
            contour.line_to(p);
            i += 1;
        } else {
            // the following on-curve point closes the quad; wrap to the
            // contour start at the end of the ring
            let end = expanded
                .get(i + 1)
                .map(|(p, _)| *p)
                .unwrap_or(expanded[0].0);
            let c = quad_to_cubic(QuadBez::new(contour.current_point(), p, end));
            contour.curve_to(c.p1, c.p2, c.p3);
            i += 2;
        }
    }
    // close with a final segment back to the start when the last point
    // was on-curve and elsewhere
    let last = contour.current_point();
    if last != contour.start {
        contour.line_to(contour.start);
    }
    Some(contour)
}

fn decode_cff_glyphs(cff: &Cff, num_glyphs: u16) -> Vec<DecodedGlyph> {
    (0..num_glyphs)
        .into_par_iter()
        .map(|gid| {
            let mut sink = ContourSink::default();
            match cff.outline(GlyphId16::new(gid), &mut sink) {
                Ok(_) => (Outline::Contours(sink.finish()), Vec::new()),
                Err(err) => (
                    Outline::Contours(Vec::new()),
                    vec![degraded(gid, &err.to_string())],
                ),
            }
        })
        .collect()
}

#[derive(Default)]
struct ContourSink {
    contours: Vec<Contour>,
    current: Option<Contour>,
}

impl ContourSink {
    fn finish(mut self) -> Vec<Contour> {
        if let Some(contour) = self.current.take() {
            self.contours.push(contour);
        }
        self.contours
    }
}

impl OutlineSink for ContourSink {
    fn move_to(&mut self, x: f64, y: f64) {
        if let Some(contour) = self.current.take() {
            self.contours.push(contour);
        }
        self.current = Some(Contour::new((x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if let Some(contour) = self.current.as_mut() {
            contour.line_to((x, y));
        }
    }

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        if let Some(contour) = self.current.as_mut() {
            contour.curve_to((x1, y1), (x2, y2), (x, y));
        }
    }

    fn close(&mut self) {
        if let Some(contour) = self.current.take() {
            self.contours.push(contour);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Segment;
    use pretty_assertions::assert_eq;

    fn on(x: i16, y: i16) -> CurvePoint {
        CurvePoint::on_curve(x, y)
    }

    fn off(x: i16, y: i16) -> CurvePoint {
        CurvePoint::off_curve(x, y)
    }

    #[test]
    fn all_lines() {
        let contour = quad_ring_to_contour(&[on(0, 0), on(100, 0), on(100, 100)]).unwrap();
        assert_eq!(contour.start, Point::new(0.0, 0.0));
        assert_eq!(
            contour.segments,
            vec![
                Segment::Line(Point::new(100.0, 0.0)),
                Segment::Line(Point::new(100.0, 100.0)),
                Segment::Line(Point::new(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn off_curve_becomes_cubic() {
        let contour = quad_ring_to_contour(&[on(0, 0), off(100, 0), on(100, 100)]).unwrap();
        assert_eq!(contour.segments.len(), 2);
        assert!(matches!(contour.segments[0], Segment::Curve(..)));
        // the cubic ends on the quad's endpoint
        let Segment::Curve(_, _, end) = contour.segments[0] else {
            unreachable!()
        };
        assert_eq!(end, Point::new(100.0, 100.0));
    }

    #[test]
    fn consecutive_off_curves_imply_midpoint() {
        // two off-curve points in a row: TrueType implies an on-curve
        // point at their midpoint
        let contour =
            quad_ring_to_contour(&[on(0, 0), off(0, 100), off(100, 100), on(100, 0)]).unwrap();
        let curve_ends: Vec<Point> = contour
            .segments
            .iter()
            .filter_map(|seg| match seg {
                Segment::Curve(_, _, p) => Some(*p),
                _ => None,
            })
            .collect();
        assert!(curve_ends.contains(&Point::new(50.0, 100.0)));
    }

    #[test]
    fn ring_with_no_oncurve_point() {
        let contour =
            quad_ring_to_contour(&[off(0, 0), off(100, 0), off(100, 100), off(0, 100)]).unwrap();
        // starts at an implied midpoint
        assert_eq!(contour.start, Point::new(50.0, 0.0));
        assert!(contour
            .segments
            .iter()
            .all(|seg| matches!(seg, Segment::Curve(..))));
    }

    #[test]
    fn trailing_off_curve_wraps_to_start() {
        let contour = quad_ring_to_contour(&[on(0, 0), on(100, 0), off(50, 100)]).unwrap();
        let Segment::Curve(_, _, end) = *contour.segments.last().unwrap() else {
            panic!("expected the wrap segment to be a curve");
        };
        assert_eq!(end, Point::new(0.0, 0.0));
    }

    fn composite_font() -> Font {
        let mut font = Font::default();
        font.glyphs.push(Glyph::new(".notdef", 500));
        let mut base = Glyph::new("base", 600);
        base.codepoints.push('A');
        let mut square = Contour::new((0.0, 0.0));
        square
            .line_to((100.0, 0.0))
            .line_to((100.0, 100.0))
            .line_to((0.0, 100.0));
        base.outline = Outline::Contours(vec![square]);
        font.glyphs.push(base);
        let mut shifted = Glyph::new("shifted", 600);
        shifted.codepoints.push('B');
        shifted.outline = Outline::Components(vec![Component {
            glyph: 1,
            transform: Affine::translate((50.0, 0.0)),
        }]);
        font.glyphs.push(shifted);
        font
    }

    // byte offset of glyph 2's component glyphIndex: table offset, glyph
    // range start, 10 byte glyph header, 2 byte component flags
    fn component_target_offset(ttf: &[u8]) -> usize {
        let font = FontRef::from_bytes(ttf).unwrap();
        let head = Head::read(font.table_data(Head::TAG).unwrap()).unwrap();
        let maxp = Maxp::read(font.table_data(Maxp::TAG).unwrap()).unwrap();
        let loca = Loca::read(
            font.table_data(Loca::TAG).unwrap(),
            maxp.num_glyphs,
            head.index_to_loc_format == 1,
        )
        .unwrap();
        let glyf_offset = font
            .table_directory()
            .table_records()
            .iter()
            .find(|rec| rec.tag == Tag::new(b"glyf"))
            .unwrap()
            .offset as usize;
        let range = loca.get_range(GlyphId16::new(2)).unwrap();
        glyf_offset + range.start + 12
    }

    #[test]
    fn dangling_component_degrades_on_import() {
        use crate::export::{export, ExportFormat};

        let font = composite_font();
        let mut ttf = export(&font, ExportFormat::Ttf).unwrap();
        let at = component_target_offset(&ttf);
        ttf[at..at + 2].copy_from_slice(&999u16.to_be_bytes());

        let (imported, warnings) = Font::from_bytes(&ttf).unwrap();
        assert_eq!(imported.glyphs[2].outline, Outline::Contours(Vec::new()));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, ImportWarning::DegradedGlyph { glyph: 2, .. })));
    }

    #[test]
    fn component_cycle_broken_on_import() {
        use crate::export::{export, ExportFormat};

        // repoint the composite at itself
        let font = composite_font();
        let mut ttf = export(&font, ExportFormat::Ttf).unwrap();
        let at = component_target_offset(&ttf);
        ttf[at..at + 2].copy_from_slice(&2u16.to_be_bytes());

        let (imported, warnings) = Font::from_bytes(&ttf).unwrap();
        assert_eq!(imported.glyphs[2].outline, Outline::Contours(Vec::new()));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, ImportWarning::DegradedGlyph { glyph: 2, .. })));
        // the glyph it used to reference is untouched
        assert!(matches!(
            &imported.glyphs[1].outline,
            Outline::Contours(contours) if !contours.is_empty()
        ));
    }
}
