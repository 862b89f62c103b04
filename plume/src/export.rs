//! Writing the editable model back to binary formats
//!
//! Export is a one-way pipeline of typed stages:
//!
//! ```text
//! Font -> Validated -> TablesBuilt -> DirectoryAssembled -> Finalized
//! ```
//!
//! Each stage consumes the previous one, so a font that has passed
//! validation cannot fail once serialization begins, and the directory
//! cannot be assembled before every table exists.

use std::collections::HashSet;

use kurbo::{Affine, CubicBez, Point, QuadBez};
use rayon::prelude::*;
use read_sfnt::tables::glyf::{
    Anchor, Bbox, Component as RawComponent, CompositeGlyph, CompositeGlyphFlags, CurvePoint,
    Glyph as RawGlyph, SimpleGlyph, Transform,
};
use read_sfnt::tables::head::Head;
use read_sfnt::tables::hhea::Hhea;
use read_sfnt::tables::hmtx::LongMetric;
use read_sfnt::tables::kern::KernPair as RawKernPair;
use read_sfnt::tables::maxp::{Maxp, MaxpV1};
use read_sfnt::TopLevelTable;
use sfnt_types::{F2Dot14, FWord, Fixed, GlyphId16, Tag, UfWord};
use write_sfnt::tables::cff::{CffBuilder, CharstringBuilder};
use write_sfnt::tables::cmap::{CmapBuilder, CmapError};
use write_sfnt::tables::glyf::{drop_implied_oncurve, GlyfLocaBuilder, LocaFormat};
use write_sfnt::tables::hmtx::HmtxBuilder;
use write_sfnt::tables::kern::KernBuilder;
use read_sfnt::tables::name::name_id;
use write_sfnt::tables::name::NameBuilder;
use write_sfnt::tables::post;
use write_sfnt::{dump_table, FontBuilder};

use crate::conv::{cubic_to_quads, DEFAULT_TOLERANCE};
use crate::error::ExportError;
use crate::font::{Contour, Font, Glyph, Outline, Segment};

/// The binary formats a font can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// TrueType outlines (glyf/loca).
    Ttf,
    /// OpenType with CFF outlines.
    Otf,
    /// An SVG font document.
    Svg,
    /// An Embedded OpenType wrapper around the TrueType binary.
    Eot,
}

/// Export a font in one step.
pub fn export(font: &Font, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let validated = font.validate()?;
    match format {
        ExportFormat::Ttf => Ok(validated.build_tables(ExportFormat::Ttf)?.assemble().finalize().into_bytes()),
        ExportFormat::Otf => Ok(validated.build_tables(ExportFormat::Otf)?.assemble().finalize().into_bytes()),
        ExportFormat::Svg => Ok(crate::svg::write_svg_font(font).into_bytes()),
        ExportFormat::Eot => {
            let ttf = validated.build_tables(ExportFormat::Ttf)?.assemble().finalize().into_bytes();
            Ok(crate::eot::wrap_ttf(font, &ttf))
        }
    }
}

/// A font that has passed export validation.
///
/// Holds the checked codepoint assignments so later stages can use them
/// without re-deriving.
pub struct Validated<'a> {
    font: &'a Font,
    mappings: Vec<(char, GlyphId16)>,
}

impl Font {
    /// Check everything that can make export fail.
    ///
    /// Component references must form an acyclic graph over existing
    /// glyphs, codepoint assignments must be unambiguous and fit the
    /// character map, and contours must enclose area.
    pub fn validate(&self) -> Result<Validated<'_>, ExportError> {
        if self.glyphs.is_empty() {
            return Err(ExportError::NoGlyphs);
        }
        self.check_component_graph()?;

        let mut mappings = Vec::new();
        let mut seen = std::collections::HashMap::new();
        for (codepoint, gid) in self.codepoint_mappings() {
            if u32::from(codepoint) >= 0xFFFF {
                return Err(ExportError::UnsupportedCodepoint(codepoint));
            }
            match seen.insert(codepoint, gid) {
                Some(other) if other != gid => {
                    return Err(ExportError::CmapConflict { codepoint })
                }
                _ => {}
            }
            mappings.push((codepoint, GlyphId16::new(gid as u16)));
        }

        for (gid, glyph) in self.glyphs.iter().enumerate() {
            if let Outline::Contours(contours) = &glyph.outline {
                for contour in contours {
                    let degenerate = match contour.segments.as_slice() {
                        [] => true,
                        [Segment::Line(_)] => true,
                        _ => false,
                    };
                    if degenerate {
                        return Err(ExportError::DegenerateContour { glyph: gid });
                    }
                }
            }
        }
        Ok(Validated {
            font: self,
            mappings,
        })
    }

    fn check_component_graph(&self) -> Result<(), ExportError> {
        for gid in 0..self.glyphs.len() {
            let mut visiting = HashSet::new();
            self.walk_components(gid, gid, &mut visiting)?;
        }
        Ok(())
    }

    fn walk_components(
        &self,
        root: usize,
        gid: usize,
        visiting: &mut HashSet<usize>,
    ) -> Result<(), ExportError> {
        if !visiting.insert(gid) {
            return Err(ExportError::InvalidGlyphGraph { glyph: root });
        }
        if let Outline::Components(components) = &self.glyphs[gid].outline {
            for component in components {
                if component.glyph >= self.glyphs.len() {
                    return Err(ExportError::DanglingComponent {
                        glyph: gid,
                        target: component.glyph,
                    });
                }
                self.walk_components(root, component.glyph, visiting)?;
            }
        }
        visiting.remove(&gid);
        Ok(())
    }

    /// The glyph's contours with all component references resolved.
    ///
    /// Must only be called after the component graph has been checked.
    pub(crate) fn resolved_contours(&self, gid: usize) -> Vec<Contour> {
        match &self.glyphs[gid].outline {
            Outline::Contours(contours) => contours.clone(),
            Outline::Components(components) => {
                let mut out = Vec::new();
                for component in components {
                    for contour in self.resolved_contours(component.glyph) {
                        out.push(transform_contour(&contour, component.transform));
                    }
                }
                out
            }
        }
    }
}

fn transform_contour(contour: &Contour, transform: Affine) -> Contour {
    let mut out = Contour::new(transform * contour.start);
    for segment in &contour.segments {
        match segment {
            Segment::Line(p) => {
                out.line_to(transform * *p);
            }
            Segment::Curve(p1, p2, p3) => {
                out.curve_to(transform * *p1, transform * *p2, transform * *p3);
            }
        }
    }
    out
}

/// Every table serialized, ready for directory assembly.
pub struct TablesBuilt {
    tables: Vec<(Tag, Vec<u8>)>,
}

/// A complete font image with its table directory, not yet checksummed.
pub struct DirectoryAssembled {
    bytes: Vec<u8>,
}

/// A finished font binary.
pub struct Finalized {
    bytes: Vec<u8>,
}

impl Validated<'_> {
    /// Serialize every table for the given outline flavor.
    ///
    /// `format` must be [`ExportFormat::Ttf`] or [`ExportFormat::Otf`];
    /// the other formats wrap these.
    pub fn build_tables(&self, format: ExportFormat) -> Result<TablesBuilt, ExportError> {
        let font = self.font;
        let mut tables: Vec<(Tag, Vec<u8>)> = Vec::new();

        // outlines first: the loca format feeds head, and the glyph
        // bboxes feed head and hhea
        let bboxes: Vec<Option<Bbox>> = (0..font.glyphs.len())
            .into_par_iter()
            .map(|gid| bbox_of_contours(&font.resolved_contours(gid)))
            .collect();

        let loca_format = match format {
            ExportFormat::Otf => {
                let cff = build_cff(font)?;
                tables.push((Tag::new(b"CFF "), cff));
                LocaFormat::Short
            }
            _ => {
                let (glyf, loca, loca_format) = build_glyf_loca(font)?;
                tables.push((Tag::new(b"glyf"), glyf));
                tables.push((Tag::new(b"loca"), loca));
                loca_format
            }
        };

        let metrics: Vec<LongMetric> = font
            .glyphs
            .iter()
            .zip(&bboxes)
            .map(|(glyph, bbox)| LongMetric {
                advance: UfWord::new(glyph.advance_width),
                side_bearing: FWord::new(bbox.map(|b| b.x_min).unwrap_or_default()),
            })
            .collect();
        let hmtx = HmtxBuilder::new(metrics.clone());
        let number_of_h_metrics = hmtx.number_of_h_metrics();
        tables.push((Tag::new(b"hmtx"), hmtx.build()));

        let union = bboxes.iter().flatten().fold(None::<Bbox>, |acc, b| {
            Some(match acc {
                None => *b,
                Some(a) => Bbox {
                    x_min: a.x_min.min(b.x_min),
                    y_min: a.y_min.min(b.y_min),
                    x_max: a.x_max.max(b.x_max),
                    y_max: a.y_max.max(b.y_max),
                },
            })
        });
        let union = union.unwrap_or_default();

        let head = Head {
            version: Fixed::from_f64(1.0),
            font_revision: Fixed::from_f64(1.0),
            checksum_adjustment: 0,
            magic_number: Head::MAGIC,
            // baseline at y 0, left sidebearing at x 0
            flags: 0b11,
            units_per_em: font.units_per_em,
            created: font.created,
            modified: font.modified,
            x_min: FWord::new(union.x_min),
            y_min: FWord::new(union.y_min),
            x_max: FWord::new(union.x_max),
            y_max: FWord::new(union.y_max),
            mac_style: 0,
            lowest_rec_ppem: 8,
            font_direction_hint: 2,
            index_to_loc_format: loca_format as i16,
            glyph_data_format: 0,
        };
        tables.push((Head::TAG, dump_table(&head)?));

        let advance_width_max = font
            .glyphs
            .iter()
            .map(|glyph| glyph.advance_width)
            .max()
            .unwrap_or_default();
        let min_lsb = metrics
            .iter()
            .map(|metric| metric.side_bearing.to_i16())
            .min()
            .unwrap_or_default();
        let min_rsb = font
            .glyphs
            .iter()
            .zip(&bboxes)
            .filter_map(|(glyph, bbox)| {
                bbox.map(|b| glyph.advance_width as i32 - b.x_max as i32)
            })
            .min()
            .unwrap_or_default() as i16;
        let hhea = Hhea {
            version: Fixed::from_f64(1.0),
            ascender: FWord::new(font.ascender),
            descender: FWord::new(font.descender),
            line_gap: FWord::new(font.line_gap),
            advance_width_max: UfWord::new(advance_width_max),
            min_left_side_bearing: FWord::new(min_lsb),
            min_right_side_bearing: FWord::new(min_rsb),
            x_max_extent: FWord::new(union.x_max),
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            metric_data_format: 0,
            number_of_h_metrics,
        };
        tables.push((Hhea::TAG, dump_table(&hhea)?));

        let maxp = build_maxp(font, format);
        tables.push((Maxp::TAG, dump_table(&maxp)?));

        let cmap = CmapBuilder::new(self.mappings.clone());
        let cmap = cmap.build().map_err(|err| match err {
            CmapError::Conflict(codepoint) => ExportError::CmapConflict { codepoint },
            CmapError::OutOfRange(codepoint) => ExportError::UnsupportedCodepoint(codepoint),
        })?;
        tables.push((Tag::new(b"cmap"), cmap));

        let mut name = NameBuilder::default();
        name.add(name_id::FAMILY, font.family_name.clone());
        name.add(name_id::SUBFAMILY, font.style_name.clone());
        name.add(name_id::FULL_NAME, format_full_name(font));
        tables.push((Tag::new(b"name"), name.build()));

        let upem = font.units_per_em as i16;
        tables.push((
            Tag::new(b"post"),
            dump_table(&post::version_3(-upem / 10, upem / 20))?,
        ));

        if !font.kerning.is_empty() {
            let pairs = font
                .kerning
                .iter()
                .map(|pair| RawKernPair {
                    left: GlyphId16::new(pair.left as u16),
                    right: GlyphId16::new(pair.right as u16),
                    value: FWord::new(pair.value),
                })
                .collect();
            tables.push((Tag::new(b"kern"), KernBuilder::new(pairs).build()));
        }

        Ok(TablesBuilt { tables })
    }
}

fn format_full_name(font: &Font) -> String {
    if font.style_name.is_empty() || font.style_name == "Regular" {
        font.family_name.clone()
    } else {
        format!("{} {}", font.family_name, font.style_name)
    }
}

impl TablesBuilt {
    /// Lay the tables out behind a sorted table directory.
    pub fn assemble(self) -> DirectoryAssembled {
        let mut builder = FontBuilder::new();
        for (tag, data) in self.tables {
            builder.add_raw(tag, data);
        }
        DirectoryAssembled {
            bytes: builder.build(),
        }
    }
}

impl DirectoryAssembled {
    /// Seal the file.
    ///
    /// Checksums were filled in during assembly; this stage exists so the
    /// type signature distinguishes an assembled image from a deliverable
    /// one.
    pub fn finalize(self) -> Finalized {
        Finalized { bytes: self.bytes }
    }
}

impl Finalized {
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn bbox_of_contours(contours: &[Contour]) -> Option<Bbox> {
    let mut points = contours.iter().flat_map(|contour| {
        std::iter::once(contour.start).chain(contour.segments.iter().flat_map(|seg| {
            match seg {
                Segment::Line(p) => vec![*p],
                Segment::Curve(p1, p2, p3) => vec![*p1, *p2, *p3],
            }
        }))
    });
    let first = points.next()?;
    let mut bbox = Bbox {
        x_min: first.x.round() as i16,
        y_min: first.y.round() as i16,
        x_max: first.x.round() as i16,
        y_max: first.y.round() as i16,
    };
    for p in points {
        bbox.x_min = bbox.x_min.min(p.x.round() as i16);
        bbox.y_min = bbox.y_min.min(p.y.round() as i16);
        bbox.x_max = bbox.x_max.max(p.x.round() as i16);
        bbox.y_max = bbox.y_max.max(p.y.round() as i16);
    }
    Some(bbox)
}

fn build_maxp(font: &Font, format: ExportFormat) -> Maxp {
    let num_glyphs = font.glyphs.len() as u16;
    if format == ExportFormat::Otf {
        return Maxp {
            version: Maxp::VERSION_0_5,
            num_glyphs,
            v1: None,
        };
    }
    let mut v1 = MaxpV1 {
        max_zones: 2,
        ..Default::default()
    };
    for glyph in &font.glyphs {
        match &glyph.outline {
            Outline::Contours(contours) => {
                let points: usize = contours
                    .iter()
                    .map(|c| c.segments.len() * 3 + 1)
                    .sum();
                v1.max_contours = v1.max_contours.max(contours.len() as u16);
                v1.max_points = v1.max_points.max(points as u16);
            }
            Outline::Components(components) => {
                v1.max_component_elements =
                    v1.max_component_elements.max(components.len() as u16);
                v1.max_component_depth = v1.max_component_depth.max(1);
            }
        }
    }
    Maxp {
        version: Maxp::VERSION_1_0,
        num_glyphs,
        v1: Some(v1),
    }
}

fn build_glyf_loca(font: &Font) -> Result<(Vec<u8>, Vec<u8>, LocaFormat), ExportError> {
    // encode in parallel, then append in glyph order
    let encoded: Vec<Result<Option<RawGlyph>, ExportError>> = font
        .glyphs
        .par_iter()
        .enumerate()
        .map(|(gid, glyph)| encode_truetype_glyph(gid, glyph))
        .collect();
    let mut builder = GlyfLocaBuilder::new();
    for glyph in encoded {
        match glyph? {
            Some(raw) => builder.add_glyph(&raw),
            None => builder.add_empty_glyph(),
        };
    }
    Ok(builder.build())
}

fn encode_truetype_glyph(gid: usize, glyph: &Glyph) -> Result<Option<RawGlyph>, ExportError> {
    match &glyph.outline {
        Outline::Contours(contours) if contours.is_empty() => Ok(None),
        Outline::Components(components) if components.is_empty() => Ok(None),
        Outline::Contours(contours) => {
            let mut rings = Vec::with_capacity(contours.len());
            for contour in contours {
                rings.push(contour_to_quad_ring(gid, contour)?);
            }
            Ok(Some(RawGlyph::Simple(SimpleGlyph {
                bbox: Bbox::default(), // recomputed on write
                contours: rings,
                instructions: Vec::new(),
            })))
        }
        Outline::Components(components) => {
            let raw_components = components
                .iter()
                .map(|component| {
                    let [a, b, c, d, e, f] = component.transform.as_coeffs();
                    RawComponent {
                        glyph: GlyphId16::new(component.glyph as u16),
                        anchor: Anchor::Offset {
                            x: e.round() as i16,
                            y: f.round() as i16,
                        },
                        transform: Transform {
                            xx: F2Dot14::from_f32(a as f32),
                            yx: F2Dot14::from_f32(b as f32),
                            xy: F2Dot14::from_f32(c as f32),
                            yy: F2Dot14::from_f32(d as f32),
                        },
                        flags: CompositeGlyphFlags::ROUND_XY_TO_GRID,
                    }
                })
                .collect();
            Ok(Some(RawGlyph::Composite(CompositeGlyph {
                bbox: Bbox::default(),
                components: raw_components,
                instructions: Vec::new(),
            })))
        }
    }
}

/// Flatten one cubic contour into a TrueType point ring.
fn contour_to_quad_ring(gid: usize, contour: &Contour) -> Result<Vec<CurvePoint>, ExportError> {
    let to_point = |p: Point| CurvePoint::on_curve(p.x.round() as i16, p.y.round() as i16);
    let mut ring = vec![to_point(contour.start)];
    let mut current = contour.start;
    for segment in &contour.segments {
        match segment {
            Segment::Line(p) => {
                ring.push(to_point(*p));
                current = *p;
            }
            Segment::Curve(p1, p2, p3) => {
                let cubic = CubicBez::new(current, *p1, *p2, *p3);
                let quads = cubic_to_quads(cubic, DEFAULT_TOLERANCE)
                    .ok_or(ExportError::UnfittableCurve { glyph: gid })?;
                for quad in &quads {
                    push_quad(&mut ring, quad);
                }
                current = *p3;
            }
        }
    }
    // the ring closes implicitly; a trailing point equal to the start is
    // redundant
    if ring.len() > 1 && ring.last() == ring.first() {
        ring.pop();
    }
    Ok(drop_implied_oncurve(&ring))
}

fn push_quad(ring: &mut Vec<CurvePoint>, quad: &QuadBez) {
    ring.push(CurvePoint::off_curve(
        quad.p1.x.round() as i16,
        quad.p1.y.round() as i16,
    ));
    ring.push(CurvePoint::on_curve(
        quad.p2.x.round() as i16,
        quad.p2.y.round() as i16,
    ));
}

fn build_cff(font: &Font) -> Result<Vec<u8>, ExportError> {
    let default_width = font
        .glyphs
        .first()
        .map(|glyph| glyph.advance_width as i32)
        .unwrap_or_default();
    let charstrings: Vec<Vec<u8>> = font
        .glyphs
        .par_iter()
        .enumerate()
        .map(|(gid, glyph)| {
            let width_delta = if glyph.advance_width as i32 == default_width {
                None
            } else {
                Some(glyph.advance_width as i32 - default_width)
            };
            let mut builder = CharstringBuilder::new(width_delta);
            // CFF has no composite glyphs, so components are flattened
            for contour in font.resolved_contours(gid) {
                builder.move_to(contour.start.x, contour.start.y);
                for segment in &contour.segments {
                    match segment {
                        Segment::Line(p) => builder.line_to(p.x, p.y),
                        Segment::Curve(p1, p2, p3) => {
                            builder.curve_to(p1.x, p1.y, p2.x, p2.y, p3.x, p3.y)
                        }
                    }
                }
            }
            builder.finish()
        })
        .collect();
    let cff = CffBuilder {
        font_name: postscript_name(font),
        charstrings,
        default_width_x: default_width,
        // widths written as deltas center on the default
        nominal_width_x: default_width,
    };
    Ok(cff.build())
}

fn postscript_name(font: &Font) -> String {
    let mut out: String = font
        .family_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if !font.style_name.is_empty() && font.style_name != "Regular" {
        out.push('-');
        out.extend(font.style_name.chars().filter(|c| c.is_ascii_alphanumeric()));
    }
    if out.is_empty() {
        out.push_str("Untitled");
    }
    out
}
