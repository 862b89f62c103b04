//! SVG font document export
//!
//! Writes the legacy SVG 1.1 font element. Coordinates in an SVG font run
//! y-up in font units, matching the internal model, so outlines are
//! emitted without any flipping.

use std::fmt::Write;

use kurbo::Point;

use crate::font::{Font, Outline, Segment};

/// Render the whole font as an SVG font document.
pub fn write_svg_font(font: &Font) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\">\n<defs>\n");
    let _ = writeln!(
        out,
        "<font id=\"{}\" horiz-adv-x=\"{}\">",
        escape_attr(&identifier(font)),
        default_advance(font)
    );
    let _ = writeln!(
        out,
        "<font-face font-family=\"{}\" units-per-em=\"{}\" ascent=\"{}\" descent=\"{}\"/>",
        escape_attr(&font.family_name),
        font.units_per_em,
        font.ascender,
        font.descender
    );

    for (gid, glyph) in font.glyphs.iter().enumerate() {
        let d = path_data(font, gid);
        if glyph.codepoints.is_empty() {
            if gid == 0 {
                let _ = writeln!(
                    out,
                    "<missing-glyph horiz-adv-x=\"{}\"{}/>",
                    glyph.advance_width,
                    path_attr(&d)
                );
            }
            continue;
        }
        for codepoint in &glyph.codepoints {
            let _ = writeln!(
                out,
                "<glyph glyph-name=\"{}\" unicode=\"{}\" horiz-adv-x=\"{}\"{}/>",
                escape_attr(&glyph.name),
                escape_char(*codepoint),
                glyph.advance_width,
                path_attr(&d)
            );
        }
    }

    for pair in &font.kerning {
        let (Some(left), Some(right)) = (
            first_codepoint(font, pair.left),
            first_codepoint(font, pair.right),
        ) else {
            continue;
        };
        // svg kerning distances are subtracted
        let _ = writeln!(
            out,
            "<hkern u1=\"{}\" u2=\"{}\" k=\"{}\"/>",
            escape_char(left),
            escape_char(right),
            -i32::from(pair.value)
        );
    }

    out.push_str("</font>\n</defs>\n</svg>\n");
    out
}

fn identifier(font: &Font) -> String {
    let id: String = font
        .family_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    if id.is_empty() {
        "font".into()
    } else {
        id
    }
}

fn default_advance(font: &Font) -> u16 {
    font.glyphs
        .first()
        .map(|glyph| glyph.advance_width)
        .unwrap_or(font.units_per_em)
}

fn first_codepoint(font: &Font, gid: usize) -> Option<char> {
    font.glyphs.get(gid)?.codepoints.first().copied()
}

fn path_attr(d: &str) -> String {
    if d.is_empty() {
        String::new()
    } else {
        format!(" d=\"{d}\"")
    }
}

/// The `d` attribute for a glyph, with components resolved.
fn path_data(font: &Font, gid: usize) -> String {
    let contours = match &font.glyphs[gid].outline {
        Outline::Contours(contours) if contours.is_empty() => return String::new(),
        Outline::Components(components) if components.is_empty() => return String::new(),
        _ => font.resolved_contours(gid),
    };
    let mut d = String::new();
    for contour in &contours {
        if !d.is_empty() {
            d.push(' ');
        }
        let _ = write!(d, "M {}", fmt_point(contour.start));
        for segment in &contour.segments {
            match segment {
                Segment::Line(p) => {
                    let _ = write!(d, " L {}", fmt_point(*p));
                }
                Segment::Curve(p1, p2, p3) => {
                    let _ = write!(
                        d,
                        " C {} {} {}",
                        fmt_point(*p1),
                        fmt_point(*p2),
                        fmt_point(*p3)
                    );
                }
            }
        }
        d.push_str(" Z");
    }
    d
}

fn fmt_point(p: Point) -> String {
    format!("{} {}", fmt_coord(p.x), fmt_coord(p.y))
}

// f64 Display already drops the fraction for whole values; rounding to
// two decimals keeps the file small without visible error
fn fmt_coord(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        out.push_str(&escape_char(c));
    }
    out
}

fn escape_char(c: char) -> String {
    match c {
        '&' => "&amp;".into(),
        '<' => "&lt;".into(),
        '>' => "&gt;".into(),
        '"' => "&quot;".into(),
        c if (c as u32) < 0x20 || (c as u32) > 0x7E => {
            format!("&#x{:X};", c as u32)
        }
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{Contour, Glyph};

    fn sample_font() -> Font {
        let mut font = Font {
            family_name: "Sample".into(),
            ..Default::default()
        };
        font.glyphs.push(Glyph::new(".notdef", 500));
        let mut a = Glyph::new("A", 600);
        a.codepoints.push('A');
        let mut contour = Contour::new((50.0, 0.0));
        contour
            .line_to((550.0, 0.0))
            .curve_to((550.0, 300.0), (300.0, 500.0), (50.0, 500.0));
        a.outline = Outline::Contours(vec![contour]);
        font.glyphs.push(a);
        font
    }

    #[test]
    fn document_structure() {
        let svg = write_svg_font(&sample_font());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<font id=\"Sample\""));
        assert!(svg.contains("units-per-em=\"1000\""));
        assert!(svg.contains("ascent=\"800\""));
        assert!(svg.contains("<missing-glyph horiz-adv-x=\"500\"/>"));
    }

    #[test]
    fn glyph_path_data() {
        let svg = write_svg_font(&sample_font());
        assert!(svg.contains(
            "<glyph glyph-name=\"A\" unicode=\"A\" horiz-adv-x=\"600\" \
             d=\"M 50 0 L 550 0 C 550 300 300 500 50 500 Z\"/>"
        ));
    }

    #[test]
    fn kerning_is_negated() {
        let mut font = sample_font();
        let mut v = Glyph::new("V", 600);
        v.codepoints.push('V');
        v.outline = Outline::Contours(vec![{
            let mut c = Contour::new((0.0, 0.0));
            c.line_to((600.0, 0.0)).line_to((300.0, 500.0));
            c
        }]);
        font.glyphs.push(v);
        font.kerning.push(crate::font::KernPair {
            left: 1,
            right: 2,
            value: -40,
        });
        let svg = write_svg_font(&font);
        assert!(svg.contains("<hkern u1=\"A\" u2=\"V\" k=\"40\"/>"));
    }

    #[test]
    fn special_characters_escaped() {
        let mut font = sample_font();
        font.family_name = "A&B \"Narrow\"".into();
        let svg = write_svg_font(&font);
        assert!(svg.contains("font-family=\"A&amp;B &quot;Narrow&quot;\""));
    }

    #[test]
    fn non_ascii_unicode_attr() {
        let mut font = sample_font();
        font.glyphs[1].codepoints = vec!['\u{00E9}'];
        let svg = write_svg_font(&font);
        assert!(svg.contains("unicode=\"&#xE9;\""));
    }
}
