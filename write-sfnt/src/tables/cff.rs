//! Writing the CFF table
//!
//! Produces a minimal but conformant CFF wrapper around a set of Type 2
//! charstrings: one font, no subroutines, no charset or encoding beyond
//! the standard defaults.

/// Encodes a single Type 2 charstring from an absolute-coordinate path.
///
/// Coordinates are rounded to integers; the encoder tracks the rounded
/// position so the relative deltas always sum to the rounded endpoints.
#[derive(Debug, Default)]
pub struct CharstringBuilder {
    data: Vec<u8>,
    x: i32,
    y: i32,
    started: bool,
}

impl CharstringBuilder {
    /// `width` is written as a delta from nominalWidthX, or omitted when
    /// the glyph uses defaultWidthX.
    pub fn new(width_delta: Option<i32>) -> Self {
        let mut builder = CharstringBuilder::default();
        if let Some(delta) = width_delta {
            push_number(&mut builder.data, delta);
        }
        builder
    }

    fn deltas(&mut self, x: f64, y: f64) -> (i32, i32) {
        let rx = x.round() as i32;
        let ry = y.round() as i32;
        let dx = rx - self.x;
        let dy = ry - self.y;
        self.x = rx;
        self.y = ry;
        (dx, dy)
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.deltas(x, y);
        push_number(&mut self.data, dx);
        push_number(&mut self.data, dy);
        self.data.push(21); // rmoveto
        self.started = true;
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        let (dx, dy) = self.deltas(x, y);
        push_number(&mut self.data, dx);
        push_number(&mut self.data, dy);
        self.data.push(5); // rlineto
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        let (dx1, dy1) = self.deltas(x1, y1);
        let (dx2, dy2) = self.deltas(x2, y2);
        let (dx3, dy3) = self.deltas(x, y);
        for v in [dx1, dy1, dx2, dy2, dx3, dy3] {
            push_number(&mut self.data, v);
        }
        self.data.push(8); // rrcurveto
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.data.push(14); // endchar
        self.data
    }
}

/// Encode an integer operand in its shortest form.
fn push_number(out: &mut Vec<u8>, value: i32) {
    match value {
        -107..=107 => out.push((value + 139) as u8),
        108..=1131 => {
            let value = value - 108;
            out.push((value >> 8) as u8 + 247);
            out.push(value as u8);
        }
        -1131..=-108 => {
            let value = -value - 108;
            out.push((value >> 8) as u8 + 251);
            out.push(value as u8);
        }
        -32768..=32767 => {
            out.push(28);
            out.extend_from_slice(&(value as i16).to_be_bytes());
        }
        _ => {
            // 16.16 fixed point is the only five byte form charstrings have
            out.push(255);
            out.extend_from_slice(&value.wrapping_shl(16).to_be_bytes());
        }
    }
}

/// Write an INDEX with the smallest sufficient offset size.
fn write_index(out: &mut Vec<u8>, items: &[&[u8]]) {
    out.extend_from_slice(&(items.len() as u16).to_be_bytes());
    if items.is_empty() {
        return;
    }
    let total: usize = items.iter().map(|item| item.len()).sum();
    let off_size: u8 = match total + 1 {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    };
    out.push(off_size);
    let mut offset = 1u32;
    let push_offset = |out: &mut Vec<u8>, value: u32| {
        out.extend_from_slice(&value.to_be_bytes()[4 - off_size as usize..]);
    };
    push_offset(out, offset);
    for item in items {
        offset += item.len() as u32;
        push_offset(out, offset);
    }
    for item in items {
        out.extend_from_slice(item);
    }
}

// DICT operators
const OP_CHARSTRINGS: u8 = 17;
const OP_PRIVATE: u8 = 18;
const OP_DEFAULT_WIDTH_X: u8 = 20;
const OP_NOMINAL_WIDTH_X: u8 = 21;

// always the 5-byte integer form, so DICT lengths do not depend on the
// values they carry
fn push_dict_operand(out: &mut Vec<u8>, value: i32) {
    out.push(29);
    out.extend_from_slice(&value.to_be_bytes());
}

/// Builds a complete CFF table.
#[derive(Debug, Clone, Default)]
pub struct CffBuilder {
    pub font_name: String,
    /// Finished Type 2 charstrings, one per glyph id.
    pub charstrings: Vec<Vec<u8>>,
    pub default_width_x: i32,
    pub nominal_width_x: i32,
}

impl CffBuilder {
    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![1, 0, 4, 4]; // major, minor, hdrSize, offSize

        let name = self.font_name.as_bytes();
        write_index(&mut out, &[name]);

        let mut private = Vec::new();
        push_dict_operand(&mut private, self.default_width_x);
        private.push(OP_DEFAULT_WIDTH_X);
        push_dict_operand(&mut private, self.nominal_width_x);
        private.push(OP_NOMINAL_WIDTH_X);

        // the top dict uses fixed width operands, so its length (and with
        // it every offset it stores) is known up front
        const TOP_DICT_LEN: usize = 3 * 5 + 2;
        const EMPTY_INDEX_LEN: usize = 2;
        let top_dict_index_len = 2 + 1 + 2 + TOP_DICT_LEN;
        let charstrings_offset =
            out.len() + top_dict_index_len + 2 * EMPTY_INDEX_LEN;
        let charstrings: Vec<&[u8]> =
            self.charstrings.iter().map(|cs| cs.as_slice()).collect();
        let mut charstrings_index = Vec::new();
        write_index(&mut charstrings_index, &charstrings);
        let private_offset = charstrings_offset + charstrings_index.len();

        let mut top = Vec::new();
        push_dict_operand(&mut top, charstrings_offset as i32);
        top.push(OP_CHARSTRINGS);
        push_dict_operand(&mut top, private.len() as i32);
        push_dict_operand(&mut top, private_offset as i32);
        top.push(OP_PRIVATE);
        debug_assert_eq!(top.len(), TOP_DICT_LEN);

        write_index(&mut out, &[&top]);
        write_index(&mut out, &[]); // String INDEX
        write_index(&mut out, &[]); // Global Subr INDEX
        debug_assert_eq!(out.len(), charstrings_offset);
        out.extend_from_slice(&charstrings_index);
        out.extend_from_slice(&private);
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use read_sfnt::tables::cff::{Cff, OutlineSink};
    use read_sfnt::{FontData, FontRead};
    use sfnt_types::GlyphId16;

    #[derive(Default)]
    struct RecordingSink(Vec<String>);

    impl OutlineSink for RecordingSink {
        fn move_to(&mut self, x: f64, y: f64) {
            self.0.push(format!("M {x} {y}"));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.0.push(format!("L {x} {y}"));
        }
        fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
            self.0.push(format!("C {x1} {y1} {x2} {y2} {x} {y}"));
        }
        fn close(&mut self) {
            self.0.push("Z".into());
        }
    }

    #[test]
    fn number_encoding_boundaries() {
        for value in [-1131, -1130, -108, -107, 0, 107, 108, 1131, 1132, -32768] {
            let mut out = Vec::new();
            push_number(&mut out, value);
            // decode with the same rules the interpreter uses
            let decoded = match out[0] {
                28 => i16::from_be_bytes([out[1], out[2]]) as i32,
                b0 @ 32..=246 => b0 as i32 - 139,
                b0 @ 247..=250 => (b0 as i32 - 247) * 256 + out[1] as i32 + 108,
                b0 @ 251..=254 => -(b0 as i32 - 251) * 256 - out[1] as i32 - 108,
                _ => panic!("unexpected lead byte {}", out[0]),
            };
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn charstring_roundtrip() {
        let mut builder = CharstringBuilder::new(Some(100));
        builder.move_to(10.0, 0.0);
        builder.line_to(110.0, 0.0);
        builder.curve_to(140.0, 0.0, 160.0, 20.0, 160.0, 50.0);
        let cs = builder.finish();

        let mut sink = RecordingSink::default();
        let width = read_sfnt::tables::cff::run_charstring(&cs, &mut sink, 400.0).unwrap();
        assert_eq!(width, Some(500.0));
        assert_eq!(
            sink.0,
            vec!["M 10 0", "L 110 0", "C 140 0 160 20 160 50", "Z"]
        );
    }

    #[test]
    fn coordinates_round_without_drift() {
        let mut builder = CharstringBuilder::new(None);
        builder.move_to(0.0, 0.0);
        // each step lands on x.5; the deltas must still sum to the
        // rounded endpoints, not accumulate error
        builder.line_to(10.5, 0.0);
        builder.line_to(21.0, 0.0);
        let cs = builder.finish();
        let mut sink = RecordingSink::default();
        read_sfnt::tables::cff::run_charstring(&cs, &mut sink, 0.0).unwrap();
        assert_eq!(sink.0, vec!["M 0 0", "L 11 0", "L 21 0", "Z"]);
    }

    #[test]
    fn table_roundtrip() {
        let mut a = CharstringBuilder::new(None);
        a.move_to(0.0, 0.0);
        a.line_to(50.0, 0.0);
        a.line_to(50.0, 50.0);
        let notdef = CharstringBuilder::new(None).finish();
        let table = CffBuilder {
            font_name: "PlumeSans".into(),
            charstrings: vec![notdef, a.finish()],
            default_width_x: 250,
            nominal_width_x: 500,
        };
        let bytes = table.build();
        let cff = Cff::read(FontData::new(&bytes)).unwrap();
        assert_eq!(cff.num_glyphs(), 2);
        assert_eq!(cff.default_width_x, 250.0);
        assert_eq!(cff.nominal_width_x, 500.0);
        let mut sink = RecordingSink::default();
        let width = cff.outline(GlyphId16::new(1), &mut sink).unwrap();
        assert_eq!(width, 250.0);
        assert_eq!(sink.0, vec!["M 0 0", "L 50 0", "L 50 50", "Z"]);
    }
}
