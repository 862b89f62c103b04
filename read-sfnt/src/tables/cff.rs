//! The [CFF](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table
//!
//! Enough of the Compact Font Format to recover per-glyph Type 2
//! charstrings and interpret them as cubic outlines. Subroutines, FDSelect
//! and CID keyed fonts are not supported.

use sfnt_types::{GlyphId16, Tag};

use crate::{Cursor, FontData, FontRead, ReadError, TopLevelTable};

/// A receiver for the path produced by a charstring.
pub trait OutlineSink {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64);
    fn close(&mut self);
}

/// An INDEX structure: a packed array of variable length byte strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    offsets: Vec<u32>,
    data: Vec<u8>,
}

impl Index {
    fn read(cursor: &mut Cursor<'_>) -> Result<Self, ReadError> {
        let count: u16 = cursor.read()?;
        if count == 0 {
            return Ok(Index::default());
        }
        let off_size: u8 = cursor.read()?;
        if !(1..=4).contains(&off_size) {
            return Err(ReadError::MalformedData("INDEX offSize must be 1..=4"));
        }
        let mut offsets = Vec::with_capacity(count as usize + 1);
        for _ in 0..count as usize + 1 {
            let mut value = 0u32;
            for _ in 0..off_size {
                value = value << 8 | cursor.read::<u8>()? as u32;
            }
            if value == 0 {
                return Err(ReadError::MalformedData("INDEX offsets are one based"));
            }
            offsets.push(value);
        }
        for pair in offsets.windows(2) {
            if pair[1] < pair[0] {
                return Err(ReadError::MalformedData("INDEX offsets must not decrease"));
            }
        }
        let data_len = *offsets.last().unwrap() as usize - 1;
        let data = cursor.read_bytes(data_len)?.to_vec();
        Ok(Index { offsets, data })
    }

    pub fn count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn get(&self, idx: usize) -> Option<&[u8]> {
        let start = *self.offsets.get(idx)? as usize - 1;
        let end = *self.offsets.get(idx + 1)? as usize - 1;
        self.data.get(start..end)
    }
}

// Top DICT operators
const OP_CHARSTRINGS: u16 = 17;
const OP_PRIVATE: u16 = 18;
const OP_CHARSTRING_TYPE: u16 = 0x0c06;
// Private DICT operators
const OP_DEFAULT_WIDTH_X: u16 = 20;
const OP_NOMINAL_WIDTH_X: u16 = 21;

/// A parsed CFF table.
#[derive(Debug, Clone, PartialEq)]
pub struct Cff {
    charstrings: Index,
    pub default_width_x: f64,
    pub nominal_width_x: f64,
}

impl TopLevelTable for Cff {
    const TAG: Tag = Tag::new(b"CFF ");
}

impl<'a> FontRead<'a> for Cff {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let major: u8 = data.read_at(0)?;
        if major != 1 {
            return Err(ReadError::UnsupportedFormat(major as i64));
        }
        let header_size: u8 = data.read_at(2)?;
        let mut cursor = data
            .split_off(header_size as usize)
            .ok_or(ReadError::OutOfBounds)?
            .cursor();
        let _names = Index::read(&mut cursor)?;
        let top_dicts = Index::read(&mut cursor)?;
        let top_dict = top_dicts
            .get(0)
            .ok_or(ReadError::MalformedData("CFF is missing a Top DICT"))?;
        let top = parse_dict(top_dict)?;

        if let Some(kind) = dict_first(&top, OP_CHARSTRING_TYPE) {
            if kind != 2.0 {
                return Err(ReadError::UnsupportedFormat(kind as i64));
            }
        }
        let charstrings_offset = dict_first(&top, OP_CHARSTRINGS)
            .ok_or(ReadError::MalformedData("Top DICT has no CharStrings entry"))?
            as usize;
        let mut cs_cursor = data
            .split_off(charstrings_offset)
            .ok_or(ReadError::OutOfBounds)?
            .cursor();
        let charstrings = Index::read(&mut cs_cursor)?;

        let mut default_width_x = 0.0;
        let mut nominal_width_x = 0.0;
        if let Some(entry) = top.iter().find(|(op, _)| *op == OP_PRIVATE) {
            let [size, offset] = entry.1[..] else {
                return Err(ReadError::MalformedData("Private entry needs two operands"));
            };
            let private = data
                .slice(offset as usize..offset as usize + size as usize)
                .ok_or(ReadError::OutOfBounds)?;
            let private = parse_dict(private.as_bytes())?;
            default_width_x = dict_first(&private, OP_DEFAULT_WIDTH_X).unwrap_or(0.0);
            nominal_width_x = dict_first(&private, OP_NOMINAL_WIDTH_X).unwrap_or(0.0);
        }

        Ok(Cff {
            charstrings,
            default_width_x,
            nominal_width_x,
        })
    }
}

impl Cff {
    pub fn num_glyphs(&self) -> u16 {
        self.charstrings.count() as u16
    }

    pub fn charstring(&self, gid: GlyphId16) -> Option<&[u8]> {
        self.charstrings.get(gid.to_u16() as usize)
    }

    /// Interpret this glyph's charstring, sending the outline to `sink`.
    ///
    /// Returns the advance width: the charstring's own width value if it
    /// carries one, otherwise defaultWidthX.
    pub fn outline(&self, gid: GlyphId16, sink: &mut impl OutlineSink) -> Result<f64, ReadError> {
        let charstring = self
            .charstring(gid)
            .ok_or(ReadError::MalformedData("glyph id out of range"))?;
        let width = run_charstring(charstring, sink, self.nominal_width_x)?;
        Ok(width.unwrap_or(self.default_width_x))
    }
}

type Dict = Vec<(u16, Vec<f64>)>;

fn dict_first(dict: &Dict, op: u16) -> Option<f64> {
    dict.iter()
        .find(|(key, _)| *key == op)
        .and_then(|(_, operands)| operands.first().copied())
}

fn parse_dict(data: &[u8]) -> Result<Dict, ReadError> {
    let mut out = Vec::new();
    let mut operands = Vec::new();
    let mut cursor = FontData::new(data).cursor();
    while !cursor.is_at_end() {
        let b0: u8 = cursor.read()?;
        match b0 {
            0..=11 | 13..=21 => {
                out.push((b0 as u16, std::mem::take(&mut operands)));
            }
            12 => {
                let b1: u8 = cursor.read()?;
                out.push((0x0c00 | b1 as u16, std::mem::take(&mut operands)));
            }
            28 => operands.push(cursor.read::<i16>()? as f64),
            29 => operands.push(cursor.read::<i32>()? as f64),
            30 => operands.push(parse_real(&mut cursor)?),
            32..=246 => operands.push(b0 as f64 - 139.0),
            247..=250 => {
                let b1: u8 = cursor.read()?;
                operands.push((b0 as f64 - 247.0) * 256.0 + b1 as f64 + 108.0);
            }
            251..=254 => {
                let b1: u8 = cursor.read()?;
                operands.push(-(b0 as f64 - 251.0) * 256.0 - b1 as f64 - 108.0);
            }
            _ => return Err(ReadError::MalformedData("reserved byte in DICT")),
        }
    }
    Ok(out)
}

// packed BCD real number
fn parse_real(cursor: &mut Cursor<'_>) -> Result<f64, ReadError> {
    let mut text = String::new();
    'outer: loop {
        let byte: u8 = cursor.read()?;
        for nibble in [byte >> 4, byte & 0xf] {
            match nibble {
                0..=9 => text.push((b'0' + nibble) as char),
                0xa => text.push('.'),
                0xb => text.push('E'),
                0xc => text.push_str("E-"),
                0xe => text.push('-'),
                0xf => break 'outer,
                _ => return Err(ReadError::MalformedData("bad nibble in real number")),
            }
        }
    }
    text.parse()
        .map_err(|_| ReadError::MalformedData("unparseable real number"))
}

const STACK_LIMIT: usize = 48;

struct CharstringState<'a, S> {
    sink: &'a mut S,
    stack: Vec<f64>,
    x: f64,
    y: f64,
    width: Option<f64>,
    nominal_width_x: f64,
    seen_width_op: bool,
    n_stems: usize,
    open: bool,
}

/// Run a Type 2 charstring.
///
/// Returns the glyph's width delta applied to nominalWidthX, if the
/// charstring specified one.
pub fn run_charstring(
    charstring: &[u8],
    sink: &mut impl OutlineSink,
    nominal_width_x: f64,
) -> Result<Option<f64>, ReadError> {
    let mut state = CharstringState {
        sink,
        stack: Vec::new(),
        x: 0.0,
        y: 0.0,
        width: None,
        nominal_width_x,
        seen_width_op: false,
        n_stems: 0,
        open: false,
    };
    let mut cursor = FontData::new(charstring).cursor();
    while !cursor.is_at_end() {
        let b0: u8 = cursor.read()?;
        match b0 {
            28 => state.push(cursor.read::<i16>()? as f64)?,
            255 => {
                // 16.16 fixed point
                let raw: i32 = cursor.read()?;
                state.push(raw as f64 / 65536.0)?;
            }
            32..=246 => state.push(b0 as f64 - 139.0)?,
            247..=250 => {
                let b1: u8 = cursor.read()?;
                state.push((b0 as f64 - 247.0) * 256.0 + b1 as f64 + 108.0)?;
            }
            251..=254 => {
                let b1: u8 = cursor.read()?;
                state.push(-(b0 as f64 - 251.0) * 256.0 - b1 as f64 - 108.0)?;
            }
            1 | 3 | 18 | 23 => state.stems(),
            19 | 20 => {
                state.stems();
                cursor.advance_by((state.n_stems + 7) / 8);
            }
            21 => state.rmoveto()?,
            22 => state.hmoveto()?,
            4 => state.vmoveto()?,
            5 => state.rlineto(),
            6 => state.alternating_lineto(true),
            7 => state.alternating_lineto(false),
            8 => state.rrcurveto(),
            24 => state.rcurveline(),
            25 => state.rlinecurve(),
            26 => state.vvcurveto(),
            27 => state.hhcurveto(),
            30 => state.alternating_curveto(false),
            31 => state.alternating_curveto(true),
            14 => {
                state.take_width(state.stack.len() % 2 == 1);
                if state.open {
                    state.sink.close();
                }
                return Ok(state.width);
            }
            10 | 29 => {
                // subroutine calls need the subr indexes, which we do not
                // carry
                return Err(ReadError::UnsupportedFormat(b0 as i64));
            }
            12 => {
                let b1: u8 = cursor.read()?;
                return Err(ReadError::UnsupportedFormat(0x0c00 | b1 as i64));
            }
            _ => return Err(ReadError::MalformedData("reserved charstring operator")),
        }
    }
    Err(ReadError::MalformedData("charstring is missing endchar"))
}

impl<S: OutlineSink> CharstringState<'_, S> {
    fn push(&mut self, value: f64) -> Result<(), ReadError> {
        if self.stack.len() >= STACK_LIMIT {
            return Err(ReadError::MalformedData("charstring stack overflow"));
        }
        self.stack.push(value);
        Ok(())
    }

    // the first stack-clearing operator may be preceded by a width value
    fn take_width(&mut self, has_extra: bool) {
        if !self.seen_width_op {
            self.seen_width_op = true;
            if has_extra && !self.stack.is_empty() {
                self.width = Some(self.nominal_width_x + self.stack.remove(0));
            }
        }
    }

    fn stems(&mut self) {
        self.take_width(self.stack.len() % 2 == 1);
        self.n_stems += self.stack.len() / 2;
        self.stack.clear();
    }

    fn start_contour(&mut self) {
        if self.open {
            self.sink.close();
        }
        self.sink.move_to(self.x, self.y);
        self.open = true;
    }

    fn rmoveto(&mut self) -> Result<(), ReadError> {
        self.take_width(self.stack.len() > 2);
        let [dx, dy] = self.stack[..] else {
            return Err(ReadError::MalformedData("rmoveto takes two arguments"));
        };
        self.x += dx;
        self.y += dy;
        self.stack.clear();
        self.start_contour();
        Ok(())
    }

    fn hmoveto(&mut self) -> Result<(), ReadError> {
        self.take_width(self.stack.len() > 1);
        let [dx] = self.stack[..] else {
            return Err(ReadError::MalformedData("hmoveto takes one argument"));
        };
        self.x += dx;
        self.stack.clear();
        self.start_contour();
        Ok(())
    }

    fn vmoveto(&mut self) -> Result<(), ReadError> {
        self.take_width(self.stack.len() > 1);
        let [dy] = self.stack[..] else {
            return Err(ReadError::MalformedData("vmoveto takes one argument"));
        };
        self.y += dy;
        self.stack.clear();
        self.start_contour();
        Ok(())
    }

    fn line(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        self.sink.line_to(self.x, self.y);
    }

    fn curve(&mut self, dx1: f64, dy1: f64, dx2: f64, dy2: f64, dx3: f64, dy3: f64) {
        let x1 = self.x + dx1;
        let y1 = self.y + dy1;
        let x2 = x1 + dx2;
        let y2 = y1 + dy2;
        self.x = x2 + dx3;
        self.y = y2 + dy3;
        self.sink.curve_to(x1, y1, x2, y2, self.x, self.y);
    }

    fn rlineto(&mut self) {
        let stack = std::mem::take(&mut self.stack);
        for pair in stack.chunks_exact(2) {
            self.line(pair[0], pair[1]);
        }
    }

    // hlineto/vlineto: alternating single-axis deltas
    fn alternating_lineto(&mut self, mut horizontal: bool) {
        for delta in std::mem::take(&mut self.stack) {
            if horizontal {
                self.line(delta, 0.0);
            } else {
                self.line(0.0, delta);
            }
            horizontal = !horizontal;
        }
    }

    fn rrcurveto(&mut self) {
        let stack = std::mem::take(&mut self.stack);
        for args in stack.chunks_exact(6) {
            self.curve(args[0], args[1], args[2], args[3], args[4], args[5]);
        }
    }

    // curves then one line
    fn rcurveline(&mut self) {
        let stack = std::mem::take(&mut self.stack);
        let n_curves = (stack.len().saturating_sub(2)) / 6;
        for args in stack[..n_curves * 6].chunks_exact(6) {
            self.curve(args[0], args[1], args[2], args[3], args[4], args[5]);
        }
        if let [dx, dy] = stack[n_curves * 6..] {
            self.line(dx, dy);
        }
    }

    // lines then one curve
    fn rlinecurve(&mut self) {
        let stack = std::mem::take(&mut self.stack);
        let n_lines = (stack.len().saturating_sub(6)) / 2;
        for pair in stack[..n_lines * 2].chunks_exact(2) {
            self.line(pair[0], pair[1]);
        }
        if let [a, b, c, d, e, f] = stack[n_lines * 2..] {
            self.curve(a, b, c, d, e, f);
        }
    }

    fn vvcurveto(&mut self) {
        let stack = std::mem::take(&mut self.stack);
        let (mut dx1, rest) = if stack.len() % 4 == 1 {
            (stack[0], &stack[1..])
        } else {
            (0.0, &stack[..])
        };
        for args in rest.chunks_exact(4) {
            self.curve(dx1, args[0], args[1], args[2], 0.0, args[3]);
            dx1 = 0.0;
        }
    }

    fn hhcurveto(&mut self) {
        let stack = std::mem::take(&mut self.stack);
        let (mut dy1, rest) = if stack.len() % 4 == 1 {
            (stack[0], &stack[1..])
        } else {
            (0.0, &stack[..])
        };
        for args in rest.chunks_exact(4) {
            self.curve(args[0], dy1, args[1], args[2], args[3], 0.0);
            dy1 = 0.0;
        }
    }

    // hvcurveto/vhcurveto: curves whose tangents alternate between
    // horizontal and vertical; an odd trailing argument bends the last
    // curve's endpoint off axis
    fn alternating_curveto(&mut self, mut horizontal: bool) {
        let stack = std::mem::take(&mut self.stack);
        let mut rest = &stack[..];
        while rest.len() >= 4 {
            let last = rest.len() == 5;
            let extra = if last { rest[4] } else { 0.0 };
            let args = &rest[..4];
            if horizontal {
                self.curve(args[0], 0.0, args[1], args[2], extra, args[3]);
            } else {
                self.curve(0.0, args[0], args[1], args[2], args[3], extra);
            }
            horizontal = !horizontal;
            rest = &rest[if last { 5 } else { 4 }..];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default, Debug, PartialEq)]
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

    // encode a small integer as a charstring operand
    fn num(value: i32) -> Vec<u8> {
        match value {
            -107..=107 => vec![(value + 139) as u8],
            108..=1131 => {
                let value = value - 108;
                vec![(value / 256 + 247) as u8, (value % 256) as u8]
            }
            -1131..=-108 => {
                let value = -value - 108;
                vec![(value / 256 + 251) as u8, (value % 256) as u8]
            }
            _ => {
                let mut out = vec![28];
                out.extend_from_slice(&(value as i16).to_be_bytes());
                out
            }
        }
    }

    fn charstring(tokens: &[i32], ops: &[&[u8]]) -> Vec<u8> {
        // interleaving helper: all operands, then each operator in turn is
        // too rigid, so callers pass pre-chunked operator bytes
        let mut out: Vec<u8> = tokens.iter().flat_map(|v| num(*v)).collect();
        for op in ops {
            out.extend_from_slice(op);
        }
        out
    }

    #[test]
    fn square_outline_with_width() {
        // width 600, then a 100x100 square starting at (100, 100)
        let mut cs = Vec::new();
        cs.extend(charstring(&[600 - 500, 100, 100], &[&[21]])); // rmoveto with width
        cs.extend(charstring(&[100], &[&[6]])); // hlineto
        cs.extend(charstring(&[100], &[&[7]])); // vlineto
        cs.extend(charstring(&[-100], &[&[6]])); // hlineto
        cs.push(14); // endchar

        let mut sink = RecordingSink::default();
        let width = run_charstring(&cs, &mut sink, 500.0).unwrap();
        assert_eq!(width, Some(600.0));
        assert_eq!(
            sink.0,
            vec![
                "M 100 100",
                "L 200 100",
                "L 200 200",
                "L 100 200",
                "Z",
            ]
        );
    }

    #[test]
    fn no_width_prefix() {
        let mut cs = Vec::new();
        cs.extend(charstring(&[0, 0], &[&[21]]));
        cs.extend(charstring(&[10, 0, 10, 10, 0, 10], &[&[8]])); // rrcurveto
        cs.push(14);
        let mut sink = RecordingSink::default();
        let width = run_charstring(&cs, &mut sink, 500.0).unwrap();
        assert_eq!(width, None);
        assert_eq!(sink.0, vec!["M 0 0", "C 10 0 20 10 20 20", "Z"]);
    }

    #[test]
    fn multiple_argument_groups_per_operator() {
        // one rlineto carrying two lines, one rrcurveto carrying two curves
        let mut cs = Vec::new();
        cs.extend(charstring(&[0, 0], &[&[21]]));
        cs.extend(charstring(&[10, 0, 0, 10], &[&[5]])); // rlineto x2
        cs.extend(
            charstring(&[5, 0, 5, 5, 0, 5, 0, 5, -5, 5, -5, 0], &[&[8]]), // rrcurveto x2
        );
        cs.push(14);
        let mut sink = RecordingSink::default();
        run_charstring(&cs, &mut sink, 0.0).unwrap();
        assert_eq!(
            sink.0,
            vec![
                "M 0 0",
                "L 10 0",
                "L 10 10",
                "C 15 10 20 15 20 20",
                "C 20 25 15 30 10 30",
                "Z",
            ]
        );
    }

    #[test]
    fn hintmask_skips_mask_bytes() {
        let mut cs = Vec::new();
        cs.extend(charstring(&[0, 100, 0, 100], &[&[1]])); // two hstems
        cs.push(19); // hintmask
        cs.push(0xC0); // mask byte
        cs.extend(charstring(&[0, 0], &[&[21]]));
        cs.push(14);
        let mut sink = RecordingSink::default();
        run_charstring(&cs, &mut sink, 0.0).unwrap();
        assert_eq!(sink.0, vec!["M 0 0", "Z"]);
    }

    #[test]
    fn subroutine_calls_unsupported() {
        let mut cs = charstring(&[1], &[&[10]]);
        cs.push(14);
        let mut sink = RecordingSink::default();
        assert!(matches!(
            run_charstring(&cs, &mut sink, 0.0),
            Err(ReadError::UnsupportedFormat(10))
        ));
    }

    #[test]
    fn missing_endchar_rejected() {
        let cs = charstring(&[0, 0], &[&[21]]);
        let mut sink = RecordingSink::default();
        assert!(matches!(
            run_charstring(&cs, &mut sink, 0.0),
            Err(ReadError::MalformedData(_))
        ));
    }

    fn simple_index(items: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(items.len() as u16).to_be_bytes());
        if items.is_empty() {
            return out;
        }
        out.push(1); // offSize
        let mut offset = 1u32;
        out.push(offset as u8);
        for item in items {
            offset += item.len() as u32;
            out.push(offset as u8);
        }
        for item in items {
            out.extend_from_slice(item);
        }
        out
    }

    #[test]
    fn index_roundtrip() {
        let bytes = simple_index(&[b"abc", b"", b"de"]);
        let mut cursor = FontData::new(&bytes).cursor();
        let index = Index::read(&mut cursor).unwrap();
        assert_eq!(index.count(), 3);
        assert_eq!(index.get(0), Some(&b"abc"[..]));
        assert_eq!(index.get(1), Some(&b""[..]));
        assert_eq!(index.get(2), Some(&b"de"[..]));
        assert_eq!(index.get(3), None);
    }

    #[test]
    fn empty_index() {
        let bytes = simple_index(&[]);
        let mut cursor = FontData::new(&bytes).cursor();
        let index = Index::read(&mut cursor).unwrap();
        assert_eq!(index.count(), 0);
    }

    fn minimal_cff(charstrings: &[&[u8]]) -> Vec<u8> {
        let mut out = vec![1, 0, 4, 1]; // header
        out.extend(simple_index(&[b"test"])); // Name INDEX

        // build everything after the top dict index first so we know the
        // offsets to write into the top dict
        let string_index = simple_index(&[]);
        let gsubr_index = simple_index(&[]);
        let charstrings_index = simple_index(charstrings);
        let mut private = Vec::new();
        private.extend(dict_num(250)); // defaultWidthX
        private.push(20);
        private.extend(dict_num(500)); // nominalWidthX
        private.push(21);

        // top dict: CharStrings (17), Private (18); operands use the
        // 5-byte form so the dict length does not depend on the values
        let mut top = Vec::new();
        let top_len = 3 * 5 + 2;
        let dict_start = out.len() + top_dict_index_len(top_len);
        let charstrings_offset =
            dict_start + string_index.len() + gsubr_index.len();
        let private_offset = charstrings_offset + charstrings_index.len();
        top.extend(dict_num5(charstrings_offset as i32));
        top.push(17);
        top.extend(dict_num5(private.len() as i32));
        top.extend(dict_num5(private_offset as i32));
        top.push(18);
        assert_eq!(top.len(), top_len);

        out.extend(simple_index(&[&top]));
        out.extend(string_index);
        out.extend(gsubr_index);
        out.extend(charstrings_index);
        out.extend(private);
        out
    }

    fn top_dict_index_len(dict_len: usize) -> usize {
        // count + offSize + two one-byte offsets + data
        2 + 1 + 2 + dict_len
    }

    fn dict_num(value: i32) -> Vec<u8> {
        let mut out = vec![28];
        out.extend_from_slice(&(value as i16).to_be_bytes());
        out
    }

    fn dict_num5(value: i32) -> Vec<u8> {
        let mut out = vec![29];
        out.extend_from_slice(&value.to_be_bytes());
        out
    }

    #[test]
    fn parse_cff_and_outline() {
        let mut cs = Vec::new();
        cs.extend(charstring(&[0, 0], &[&[21]]));
        cs.extend(charstring(&[50], &[&[6]]));
        cs.push(14);
        let notdef = vec![14u8];
        let bytes = minimal_cff(&[&notdef, &cs]);
        let cff = Cff::read(FontData::new(&bytes)).unwrap();
        assert_eq!(cff.num_glyphs(), 2);
        assert_eq!(cff.default_width_x, 250.0);
        assert_eq!(cff.nominal_width_x, 500.0);

        let mut sink = RecordingSink::default();
        let width = cff.outline(GlyphId16::new(1), &mut sink).unwrap();
        assert_eq!(width, 250.0); // defaultWidthX, no width prefix
        assert_eq!(sink.0, vec!["M 0 0", "L 50 0", "Z"]);
    }
}
