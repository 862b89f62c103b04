//! Writing the kern table

use read_sfnt::tables::kern::KernPair;

use crate::util::SearchRange;
use crate::write::{FontWrite, TableWriter};

// a format 0 subtable's u16 length field caps the pair count
const MAX_PAIRS_PER_SUBTABLE: usize = (u16::MAX as usize - 14) / 6;
const SUBTABLE_HEADER_LEN: usize = 14;
const PAIR_LEN: usize = 6;

/// Builds a kern table of format 0 subtables.
///
/// Pairs are sorted by left then right glyph id, as the binary search
/// header promises. Duplicate pairs keep the last value added.
#[derive(Debug, Clone, Default)]
pub struct KernBuilder {
    pairs: Vec<KernPair>,
}

impl KernBuilder {
    pub fn new(pairs: Vec<KernPair>) -> Self {
        KernBuilder { pairs }
    }

    pub fn push(&mut self, pair: KernPair) {
        self.pairs.push(pair);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pairs = self.pairs.clone();
        // reversing first means the stable sort leaves the most recently
        // added of any duplicate pair in front, where dedup keeps it
        pairs.reverse();
        pairs.sort_by_key(|pair| (pair.left, pair.right));
        pairs.dedup_by_key(|pair| (pair.left, pair.right));

        let chunks: Vec<&[KernPair]> = pairs.chunks(MAX_PAIRS_PER_SUBTABLE).collect();
        let mut writer = TableWriter::default();
        0u16.write_into(&mut writer); // version
        (chunks.len() as u16).write_into(&mut writer);
        for chunk in chunks {
            let length = SUBTABLE_HEADER_LEN + chunk.len() * PAIR_LEN;
            0u16.write_into(&mut writer); // subtable version
            (length as u16).write_into(&mut writer);
            0x0001u16.write_into(&mut writer); // coverage: horizontal, format 0
            (chunk.len() as u16).write_into(&mut writer);
            let search = SearchRange::compute(chunk.len(), PAIR_LEN);
            search.search_range.write_into(&mut writer);
            search.entry_selector.write_into(&mut writer);
            search.range_shift.write_into(&mut writer);
            for pair in chunk {
                pair.left.write_into(&mut writer);
                pair.right.write_into(&mut writer);
                pair.value.write_into(&mut writer);
            }
        }
        writer.pad_to_4byte_aligned();
        writer.into_data()
    }
}

impl FontWrite for KernBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_slice(&self.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use read_sfnt::tables::kern::Kern;
    use read_sfnt::{FontData, FontRead};
    use sfnt_types::{FWord, GlyphId16};

    fn pair(left: u16, right: u16, value: i16) -> KernPair {
        KernPair {
            left: GlyphId16::new(left),
            right: GlyphId16::new(right),
            value: FWord::new(value),
        }
    }

    #[test]
    fn pairs_are_sorted_on_write() {
        let builder = KernBuilder::new(vec![pair(9, 1, -10), pair(1, 2, -50), pair(1, 1, 5)]);
        let bytes = builder.build();
        let kern = Kern::read(FontData::new(&bytes)).unwrap();
        assert_eq!(
            kern.pairs(),
            &[pair(1, 1, 5), pair(1, 2, -50), pair(9, 1, -10)]
        );
    }

    #[test]
    fn duplicate_pair_keeps_last() {
        let builder = KernBuilder::new(vec![pair(1, 2, -50), pair(1, 2, -60)]);
        let bytes = builder.build();
        let kern = Kern::read(FontData::new(&bytes)).unwrap();
        assert_eq!(kern.pairs().len(), 1);
        assert_eq!(
            kern.value(GlyphId16::new(1), GlyphId16::new(2)),
            Some(FWord::new(-60))
        );
    }
}
