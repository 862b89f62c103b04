//! A builder for top-level font objects

use std::borrow::Cow;
use std::collections::BTreeMap;

use read_sfnt::compute_checksum;
use sfnt_types::{Tag, CFF_SFNT_VERSION, TT_SFNT_VERSION};

use crate::util::SearchRange;

const TABLE_RECORD_LEN: usize = 16;
const TABLE_DIRECTORY_HEADER_LEN: usize = 12;
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;
const HEAD: Tag = Tag::new(b"head");
const CFF: Tag = Tag::new(b"CFF ");

/// Build a font file from a collection of raw tables.
///
/// The builder emits the table directory sorted by tag, pads each table to
/// a four byte boundary, fills in per-table checksums, and patches
/// checksumAdjustment in the head table so the whole file sums to the
/// required constant.
#[derive(Debug, Default)]
pub struct FontBuilder<'a> {
    tables: BTreeMap<Tag, Cow<'a, [u8]>>,
}

impl<'a> FontBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with the given tag, replacing any existing table.
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Cow<'a, [u8]>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// Assemble the final font.
    pub fn build(&mut self) -> Vec<u8> {
        // a CFF outline table decides the whole container's flavor
        let sfnt_version = if self.contains(CFF) {
            CFF_SFNT_VERSION
        } else {
            TT_SFNT_VERSION
        };
        // the adjustment field must be zero while checksums are computed;
        // it is patched at the end
        if let Some(head) = self.tables.get_mut(&HEAD) {
            if head.len() >= 12 {
                head.to_mut()[8..12].fill(0);
            }
        }
        let n_tables = self.tables.len() as u16;
        let search = SearchRange::compute(n_tables as usize, TABLE_RECORD_LEN);

        let mut position =
            (TABLE_DIRECTORY_HEADER_LEN + self.tables.len() * TABLE_RECORD_LEN) as u32;
        let mut head_offset = None;

        let mut writer = Vec::with_capacity(position as usize);
        writer.extend_from_slice(&sfnt_version.to_be_bytes());
        writer.extend_from_slice(&n_tables.to_be_bytes());
        writer.extend_from_slice(&search.search_range.to_be_bytes());
        writer.extend_from_slice(&search.entry_selector.to_be_bytes());
        writer.extend_from_slice(&search.range_shift.to_be_bytes());

        // the directory is sorted by tag, which the BTreeMap gives us
        for (tag, data) in &self.tables {
            if *tag == HEAD {
                head_offset = Some(position);
            }
            let checksum = compute_checksum(data.as_ref());
            writer.extend_from_slice(&tag.to_be_bytes());
            writer.extend_from_slice(&checksum.to_be_bytes());
            writer.extend_from_slice(&position.to_be_bytes());
            writer.extend_from_slice(&(data.len() as u32).to_be_bytes());
            position += padded_len(data.len()) as u32;
        }

        for data in self.tables.values() {
            writer.extend_from_slice(data.as_ref());
            let padding = padded_len(data.len()) - data.len();
            writer.extend_from_slice(&[0u8; 4][..padding]);
        }

        if let Some(head_offset) = head_offset {
            let adjustment_offset = head_offset as usize + 8;
            let file_checksum = compute_checksum(&writer);
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(file_checksum);
            writer[adjustment_offset..adjustment_offset + 4]
                .copy_from_slice(&adjustment.to_be_bytes());
        }
        self.tables.clear();
        writer
    }
}

fn padded_len(len: usize) -> usize {
    len + 3 & !3
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use read_sfnt::{FontRead, FontRef, TableDirectory};

    fn fake_head() -> Vec<u8> {
        let mut head = vec![0u8; 54];
        head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
        head[18..20].copy_from_slice(&1000u16.to_be_bytes());
        head
    }

    #[test]
    fn directory_is_sorted_and_padded() {
        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"zzzz"), vec![1u8, 2, 3]);
        builder.add_raw(Tag::new(b"aaaa"), vec![4u8; 8]);
        let font = builder.build();
        let font = FontRef::from_bytes(&font).unwrap();
        let tags: Vec<_> = font
            .table_directory()
            .table_records()
            .iter()
            .map(|rec| rec.tag)
            .collect();
        assert_eq!(tags, [Tag::new(b"aaaa"), Tag::new(b"zzzz")]);
        // offsets are four byte aligned
        for rec in font.table_directory().table_records() {
            assert_eq!(rec.offset % 4, 0);
        }
        assert_eq!(
            font.table_data(Tag::new(b"zzzz")).unwrap().as_bytes(),
            &[1, 2, 3]
        );
    }

    #[test]
    fn whole_file_sums_to_magic() {
        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"head"), fake_head());
        builder.add_raw(Tag::new(b"maxp"), vec![0u8, 0, 0x50, 0, 0, 4]);
        let font = builder.build();
        assert_eq!(compute_checksum(&font), CHECKSUM_MAGIC);
    }

    #[test]
    fn table_checksums_verify() {
        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"head"), fake_head());
        builder.add_raw(Tag::new(b"maxp"), vec![0u8, 0, 0x50, 0, 0, 4]);
        let font = builder.build();
        let font = FontRef::from_bytes(&font).unwrap();
        assert!(font.verify_checksums().is_empty());
    }

    #[test]
    fn cff_table_selects_otto() {
        let mut builder = FontBuilder::new();
        builder.add_raw(Tag::new(b"CFF "), vec![1u8]);
        let font = builder.build();
        let directory = TableDirectory::read(read_sfnt::FontData::new(&font));
        assert!(directory.unwrap().is_cff());
    }
}
