//! The sfnt table directory

use sfnt_types::{Tag, CFF_SFNT_VERSION, TT_SFNT_VERSION};

use crate::font_data::FontData;
use crate::read::{FontRead, ReadError};

/// A single record in the table directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// The table directory at the start of an sfnt file.
#[derive(Debug, Clone)]
pub struct TableDirectory {
    pub sfnt_version: u32,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
    records: Vec<TableRecord>,
}

impl TableDirectory {
    pub fn table_records(&self) -> &[TableRecord] {
        &self.records
    }

    /// `true` if the outlines are CFF (cubic), `false` if TrueType (quadratic).
    pub fn is_cff(&self) -> bool {
        self.sfnt_version == CFF_SFNT_VERSION
    }
}

impl<'a> FontRead<'a> for TableDirectory {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        if sfnt_version != TT_SFNT_VERSION && sfnt_version != CFF_SFNT_VERSION {
            return Err(ReadError::InvalidSfnt(sfnt_version));
        }
        let num_tables: u16 = cursor.read()?;
        let search_range: u16 = cursor.read()?;
        let entry_selector: u16 = cursor.read()?;
        let range_shift: u16 = cursor.read()?;
        let mut records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            records.push(TableRecord {
                tag: cursor.read()?,
                checksum: cursor.read()?,
                offset: cursor.read()?,
                length: cursor.read()?,
            });
        }
        Ok(TableDirectory {
            sfnt_version,
            search_range,
            entry_selector,
            range_shift,
            records,
        })
    }
}

/// A stored table checksum that does not match the bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumMismatch {
    pub tag: Tag,
    pub stored: u32,
    pub computed: u32,
}

/// A parsed table directory together with the font bytes it indexes.
pub struct FontRef<'a> {
    data: FontData<'a>,
    directory: TableDirectory,
}

impl<'a> FontRef<'a> {
    /// Parse the table directory and validate each record against the data
    /// bounds.
    ///
    /// A record whose byte range runs past the end of the data, or which
    /// overlaps the directory itself or another table, is a hard error.
    /// Checksums are not verified here; see
    /// [`verify_checksums`](Self::verify_checksums).
    pub fn new(data: FontData<'a>) -> Result<Self, ReadError> {
        let directory = TableDirectory::read(data)?;
        let directory_end = 12 + directory.records.len() * 16;
        let mut ranges = Vec::with_capacity(directory.records.len());
        for record in directory.table_records() {
            let start = record.offset as usize;
            let end = start
                .checked_add(record.length as usize)
                .ok_or(ReadError::OutOfBounds)?;
            if end > data.len() {
                return Err(ReadError::OutOfBounds);
            }
            if start < directory_end {
                return Err(ReadError::MalformedData(
                    "table data overlaps the table directory",
                ));
            }
            ranges.push((start, end));
        }
        ranges.sort_unstable();
        for pair in ranges.windows(2) {
            if pair[1].0 < pair[0].1 {
                return Err(ReadError::MalformedData(
                    "table records have overlapping byte ranges",
                ));
            }
        }
        Ok(FontRef { data, directory })
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, ReadError> {
        Self::new(FontData::new(bytes))
    }

    pub fn table_directory(&self) -> &TableDirectory {
        &self.directory
    }

    fn record_for(&self, tag: Tag) -> Option<&TableRecord> {
        // records are sorted by tag in well formed fonts, but we do not
        // rely on that here
        self.directory.records.iter().find(|rec| rec.tag == tag)
    }

    /// The raw data for the table with this tag, if present.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let record = self.record_for(tag)?;
        let start = record.offset as usize;
        self.data.slice(start..start + record.length as usize)
    }

    /// Required table lookup; errors with the missing tag.
    pub fn expect_table_data(&self, tag: Tag) -> Result<FontData<'a>, ReadError> {
        self.table_data(tag).ok_or(ReadError::TableIsMissing(tag))
    }

    /// Recompute every table checksum and report the ones that disagree
    /// with the directory.
    ///
    /// For the head table the checksumAdjustment field is treated as zero,
    /// matching how the stored value was computed.
    pub fn verify_checksums(&self) -> Vec<ChecksumMismatch> {
        const HEAD: Tag = Tag::new(b"head");
        let mut mismatches = Vec::new();
        for record in self.directory.table_records() {
            let Some(data) = self.table_data(record.tag) else {
                continue;
            };
            let computed = if record.tag == HEAD {
                checksum_head(data.as_bytes())
            } else {
                compute_checksum(data.as_bytes())
            };
            if computed != record.checksum {
                log::warn!(
                    "checksum mismatch for '{}': stored {:08X}, computed {:08X}",
                    record.tag,
                    record.checksum,
                    computed
                );
                mismatches.push(ChecksumMismatch {
                    tag: record.tag,
                    stored: record.checksum,
                    computed,
                });
            }
        }
        mismatches
    }
}

/// Compute the checksum of a table.
///
/// The data is treated as a sequence of big-endian u32 words, zero padded
/// to a four byte boundary, summed with wrapping arithmetic.
pub fn compute_checksum(table: &[u8]) -> u32 {
    let mut sum = 0u32;
    let mut iter = table.chunks_exact(4);
    for quad in &mut iter {
        // unwrap is safe, we know this is a four byte slice
        let array: [u8; 4] = quad.try_into().unwrap();
        sum = sum.wrapping_add(u32::from_be_bytes(array));
    }
    let rem = match *iter.remainder() {
        [a] => u32::from_be_bytes([a, 0, 0, 0]),
        [a, b] => u32::from_be_bytes([a, b, 0, 0]),
        [a, b, c] => u32::from_be_bytes([a, b, c, 0]),
        _ => 0,
    };
    sum.wrapping_add(rem)
}

// checksumAdjustment lives at byte offset 8 and is zeroed for the purposes
// of the head table's own checksum.
fn checksum_head(table: &[u8]) -> u32 {
    let adjustment = table
        .get(8..12)
        .map(|bytes| u32::from_be_bytes(bytes.try_into().unwrap()))
        .unwrap_or_default();
    compute_checksum(table).wrapping_sub(adjustment)
}
