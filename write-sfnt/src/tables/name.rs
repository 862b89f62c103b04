//! Writing the name table

use read_sfnt::tables::name::NameRecord;

use crate::write::{FontWrite, TableWriter};

/// Builds the naming table.
///
/// Strings are stored as UTF-16BE for the Windows and Unicode platforms;
/// identical encoded strings share storage.
#[derive(Debug, Clone, Default)]
pub struct NameBuilder {
    records: Vec<NameRecord>,
}

impl NameBuilder {
    pub fn new(records: Vec<NameRecord>) -> Self {
        NameBuilder { records }
    }

    /// Add a logical name as a Unicode BMP record paired with a Windows
    /// Unicode BMP english record.
    ///
    /// Both encode to the same UTF-16BE bytes, so they share one stored
    /// string.
    pub fn add(&mut self, name_id: u16, value: impl Into<String>) {
        let value = value.into();
        self.records.push(NameRecord {
            platform_id: 0,
            encoding_id: 3,
            language_id: 0,
            name_id,
            value: value.clone(),
        });
        self.records.push(NameRecord {
            platform_id: 3,
            encoding_id: 1,
            language_id: 0x0409,
            name_id,
            value,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut records = self.records.clone();
        // records must be sorted by platform, encoding, language, name
        records.sort_by_key(|rec| {
            (
                rec.platform_id,
                rec.encoding_id,
                rec.language_id,
                rec.name_id,
            )
        });

        let mut storage: Vec<u8> = Vec::new();
        let mut writer = TableWriter::default();
        0u16.write_into(&mut writer); // format
        (records.len() as u16).write_into(&mut writer);
        let storage_offset = 6 + records.len() * 12;
        (storage_offset as u16).write_into(&mut writer);
        for record in &records {
            let encoded = encode(record);
            // reuse storage if another record produced the same bytes
            let offset = find_subsequence(&storage, &encoded).unwrap_or_else(|| {
                let offset = storage.len();
                storage.extend_from_slice(&encoded);
                offset
            });
            record.platform_id.write_into(&mut writer);
            record.encoding_id.write_into(&mut writer);
            record.language_id.write_into(&mut writer);
            record.name_id.write_into(&mut writer);
            (encoded.len() as u16).write_into(&mut writer);
            (offset as u16).write_into(&mut writer);
        }
        writer.write_slice(&storage);
        writer.pad_to_4byte_aligned();
        writer.into_data()
    }
}

impl FontWrite for NameBuilder {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_slice(&self.build());
    }
}

fn encode(record: &NameRecord) -> Vec<u8> {
    if record.platform_id == 1 {
        record.value.chars().map(|c| c as u8).collect()
    } else {
        record
            .value
            .encode_utf16()
            .flat_map(|unit| unit.to_be_bytes())
            .collect()
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use read_sfnt::tables::name::{name_id, Name};
    use read_sfnt::{FontData, FontRead};

    #[test]
    fn roundtrip() {
        let mut builder = NameBuilder::default();
        builder.add(name_id::FAMILY, "Plume Sans");
        builder.add(name_id::SUBFAMILY, "Regular");
        builder.add(name_id::FULL_NAME, "Plume Sans Regular");
        let bytes = builder.build();
        let name = Name::read(FontData::new(&bytes)).unwrap();
        assert_eq!(name.string(name_id::FAMILY), Some("Plume Sans"));
        assert_eq!(name.string(name_id::SUBFAMILY), Some("Regular"));
        assert_eq!(name.string(name_id::FULL_NAME), Some("Plume Sans Regular"));
    }

    #[test]
    fn unicode_and_windows_records_paired() {
        let mut builder = NameBuilder::default();
        builder.add(name_id::FAMILY, "Plume Sans");
        let bytes = builder.build();
        let name = Name::read(FontData::new(&bytes)).unwrap();
        let ids: Vec<_> = name
            .records()
            .iter()
            .map(|rec| (rec.platform_id, rec.encoding_id, rec.language_id))
            .collect();
        assert_eq!(ids, vec![(0, 3, 0), (3, 1, 0x0409)]);
        assert!(name.records().iter().all(|rec| rec.value == "Plume Sans"));
        // 6 byte header, two 12 byte records, one shared 20 byte string,
        // padded to a 4 byte boundary
        assert_eq!(bytes.len(), 52);
    }

    #[test]
    fn identical_strings_share_storage() {
        let mut one = NameBuilder::default();
        one.add(name_id::FAMILY, "Plume");
        one.add(name_id::FULL_NAME, "Other");
        let mut two = NameBuilder::default();
        two.add(name_id::FAMILY, "Plume");
        two.add(name_id::FULL_NAME, "Plume");
        // the duplicated string costs no extra storage
        assert!(two.build().len() < one.build().len());
    }
}
