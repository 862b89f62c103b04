//! The [name](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table

use sfnt_types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// Well known name identifiers.
pub mod name_id {
    pub const COPYRIGHT: u16 = 0;
    pub const FAMILY: u16 = 1;
    pub const SUBFAMILY: u16 = 2;
    pub const UNIQUE_ID: u16 = 3;
    pub const FULL_NAME: u16 = 4;
    pub const VERSION: u16 = 5;
    pub const POSTSCRIPT_NAME: u16 = 6;
}

/// A single decoded name record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub value: String,
}

/// The naming table, decoded eagerly to strings.
///
/// Records with encodings we cannot decode are dropped; only Macintosh
/// Roman and the UTF-16BE Unicode/Windows encodings are handled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name {
    records: Vec<NameRecord>,
}

impl TopLevelTable for Name {
    const TAG: Tag = Tag::new(b"name");
}

const PLATFORM_UNICODE: u16 = 0;
const PLATFORM_MACINTOSH: u16 = 1;
const PLATFORM_WINDOWS: u16 = 3;

impl<'a> FontRead<'a> for Name {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format > 1 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        let count: u16 = cursor.read()?;
        let storage_offset: u16 = cursor.read()?;
        let storage = data
            .split_off(storage_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let platform_id: u16 = cursor.read()?;
            let encoding_id: u16 = cursor.read()?;
            let language_id: u16 = cursor.read()?;
            let name_id: u16 = cursor.read()?;
            let length: u16 = cursor.read()?;
            let offset: u16 = cursor.read()?;
            let raw = storage
                .slice(offset as usize..offset as usize + length as usize)
                .ok_or(ReadError::OutOfBounds)?;
            let Some(value) = decode_string(platform_id, encoding_id, raw.as_bytes()) else {
                log::warn!(
                    "dropping name record with platform {platform_id}, encoding {encoding_id}"
                );
                continue;
            };
            records.push(NameRecord {
                platform_id,
                encoding_id,
                language_id,
                name_id,
                value,
            });
        }
        Ok(Name { records })
    }
}

impl Name {
    pub fn records(&self) -> &[NameRecord] {
        &self.records
    }

    /// The best available string for this name id.
    ///
    /// Windows english records are preferred, then any Unicode record,
    /// then anything at all.
    pub fn string(&self, name_id: u16) -> Option<&str> {
        let candidates = || self.records.iter().filter(|rec| rec.name_id == name_id);
        candidates()
            .find(|rec| rec.platform_id == PLATFORM_WINDOWS && rec.language_id == 0x0409)
            .or_else(|| candidates().find(|rec| rec.platform_id == PLATFORM_UNICODE))
            .or_else(|| candidates().next())
            .map(|rec| rec.value.as_str())
    }
}

fn decode_string(platform_id: u16, encoding_id: u16, raw: &[u8]) -> Option<String> {
    match (platform_id, encoding_id) {
        (PLATFORM_UNICODE, _) | (PLATFORM_WINDOWS, 0 | 1 | 10) => decode_utf16_be(raw),
        // Macintosh Roman agrees with Latin-1 for the ASCII range, which
        // is all we expect to encounter
        (PLATFORM_MACINTOSH, 0) => Some(raw.iter().map(|b| *b as char).collect()),
        _ => None,
    }
}

fn decode_utf16_be(raw: &[u8]) -> Option<String> {
    if raw.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = raw
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn utf16(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
    }

    fn name_table(records: &[(u16, u16, u16, u16, &[u8])]) -> Vec<u8> {
        let mut header = Vec::new();
        header.extend_from_slice(&0u16.to_be_bytes());
        header.extend_from_slice(&(records.len() as u16).to_be_bytes());
        let storage_offset = 6 + records.len() * 12;
        header.extend_from_slice(&(storage_offset as u16).to_be_bytes());
        let mut storage = Vec::new();
        for (platform, encoding, language, name, value) in records {
            header.extend_from_slice(&platform.to_be_bytes());
            header.extend_from_slice(&encoding.to_be_bytes());
            header.extend_from_slice(&language.to_be_bytes());
            header.extend_from_slice(&name.to_be_bytes());
            header.extend_from_slice(&(value.len() as u16).to_be_bytes());
            header.extend_from_slice(&(storage.len() as u16).to_be_bytes());
            storage.extend_from_slice(value);
        }
        header.extend_from_slice(&storage);
        header
    }

    #[test]
    fn windows_english_preferred() {
        let mac = b"Mac Family".to_vec();
        let win = utf16("Win Family");
        let bytes = name_table(&[
            (1, 0, 0, name_id::FAMILY, &mac),
            (3, 1, 0x0409, name_id::FAMILY, &win),
        ]);
        let name = Name::read(FontData::new(&bytes)).unwrap();
        assert_eq!(name.string(name_id::FAMILY), Some("Win Family"));
        assert_eq!(name.string(name_id::SUBFAMILY), None);
    }

    #[test]
    fn undecodable_encoding_dropped() {
        let raw = vec![0x82, 0xa0]; // Shift-JIS
        let bytes = name_table(&[(3, 2, 0x0411, name_id::FAMILY, &raw)]);
        let name = Name::read(FontData::new(&bytes)).unwrap();
        assert!(name.records().is_empty());
    }

    #[test]
    fn storage_bounds_checked() {
        let win = utf16("x");
        let mut bytes = name_table(&[(3, 1, 0x0409, name_id::FAMILY, &win)]);
        let len = bytes.len();
        bytes.truncate(len - 1);
        assert!(matches!(
            Name::read(FontData::new(&bytes)),
            Err(ReadError::OutOfBounds)
        ));
    }
}
