//! Embedded OpenType wrapper
//!
//! EOT is a little-endian header prepended to an unmodified TrueType
//! binary. Only the uncompressed version 2.1 layout is produced, with an
//! empty root string so the font is not origin-bound.

use sfnt_types::Tag;

const EOT_VERSION: u32 = 0x0002_0001;
const MAGIC_NUMBER: u16 = 0x504C;
const WEIGHT_NORMAL: u32 = 400;
const DEFAULT_CHARSET: u8 = 0x01;

use crate::font::Font;

/// Prepend an EOT header to a finished TrueType binary.
pub fn wrap_ttf(font: &Font, ttf: &[u8]) -> Vec<u8> {
    let family = utf16le(&font.family_name);
    let style = utf16le(&font.style_name);
    let version_name = utf16le("Version 1.0");
    let full_name = utf16le(&full_name(font));

    // fixed-size fields up to the name strings
    let fixed_len = 82;
    let names_len = family.len() + style.len() + version_name.len() + full_name.len();
    // a size and a padding word per name, plus the empty root string
    let total = fixed_len + names_len + 4 * 4 + 2 + ttf.len();

    let mut out = Vec::with_capacity(total);
    push_u32(&mut out, total as u32);
    push_u32(&mut out, ttf.len() as u32);
    push_u32(&mut out, EOT_VERSION);
    push_u32(&mut out, 0); // flags
    out.extend_from_slice(&[0u8; 10]); // PANOSE
    out.push(DEFAULT_CHARSET);
    out.push(0); // italic
    push_u32(&mut out, WEIGHT_NORMAL);
    push_u16(&mut out, 0); // fsType, no embedding restrictions
    push_u16(&mut out, MAGIC_NUMBER);
    for _ in 0..4 {
        push_u32(&mut out, 0); // UnicodeRange
    }
    push_u32(&mut out, 0x0000_0001); // CodePageRange1, latin
    push_u32(&mut out, 0); // CodePageRange2
    push_u32(&mut out, checksum_adjustment(ttf));
    for _ in 0..4 {
        push_u32(&mut out, 0); // reserved
    }
    push_u16(&mut out, 0); // padding
    debug_assert_eq!(out.len(), fixed_len);

    for name in [&family, &style, &version_name, &full_name] {
        push_u16(&mut out, name.len() as u16);
        out.extend_from_slice(name);
        push_u16(&mut out, 0); // padding
    }
    push_u16(&mut out, 0); // root string size

    debug_assert_eq!(out.len() + ttf.len(), total);
    out.extend_from_slice(ttf);
    out
}

fn full_name(font: &Font) -> String {
    if font.style_name.is_empty() || font.style_name == "Regular" {
        font.family_name.clone()
    } else {
        format!("{} {}", font.family_name, font.style_name)
    }
}

/// The checkSumAdjustment from the wrapped font's head table, which EOT
/// duplicates in its header.
fn checksum_adjustment(ttf: &[u8]) -> u32 {
    read_sfnt::FontRef::from_bytes(ttf)
        .ok()
        .and_then(|font| font.table_data(Tag::new(b"head")))
        .and_then(|data| data.read_at::<u32>(8).ok())
        .unwrap_or_default()
}

fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}
