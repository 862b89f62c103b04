//! Serializing font tables

use sfnt_types::{F2Dot14, FWord, Fixed, GlyphId16, LongDateTime, Tag, UfWord};

use crate::validate::{Validate, ValidationReport};

/// A type that can be serialized to raw table bytes.
pub trait FontWrite {
    fn write_into(&self, writer: &mut TableWriter);
}

/// An accumulator for table bytes.
#[derive(Debug, Default)]
pub struct TableWriter {
    data: Vec<u8>,
}

impl TableWriter {
    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pad the length to a multiple of two with a zero byte.
    pub fn pad_to_2byte_aligned(&mut self) {
        if self.data.len() % 2 != 0 {
            self.data.push(0);
        }
    }

    /// Pad the length to a multiple of four with zero bytes.
    pub fn pad_to_4byte_aligned(&mut self) {
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Validate a table, then serialize it to bytes.
pub fn dump_table<T: FontWrite + Validate>(table: &T) -> Result<Vec<u8>, ValidationReport> {
    table.validate()?;
    let mut writer = TableWriter::default();
    table.write_into(&mut writer);
    Ok(writer.into_data())
}

macro_rules! write_be_bytes {
    ($writer:expr, $item:expr) => {
        $writer.write_slice(&$item.to_be_bytes())
    };
}

macro_rules! int_writable {
    ($ty:ty) => {
        impl FontWrite for $ty {
            fn write_into(&self, writer: &mut TableWriter) {
                write_be_bytes!(writer, self);
            }
        }
    };
    ($ty:ty, $($more:ty),+) => {
        int_writable!($ty);
        int_writable!($($more),+);
    };
}

int_writable!(u8, i8, u16, i16, u32, i32, i64);
int_writable!(Tag, Fixed, F2Dot14, FWord, UfWord, GlyphId16, LongDateTime);

impl<T: FontWrite> FontWrite for [T] {
    fn write_into(&self, writer: &mut TableWriter) {
        for item in self {
            item.write_into(writer);
        }
    }
}
