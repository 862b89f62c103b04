//! raw font bytes

use std::ops::RangeBounds;

use sfnt_types::Scalar;

use crate::read::ReadError;

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The data from `pos` onwards, or `None` if `pos` is out of bounds.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData { bytes })
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    /// Read a scalar at the provided byte offset.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        self.bytes
            .get(..offset)
            .ok_or(ReadError::OutOfBounds)
            .map(|_| ())
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub fn advance<T: Scalar>(&mut self) {
        self.pos += T::RAW_BYTE_LEN
    }

    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos += n_bytes;
    }

    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.pos += T::RAW_BYTE_LEN;
        temp
    }

    /// Read `len` scalars into a vec.
    pub fn read_array<T: Scalar>(&mut self, len: usize) -> Result<Vec<T>, ReadError> {
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.read::<T>()?);
        }
        Ok(out)
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let temp = self
            .data
            .bytes
            .get(self.pos..self.pos + len)
            .ok_or(ReadError::OutOfBounds);
        self.pos += len;
        temp
    }

    /// return the current position, or an error if we are out of bounds
    pub fn position(&self) -> Result<usize, ReadError> {
        self.data.check_in_bounds(self.pos).map(|_| self.pos)
    }

    /// The bytes not yet consumed, which must be at the end of a table.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// `true` if the cursor has consumed the whole buffer or more.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        FontData::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_advance() {
        let bytes = [0u8, 1, 0, 2, 0xff];
        let mut cursor = FontData::new(&bytes).cursor();
        assert_eq!(cursor.read::<u16>().unwrap(), 1);
        assert_eq!(cursor.read::<u16>().unwrap(), 2);
        assert_eq!(cursor.read::<u8>().unwrap(), 0xff);
        assert!(matches!(
            cursor.read::<u8>(),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn slice_is_bounds_checked() {
        let data = FontData::new(&[1, 2, 3]);
        assert!(data.slice(0..4).is_none());
        assert_eq!(data.slice(1..3).unwrap().as_bytes(), &[2, 3]);
        assert!(data.split_off(4).is_none());
    }
}
