// src/raw_data/cursor.rs
use crate::error::{CfsError, Result};
use crate::utils::decode_cfs_string;
use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;

/// Offset-based little-endian reader over an immutable byte buffer
///
/// CFS is pointer-based, so every structure is reached by seeking to an
/// absolute offset and reading fixed-width fields from there. Cloning a
/// cursor (or calling [`ByteCursor::at`]) shares the underlying buffer,
/// which lets independent readers work over the same file without copying.
///
/// # Example
///
/// ```
/// use cfs_rs::raw_data::ByteCursor;
///
/// let mut cursor = ByteCursor::new(vec![0x34, 0x12, 3, b'a', b'b', b'c']);
/// assert_eq!(cursor.read_u16().unwrap(), 0x1234);
/// assert_eq!(cursor.read_length_prefixed_string().unwrap(), "abc");
/// assert_eq!(cursor.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor {
    data: Bytes,
    pos: usize,
}

impl ByteCursor {
    pub fn new(data: impl Into<Bytes>) -> Self {
        ByteCursor {
            data: data.into(),
            pos: 0,
        }
    }

    /// A new cursor over the same buffer, positioned at `offset`
    pub fn at(&self, offset: usize) -> Result<Self> {
        let mut cursor = ByteCursor {
            data: self.data.clone(),
            pos: 0,
        };
        cursor.seek(offset)?;
        Ok(cursor)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Move to an absolute offset. Seeking to the very end is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(CfsError::InvalidOffset {
                offset,
                len: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    fn take(&mut self, count: usize) -> Result<&[u8]> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or(CfsError::OutOfBounds {
                offset: self.pos,
                requested: count,
                len: self.data.len(),
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Borrow `count` bytes without copying
    pub fn read_bytes(&mut self, count: usize) -> Result<Bytes> {
        let start = self.pos;
        self.take(count)?;
        Ok(self.data.slice(start..start + count))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Read `len` raw characters, trimming trailing NULs and spaces
    pub fn read_fixed_string(&mut self, len: usize) -> Result<String> {
        Ok(decode_cfs_string(self.take(len)?))
    }

    /// Read a length byte followed by that many characters
    pub fn read_length_prefixed_string(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        self.read_fixed_string(len)
    }

    /// Read a length-prefixed string stored in a field of `field_len` bytes.
    ///
    /// The cursor always advances by the full field width. A length byte
    /// larger than the field is clamped to it.
    pub fn read_lstr_field(&mut self, field_len: usize) -> Result<String> {
        let field = self.take(field_len)?;
        let Some((&len, chars)) = field.split_first() else {
            return Ok(String::new());
        };
        let len = (len as usize).min(chars.len());
        Ok(decode_cfs_string(&chars[..len]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_integers_little_endian() {
        let data = vec![
            0xFFu8,                 // i8 -1
            0x01, 0x80,             // u16 0x8001
            0xFE, 0xFF,             // i16 -2
            0x78, 0x56, 0x34, 0x12, // u32 0x12345678
            0xFD, 0xFF, 0xFF, 0xFF, // i32 -3
        ];
        let mut cursor = ByteCursor::new(data);

        assert_eq!(cursor.read_i8().unwrap(), -1);
        assert_eq!(cursor.read_u16().unwrap(), 0x8001);
        assert_eq!(cursor.read_i16().unwrap(), -2);
        assert_eq!(cursor.read_u32().unwrap(), 0x12345678);
        assert_eq!(cursor.read_i32().unwrap(), -3);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_read_floats() {
        let mut data = 1.5f32.to_le_bytes().to_vec();
        data.extend_from_slice(&(-0.25f64).to_le_bytes());
        let mut cursor = ByteCursor::new(data);

        assert_eq!(cursor.read_f32().unwrap(), 1.5);
        assert_eq!(cursor.read_f64().unwrap(), -0.25);
    }

    #[test]
    fn test_read_past_end() {
        let mut cursor = ByteCursor::new(vec![1u8, 2, 3]);
        cursor.read_u16().unwrap();

        let err = cursor.read_u16().unwrap_err();
        assert_eq!(err, CfsError::OutOfBounds { offset: 2, requested: 2, len: 3 });
        // A failed read does not move the cursor
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.read_u8().unwrap(), 3);
    }

    #[test]
    fn test_seek() {
        let mut cursor = ByteCursor::new(vec![10u8, 20, 30]);
        cursor.seek(2).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 30);

        cursor.seek(3).unwrap();
        assert_eq!(cursor.remaining(), 0);

        let err = cursor.seek(4).unwrap_err();
        assert_eq!(err, CfsError::InvalidOffset { offset: 4, len: 3 });
    }

    #[test]
    fn test_independent_cursors_share_buffer() {
        let cursor = ByteCursor::new(vec![1u8, 2, 3, 4]);
        let mut a = cursor.at(1).unwrap();
        let mut b = cursor.at(3).unwrap();

        assert_eq!(a.read_u8().unwrap(), 2);
        assert_eq!(b.read_u8().unwrap(), 4);
        assert_eq!(a.position(), 2);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_strings() {
        let mut cursor = ByteCursor::new(b"CEDFILE\"\x03EMG\0\0\0\x02mVxyz".to_vec());
        assert_eq!(cursor.read_fixed_string(8).unwrap(), "CEDFILE\"");

        // Field of 7 bytes: length 3, "EMG", padding
        assert_eq!(cursor.read_lstr_field(7).unwrap(), "EMG");
        assert_eq!(cursor.read_length_prefixed_string().unwrap(), "mV");
        assert_eq!(cursor.read_fixed_string(3).unwrap(), "xyz");
    }

    #[test]
    fn test_lstr_field_clamps_length() {
        let mut cursor = ByteCursor::new(vec![200u8, b'a', b'b']);
        assert_eq!(cursor.read_lstr_field(3).unwrap(), "ab");
        assert_eq!(cursor.remaining(), 0);
    }

    proptest! {
        #[test]
        fn reads_never_exceed_buffer(len in 0usize..64, start in 0usize..80, width in 0usize..16) {
            let mut cursor = ByteCursor::new(vec![0u8; len]);
            match cursor.seek(start) {
                Ok(()) => {
                    let result = cursor.read_bytes(width);
                    prop_assert_eq!(result.is_ok(), start + width <= len);
                }
                Err(e) => {
                    prop_assert!(start > len);
                    prop_assert_eq!(e, CfsError::InvalidOffset { offset: start, len });
                }
            }
        }
    }
}
