//! Primitive decoding and reader configuration

use crate::error::{BinaryError, Result};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Byte order for reading binary data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ByteOrder {
    /// Big endian (network byte order)
    Big,
    /// Little endian (most common on x86/x64)
    #[default]
    Little,
}

/// Default cap on decoded array counts
pub const DEFAULT_MAX_ARRAY_LEN: usize = 1_000_000;

/// Default cap on decoded string lengths (64 MiB)
pub const DEFAULT_MAX_STRING_LEN: usize = 64 * 1024 * 1024;

/// Settings shared by every reader created from one context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Byte order of the object data
    pub byte_order: ByteOrder,
    /// Largest array count accepted before failing with `ResourceLimitExceeded`
    pub max_array_len: usize,
    /// Largest string length accepted before failing with `ResourceLimitExceeded`
    pub max_string_len: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
            max_string_len: DEFAULT_MAX_STRING_LEN,
        }
    }
}

impl ReaderConfig {
    /// Config for big-endian data
    pub fn big_endian() -> Self {
        Self {
            byte_order: ByteOrder::Big,
            ..Self::default()
        }
    }

    /// Set the array count cap
    pub fn with_max_array_len(mut self, max: usize) -> Self {
        self.max_array_len = max;
        self
    }

    /// Set the string length cap
    pub fn with_max_string_len(mut self, max: usize) -> Self {
        self.max_string_len = max;
        self
    }
}

/// Binary reader over a fetched byte range
///
/// Leaf values are fetched from a source as one short range and decoded here
/// in the configured byte order.
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
    byte_order: ByteOrder,
}

impl<'a> BinaryReader<'a> {
    /// Create a new binary reader from byte slice
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        Self {
            cursor: Cursor::new(data),
            byte_order,
        }
    }

    /// Get current position in the range
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Get the total length of the range
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    /// Check if the range is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get remaining bytes from current position
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position() as usize)
    }

    /// Get the byte order
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn short_read(&self, wanted: usize) -> BinaryError {
        BinaryError::truncated(self.position(), wanted as u64, self.len() as u64)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(|_| self.short_read(1))
    }

    /// Read a signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        self.cursor.read_i8().map_err(|_| self.short_read(1))
    }

    /// Read a boolean (any non-zero byte is true)
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read u16
    pub fn read_u16(&mut self) -> Result<u16> {
        let value = match self.byte_order {
            ByteOrder::Big => self.cursor.read_u16::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_u16::<LittleEndian>(),
        };
        value.map_err(|_| self.short_read(2))
    }

    /// Read i16
    pub fn read_i16(&mut self) -> Result<i16> {
        let value = match self.byte_order {
            ByteOrder::Big => self.cursor.read_i16::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_i16::<LittleEndian>(),
        };
        value.map_err(|_| self.short_read(2))
    }

    /// Read u32
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = match self.byte_order {
            ByteOrder::Big => self.cursor.read_u32::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_u32::<LittleEndian>(),
        };
        value.map_err(|_| self.short_read(4))
    }

    /// Read i32
    pub fn read_i32(&mut self) -> Result<i32> {
        let value = match self.byte_order {
            ByteOrder::Big => self.cursor.read_i32::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_i32::<LittleEndian>(),
        };
        value.map_err(|_| self.short_read(4))
    }

    /// Read u64
    pub fn read_u64(&mut self) -> Result<u64> {
        let value = match self.byte_order {
            ByteOrder::Big => self.cursor.read_u64::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_u64::<LittleEndian>(),
        };
        value.map_err(|_| self.short_read(8))
    }

    /// Read i64
    pub fn read_i64(&mut self) -> Result<i64> {
        let value = match self.byte_order {
            ByteOrder::Big => self.cursor.read_i64::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_i64::<LittleEndian>(),
        };
        value.map_err(|_| self.short_read(8))
    }

    /// Read f32
    pub fn read_f32(&mut self) -> Result<f32> {
        let value = match self.byte_order {
            ByteOrder::Big => self.cursor.read_f32::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_f32::<LittleEndian>(),
        };
        value.map_err(|_| self.short_read(4))
    }

    /// Read f64
    pub fn read_f64(&mut self) -> Result<f64> {
        let value = match self.byte_order {
            ByteOrder::Big => self.cursor.read_f64::<BigEndian>(),
            ByteOrder::Little => self.cursor.read_f64::<LittleEndian>(),
        };
        value.map_err(|_| self.short_read(8))
    }

    /// Read exactly `count` bytes
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        if self.remaining() < count {
            return Err(self.short_read(count));
        }
        let start = self.position() as usize;
        let bytes = self.cursor.get_ref()[start..start + count].to_vec();
        self.cursor.set_position((start + count) as u64);
        Ok(bytes)
    }
}
