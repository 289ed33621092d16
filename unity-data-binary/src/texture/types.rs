//! Texture2D projection

use super::formats::TextureFormat;
use crate::error::Result;
use crate::random_access::RandomAccessReader;
use serde::{Deserialize, Serialize};

/// Location of data stored outside the serialized file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingInfo {
    pub offset: u64,
    pub size: u64,
    pub path: String,
}

impl StreamingInfo {
    /// Read from a `StreamingInfo { offset, size, path }` node
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        Ok(Self {
            offset: reader.field("offset")?.as_i64()? as u64,
            size: reader.field("size")?.as_i64()? as u64,
            path: reader.field("path")?.value()?,
        })
    }
}

/// Texture2D summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture2D {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub format: TextureFormat,
    pub mip_count: i32,
    /// Read/write enabled in the importer
    pub rw_enabled: bool,
    /// Size of the streamed image data, 0 when the pixels are inline
    pub stream_data_size: u64,
}

impl Texture2D {
    /// Project a Texture2D object.
    ///
    /// Old versions without `m_MipCount` store an `m_MipMap` flag; a set flag
    /// means a full mip chain.
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        let width = reader.field("m_Width")?.value::<i32>()?;
        let height = reader.field("m_Height")?.value::<i32>()?;

        let mip_count = match reader.try_field("m_MipCount")? {
            Some(count) => count.value::<i32>()?,
            None if reader.field("m_MipMap")?.value::<bool>()? => full_mip_chain(width, height),
            None => 1,
        };

        let inline_len = reader.field("image data")?.count()?;
        let stream_data_size = match reader.try_field("m_StreamData")? {
            Some(stream) if inline_len == 0 => StreamingInfo::read(&stream)?.size,
            _ => 0,
        };

        Ok(Self {
            name: reader.field("m_Name")?.value()?,
            width,
            height,
            format: TextureFormat::from(reader.field("m_TextureFormat")?.value::<i32>()?),
            mip_count,
            rw_enabled: reader.field("m_IsReadable")?.value()?,
            stream_data_size,
        })
    }
}

/// Number of levels in a mip chain down to 1x1
fn full_mip_chain(width: i32, height: i32) -> i32 {
    let largest = width.max(height).max(1) as u32;
    (u32::BITS - largest.leading_zeros()) as i32
}
