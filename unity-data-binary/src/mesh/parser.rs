//! Mesh projection

use super::types::{ChannelUsage, Mesh, VertexChannel, VertexFormat};
use crate::error::{BinaryError, Result};
use crate::random_access::RandomAccessReader;
use crate::texture::StreamingInfo;

impl Mesh {
    /// Project a Mesh object.
    ///
    /// Uncompressed meshes report the index buffer and vertex data counts;
    /// compressed meshes report the packed item counts.
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        let compression = reader.field("m_MeshCompression")?.value::<u8>()?;

        let (indices, vertices) = if compression == 0 {
            (index_count(reader)?, reader.get("m_VertexData/m_VertexCount")?.as_u32()?)
        } else {
            let packed = reader.field("m_CompressedMesh")?;
            (
                packed.get("m_Triangles/m_NumItems")?.as_u32()?,
                packed.get("m_Vertices/m_NumItems")?.as_u32()? / 3,
            )
        };

        let stream_data_size = match reader.try_field("m_StreamData")? {
            Some(stream) => StreamingInfo::read(&stream)?.size,
            None => 0,
        };

        Ok(Self {
            name: reader.field("m_Name")?.value()?,
            compression,
            indices,
            vertices,
            channels: read_channels(&reader.get("m_VertexData/m_Channels")?)?,
            blend_shapes: reader.get("m_Shapes/shapes")?.count()? as u32,
            bones: reader.field("m_BoneNameHashes")?.count()? as u32,
            rw_enabled: reader.field("m_IsReadable")?.value()?,
            stream_data_size,
        })
    }
}

/// Index count from the byte size of the index buffer.
///
/// Meshes older than `m_IndexFormat` always use 16-bit indices.
fn index_count(reader: &RandomAccessReader<'_>) -> Result<u32> {
    let index_size = match reader.try_field("m_IndexFormat")? {
        Some(format) => match format.as_i64()? {
            0 => 2,
            1 => 4,
            other => {
                return Err(BinaryError::invalid_data(format!(
                    "unknown mesh index format {}",
                    other
                )));
            }
        },
        None => 2,
    };
    let bytes = reader.field("m_IndexBuffer")?.count()? as u32;
    Ok(bytes / index_size)
}

/// Channels with a non-zero dimension, tagged with their usage
fn read_channels(channels: &RandomAccessReader<'_>) -> Result<Vec<VertexChannel>> {
    let mut used = Vec::new();
    for (index, channel) in channels.elements()?.enumerate() {
        let channel = channel?;
        let dimension = (channel.field("dimension")?.as_i64()? & 0xF) as u8;
        if dimension == 0 {
            continue;
        }
        let format_code = channel.field("format")?.as_i64()? as i32;
        used.push(VertexChannel {
            usage: ChannelUsage::from(index as i32),
            format_code,
            format: VertexFormat::from(format_code),
            dimension,
        });
    }
    Ok(used)
}
