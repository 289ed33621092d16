//! Mesh type definitions

use crate::macros::code_enum;
use serde::{Deserialize, Serialize};

code_enum! {
    /// Vertex attribute encoding (Unity 2019 and later)
    pub enum VertexFormat {
        Float = 0,
        Float16 = 1,
        UNorm8 = 2,
        SNorm8 = 3,
        UNorm16 = 4,
        SNorm16 = 5,
        UInt8 = 6,
        SInt8 = 7,
        UInt16 = 8,
        SInt16 = 9,
        UInt32 = 10,
        SInt32 = 11,
    }
}

code_enum! {
    /// Vertex attribute, given by the channel's position in `m_Channels`
    pub enum ChannelUsage {
        Vertex = 0,
        Normal = 1,
        Tangent = 2,
        Color = 3,
        TexCoord0 = 4,
        TexCoord1 = 5,
        TexCoord2 = 6,
        TexCoord3 = 7,
        TexCoord4 = 8,
        TexCoord5 = 9,
        TexCoord6 = 10,
        TexCoord7 = 11,
        BlendWeights = 12,
        BlendIndices = 13,
    }
}

impl VertexFormat {
    /// Size of one component in bytes
    pub fn component_size(self) -> Option<u32> {
        let size = match self {
            VertexFormat::Float | VertexFormat::UInt32 | VertexFormat::SInt32 => 4,
            VertexFormat::Float16
            | VertexFormat::UNorm16
            | VertexFormat::SNorm16
            | VertexFormat::UInt16
            | VertexFormat::SInt16 => 2,
            VertexFormat::UNorm8 | VertexFormat::SNorm8 | VertexFormat::UInt8 | VertexFormat::SInt8 => 1,
            VertexFormat::Other(_) => return None,
        };
        Some(size)
    }
}

/// One used vertex channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexChannel {
    pub usage: ChannelUsage,
    /// Raw format code as stored
    pub format_code: i32,
    pub format: VertexFormat,
    /// Component count, 1 to 4
    pub dimension: u8,
}

/// Mesh summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    /// Mesh compression level, 0 when uncompressed
    pub compression: u8,
    pub indices: u32,
    pub vertices: u32,
    pub channels: Vec<VertexChannel>,
    pub blend_shapes: u32,
    pub bones: u32,
    pub rw_enabled: bool,
    /// Size of the streamed vertex data, 0 when inline
    pub stream_data_size: u64,
}
