//! AudioClip projection

use super::formats::{AudioCompressionFormat, AudioLoadType};
use crate::error::Result;
use crate::random_access::RandomAccessReader;
use serde::{Deserialize, Serialize};

/// Location of the clip's sample data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamedResource {
    pub source: String,
    pub offset: u64,
    pub size: u64,
}

impl StreamedResource {
    /// Read from a `StreamedResource { m_Source, m_Offset, m_Size }` node
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        Ok(Self {
            source: reader.field("m_Source")?.value()?,
            offset: reader.field("m_Offset")?.as_i64()? as u64,
            size: reader.field("m_Size")?.as_i64()? as u64,
        })
    }
}

/// AudioClip summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    pub name: String,
    pub channels: i32,
    pub format: AudioCompressionFormat,
    pub frequency: i32,
    pub load_type: AudioLoadType,
    pub bits_per_sample: i32,
    /// Size of the sample data in the resource file
    pub stream_data_size: u64,
}

impl AudioClip {
    /// Project an AudioClip object (Unity 5 and later layout)
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        let resource = StreamedResource::read(&reader.field("m_Resource")?)?;

        Ok(Self {
            name: reader.field("m_Name")?.value()?,
            channels: reader.field("m_Channels")?.value()?,
            format: AudioCompressionFormat::from(
                reader.field("m_CompressionFormat")?.value::<i32>()?,
            ),
            frequency: reader.field("m_Frequency")?.value()?,
            load_type: AudioLoadType::from(reader.field("m_LoadType")?.value::<i32>()?),
            bits_per_sample: reader.field("m_BitsPerSample")?.value()?,
            stream_data_size: resource.size,
        })
    }
}
