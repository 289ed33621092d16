//! AnimationClip projection

use crate::error::Result;
use crate::random_access::RandomAccessReader;
use serde::{Deserialize, Serialize};

/// AnimationClip summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Number of animation events
    pub events: u32,
    pub legacy: bool,
}

impl AnimationClip {
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        Ok(Self {
            name: reader.field("m_Name")?.value()?,
            events: reader.field("m_Events")?.count()? as u32,
            legacy: reader.field("m_Legacy")?.value()?,
        })
    }
}
