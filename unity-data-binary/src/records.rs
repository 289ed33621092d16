//! Projection dispatch by class id

use crate::animation::AnimationClip;
use crate::asset_bundle::AssetBundle;
use crate::audio::AudioClip;
use crate::error::Result;
use crate::mesh::Mesh;
use crate::random_access::RandomAccessReader;
use crate::shader::Shader;
use crate::texture::Texture2D;
use serde::{Deserialize, Serialize};
use tracing::trace;
use unity_data_core::class_ids;

/// A projected object of one of the supported classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssetRecord {
    Texture2D(Texture2D),
    Mesh(Mesh),
    Shader(Shader),
    AudioClip(AudioClip),
    AnimationClip(AnimationClip),
    AssetBundle(AssetBundle),
}

impl AssetRecord {
    /// Name of the projected object
    pub fn name(&self) -> &str {
        match self {
            AssetRecord::Texture2D(r) => &r.name,
            AssetRecord::Mesh(r) => &r.name,
            AssetRecord::Shader(r) => &r.name,
            AssetRecord::AudioClip(r) => &r.name,
            AssetRecord::AnimationClip(r) => &r.name,
            AssetRecord::AssetBundle(r) => &r.name,
        }
    }

    /// Class id of the projected object
    pub fn class_id(&self) -> i32 {
        match self {
            AssetRecord::Texture2D(_) => class_ids::TEXTURE_2D,
            AssetRecord::Mesh(_) => class_ids::MESH,
            AssetRecord::Shader(_) => class_ids::SHADER,
            AssetRecord::AudioClip(_) => class_ids::AUDIO_CLIP,
            AssetRecord::AnimationClip(_) => class_ids::ANIMATION_CLIP,
            AssetRecord::AssetBundle(_) => class_ids::ASSET_BUNDLE,
        }
    }
}

/// Project an object of class `class_id`; unsupported classes yield `None`
pub fn read_record(class_id: i32, reader: &RandomAccessReader<'_>) -> Result<Option<AssetRecord>> {
    let record = match class_id {
        class_ids::TEXTURE_2D => AssetRecord::Texture2D(Texture2D::read(reader)?),
        class_ids::MESH => AssetRecord::Mesh(Mesh::read(reader)?),
        class_ids::SHADER => AssetRecord::Shader(Shader::read(reader)?),
        class_ids::AUDIO_CLIP => AssetRecord::AudioClip(AudioClip::read(reader)?),
        class_ids::ANIMATION_CLIP => AssetRecord::AnimationClip(AnimationClip::read(reader)?),
        class_ids::ASSET_BUNDLE => AssetRecord::AssetBundle(AssetBundle::read(reader)?),
        _ => {
            trace!(class_id, "no projection for class");
            return Ok(None);
        }
    };
    Ok(Some(record))
}
