//! AssetBundle projection

use crate::error::Result;
use crate::object::PPtr;
use crate::random_access::RandomAccessReader;
use serde::{Deserialize, Serialize};

/// One `m_Container` entry: an asset path and the object it loads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleAsset {
    pub name: String,
    pub pptr: PPtr,
}

/// AssetBundle summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBundle {
    pub name: String,
    pub assets: Vec<BundleAsset>,
}

impl AssetBundle {
    /// Project an AssetBundle object.
    ///
    /// `m_Container` is a multimap; entries keep their stored order, and an
    /// asset path may occur more than once.
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        let mut assets = Vec::new();
        for entry in reader.field("m_Container")?.elements()? {
            let entry = entry?;
            assets.push(BundleAsset {
                name: entry.field("first")?.value()?,
                pptr: PPtr::read(&entry.get("second/asset")?)?,
            });
        }

        Ok(Self {
            name: reader.field("m_Name")?.value()?,
            assets,
        })
    }
}
