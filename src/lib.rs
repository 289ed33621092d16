//! Unity Data
//!
//! Schema-driven reading of Unity serialized objects.
//!
//! This crate bundles the workspace members:
//! - [`unity_data_core`]: the materialized value model and class-id table
//! - [`unity_data_binary`]: type trees, the random access reader, managed
//!   references and typed projections
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use unity_data::prelude::*;
//!
//! let root = Arc::new(TypeTreeNode::object(
//!     "AnimationClip",
//!     "Base",
//!     vec![
//!         TypeTreeNode::string("m_Name"),
//!         TypeTreeNode::leaf("bool", "m_Legacy").aligned(),
//!         TypeTreeNode::vector("m_Events", TypeTreeNode::leaf("float", "time")),
//!     ],
//! ));
//! let mut data = b"\x03\x00\x00\x00Run\x00\x01\x00\x00\x00".to_vec();
//! data.extend_from_slice(&0i32.to_le_bytes());
//!
//! let ctx = ReaderContext::new(&data);
//! let record = read_record(class_ids::ANIMATION_CLIP, &ctx.reader(root, 0))?;
//! assert_eq!(record.map(|r| r.name().to_string()), Some("Run".to_string()));
//! # Ok::<(), unity_data::BinaryError>(())
//! ```

pub use unity_data_binary;
pub use unity_data_core;

pub use unity_data_binary::{
    AssetRecord, BinaryError, ByteSource, FileSource, MemorySource, ObjectInfo, RandomAccessReader,
    ReaderConfig, ReaderContext, Result, SchemaCatalog, SchemaProvider, TypeResolver,
    TypeTreeNode, open_object, read_record,
};
pub use unity_data_core::{UnityValue, class_ids, get_class_name};

/// Commonly used types
pub mod prelude {
    pub use unity_data_binary::{
        AssetRecord, ByteSource, ManagedReferenceResolver, RandomAccessReader, ReaderConfig,
        ReaderContext, SchemaProvider, TypeResolver, TypeTreeNode, open_object, read_record,
    };
    pub use unity_data_core::{UnityValue, class_ids};
}
