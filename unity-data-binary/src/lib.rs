//! Unity Serialized Object Reader
//!
//! This crate reads objects stored in Unity serialized files without
//! deserializing them up front. A type tree supplied by the file layer
//! describes each object's layout; a [`RandomAccessReader`] walks that tree
//! and decodes only the fields that are asked for.
//!
//! # Features
//!
//! - **Random access**: field and array element lookup by offset arithmetic
//!   over any [`ByteSource`]
//! - **Managed references**: `[SerializeReference]` payloads bound through a
//!   [`TypeResolver`]
//! - **Projections**: typed summaries of Texture2D, Mesh, Shader, AudioClip,
//!   AnimationClip and AssetBundle objects
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use unity_data_binary::{ReaderContext, TypeTreeNode};
//!
//! let root = Arc::new(TypeTreeNode::object(
//!     "TextAsset",
//!     "Base",
//!     vec![TypeTreeNode::string("m_Name")],
//! ));
//! let data = b"\x04\x00\x00\x00Lame".to_vec();
//!
//! let ctx = ReaderContext::new(&data);
//! let reader = ctx.reader(root, 0);
//! assert_eq!(reader.field("m_Name")?.value::<String>()?, "Lame");
//! # Ok::<(), unity_data_binary::BinaryError>(())
//! ```

mod macros;

pub mod animation;
pub mod asset_bundle;
pub mod audio;
pub mod error;
pub mod managed_refs;
pub mod mesh;
pub mod object;
pub mod random_access;
pub mod reader;
pub mod records;
pub mod shader;
pub mod source;
pub mod texture;
pub mod typetree;

pub use animation::AnimationClip;
pub use asset_bundle::{AssetBundle, BundleAsset};
pub use audio::{AudioClip, AudioCompressionFormat, AudioLoadType};
pub use error::{BinaryError, Result};
pub use managed_refs::{ManagedReferenceResolver, ManagedTypeName};
pub use mesh::{ChannelUsage, Mesh, VertexChannel, VertexFormat};
pub use object::{ObjectInfo, PPtr, SchemaCatalog, SchemaProvider, TypeResolver, open_object};
pub use random_access::{LeafValue, RandomAccessReader, ReaderContext};
pub use reader::{ByteOrder, ReaderConfig};
pub use records::{AssetRecord, read_record};
pub use shader::{Shader, ShaderApi, ShaderPass, ShaderProgram, ShaderStage, SubShader};
pub use source::{ByteSource, FileSource, MemorySource};
pub use texture::{Texture2D, TextureFormat};
pub use typetree::{PrimitiveKind, TypeTreeBuilder, TypeTreeNode};
