//! Unity TypeTree schema model
//!
//! - `types` - the immutable [`TypeTreeNode`] and its structural queries
//! - `builder` - assembly of trees from flattened, level-annotated node lists
//!
//! ```rust
//! use unity_data_binary::typetree::TypeTreeNode;
//!
//! let root = TypeTreeNode::object(
//!     "Texture2D",
//!     "Base",
//!     vec![
//!         TypeTreeNode::string("m_Name"),
//!         TypeTreeNode::leaf("int", "m_Width"),
//!         TypeTreeNode::leaf("int", "m_Height"),
//!     ],
//! );
//! assert_eq!(root.child("m_Width").unwrap().byte_size, 4);
//! ```

pub mod builder;
pub mod types;

pub use builder::TypeTreeBuilder;
pub use types::{
    ALIGN_BYTES_FLAG, PrimitiveKind, TypeTreeNode, TypeTreeStatistics, type_flags, type_names,
};
