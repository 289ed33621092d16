//! TypeTree data structures
//!
//! A type tree is the runtime-supplied schema of one serialized object type:
//! an ordered tree whose pre-order walk is the on-disk field order. Trees are
//! immutable once built and shared between readers through `Arc`.

use crate::error::{BinaryError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Meta flag requesting 4-byte alignment after the field
pub const ALIGN_BYTES_FLAG: i32 = 0x4000;

/// `type_flags` bits
pub mod type_flags {
    pub const IS_ARRAY: i32 = 1 << 0;
    pub const IS_MANAGED_REFERENCE: i32 = 1 << 1;
    pub const IS_MANAGED_REFERENCE_REGISTRY: i32 = 1 << 2;
    pub const IS_ARRAY_OF_REFS: i32 = 1 << 3;
}

/// Type names with a decoding meaning of their own
pub mod type_names {
    pub const ARRAY: &str = "Array";
    pub const TYPELESS_DATA: &str = "TypelessData";
    pub const STRING: &str = "string";
    pub const MANAGED_REFERENCES_REGISTRY: &str = "ManagedReferencesRegistry";
    pub const REFERENCED_OBJECT: &str = "ReferencedObject";
    pub const REFERENCED_OBJECT_DATA: &str = "ReferencedObjectData";
    pub const REFERENCED_MANAGED_TYPE: &str = "ReferencedManagedType";
}

/// Decoded representation of a primitive leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    String,
}

impl PrimitiveKind {
    /// Map a schema type name onto its primitive kind
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let kind = match type_name {
            "bool" => Self::Bool,
            "char" => Self::Char,
            "SInt8" => Self::I8,
            "UInt8" => Self::U8,
            "SInt16" | "short" => Self::I16,
            "UInt16" | "unsigned short" => Self::U16,
            "SInt32" | "int" => Self::I32,
            "UInt32" | "unsigned int" | "Type*" => Self::U32,
            "SInt64" | "long long" => Self::I64,
            "UInt64" | "unsigned long long" | "FileSize" => Self::U64,
            "float" => Self::F32,
            "double" => Self::F64,
            "string" => Self::String,
            _ => return None,
        };
        Some(kind)
    }

    /// Encoded width in bytes (`None` for strings)
    pub fn width(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Char | Self::I8 | Self::U8 => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 => Some(8),
            Self::String => None,
        }
    }

    /// Integer-like kinds, including `bool` and `char`
    pub fn is_integral(self) -> bool {
        !matches!(self, Self::F32 | Self::F64 | Self::String)
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/// A node in the Unity TypeTree
///
/// Each node represents a field or type in the Unity object structure,
/// forming a tree that describes the complete object layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeTreeNode {
    /// Type name (e.g., "int", "string", "Array", "Mesh")
    pub type_name: String,
    /// Field name (e.g., "m_Name"; "Base" for the root)
    pub name: String,
    /// Size in bytes (-1 when not statically known)
    pub byte_size: i32,
    /// Declaration index in the flattened tree
    pub index: i32,
    /// Type flags (see [`type_flags`])
    pub type_flags: i32,
    /// Version of this type
    pub version: i32,
    /// Meta flags (alignment, etc.)
    pub meta_flags: i32,
    /// Depth level in the tree
    pub level: i32,
    /// Static offset inside the parent, -1 when not applicable
    pub offset: i32,
    /// Reference type hash
    pub ref_type_hash: u64,
    /// Child nodes in on-disk order
    pub children: Vec<Arc<TypeTreeNode>>,
}

impl TypeTreeNode {
    /// Create a node without children
    pub fn new<T: Into<String>, N: Into<String>>(type_name: T, name: N, byte_size: i32) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            byte_size,
            index: 0,
            type_flags: 0,
            version: 1,
            meta_flags: 0,
            level: 0,
            offset: -1,
            ref_type_hash: 0,
            children: Vec::new(),
        }
    }

    /// Primitive leaf with its natural width
    pub fn leaf(type_name: &str, name: &str) -> Self {
        let size = PrimitiveKind::from_type_name(type_name)
            .and_then(PrimitiveKind::width)
            .map(|w| w as i32)
            .unwrap_or(-1);
        Self::new(type_name, name, size)
    }

    /// `string` field (length-prefixed UTF-8)
    pub fn string(name: &str) -> Self {
        Self::new(type_names::STRING, name, -1)
    }

    /// Struct node with the given children.
    ///
    /// `byte_size` is the sum of the children when all of them are
    /// statically sized, -1 otherwise.
    pub fn object(type_name: &str, name: &str, children: Vec<TypeTreeNode>) -> Self {
        let mut node = Self::new(type_name, name, -1);
        node.children = children.into_iter().map(Arc::new).collect();
        if node.is_statically_sized() {
            node.byte_size = node.children.iter().map(|c| c.byte_size).sum();
        }
        node
    }

    /// Raw `Array { size, data }` node
    pub fn array(name: &str, element: TypeTreeNode) -> Self {
        let mut element = element;
        element.name = "data".to_string();
        let mut node = Self::new(type_names::ARRAY, name, -1);
        node.type_flags |= type_flags::IS_ARRAY;
        node.children = vec![
            Arc::new(Self::leaf("int", "size")),
            Arc::new(element),
        ];
        node
    }

    /// `vector` wrapper around an aligned `Array`, the usual shape of list fields
    pub fn vector(name: &str, element: TypeTreeNode) -> Self {
        let array = Self::array("Array", element).aligned();
        let mut node = Self::new("vector", name, -1);
        node.children = vec![Arc::new(array)];
        node
    }

    /// `map` wrapper around an aligned `Array` of `pair { first, second }`
    pub fn map(name: &str, key: TypeTreeNode, value: TypeTreeNode) -> Self {
        let mut key = key;
        key.name = "first".to_string();
        let mut value = value;
        value.name = "second".to_string();
        let pair = Self::object("pair", "data", vec![key, value]);
        let array = Self::array("Array", pair).aligned();
        let mut node = Self::new("map", name, -1);
        node.children = vec![Arc::new(array)];
        node
    }

    /// Placeholder for the payload of a managed reference registry entry
    pub fn referenced_object_data(name: &str) -> Self {
        Self::new(type_names::REFERENCED_OBJECT_DATA, name, -1)
    }

    /// Payload bound to a null or terminator managed reference
    pub(crate) fn empty_payload(name: &str) -> Self {
        Self::new(type_names::REFERENCED_OBJECT_DATA, name, 0)
    }

    /// Set the alignment meta flag
    pub fn aligned(mut self) -> Self {
        self.meta_flags |= ALIGN_BYTES_FLAG;
        self
    }

    /// Check if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if this node requests alignment after its content
    pub fn is_aligned(&self) -> bool {
        (self.meta_flags & ALIGN_BYTES_FLAG) != 0
    }

    /// Check if this is a string type
    pub fn is_string(&self) -> bool {
        self.type_name == type_names::STRING
    }

    /// Check if this node is an array body (`size` followed by `data`)
    pub fn is_array(&self) -> bool {
        !self.is_string()
            && (self.type_name == type_names::ARRAY
                || self.type_name == type_names::TYPELESS_DATA
                || (self.type_flags & type_flags::IS_ARRAY) != 0)
    }

    /// The array body of this node: itself, or the single `Array` child of a
    /// `vector`/`map`-style wrapper
    pub fn array_child(&self) -> Option<&Arc<TypeTreeNode>> {
        if self.is_string() || self.is_array() {
            return None;
        }
        match self.children.as_slice() {
            [only] if only.is_array() => Some(only),
            _ => None,
        }
    }

    /// Check if this node can be indexed like an array
    pub fn is_array_like(&self) -> bool {
        self.is_array() || self.array_child().is_some()
    }

    /// Check if this node is a managed reference registry
    pub fn is_managed_reference_registry(&self) -> bool {
        self.type_name == type_names::MANAGED_REFERENCES_REGISTRY
            || (self.type_flags & type_flags::IS_MANAGED_REFERENCE_REGISTRY) != 0
    }

    /// Check if this node is the unbound payload of a registry entry
    pub fn is_referenced_object_data(&self) -> bool {
        self.type_name == type_names::REFERENCED_OBJECT_DATA
    }

    /// Primitive kind of this node, if its type is primitive
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        PrimitiveKind::from_type_name(&self.type_name)
    }

    /// Whether the encoded size of this node never depends on the data
    pub fn is_statically_sized(&self) -> bool {
        if self.is_string() || self.is_array() || self.is_referenced_object_data() {
            return false;
        }
        if self.is_leaf() {
            return self.byte_size >= 0;
        }
        self.children.iter().all(|child| child.is_statically_sized())
    }

    /// Whether this node or any descendant requests alignment
    pub fn has_alignment(&self) -> bool {
        self.is_aligned() || self.is_string() || self.children.iter().any(|c| c.has_alignment())
    }

    /// Find a child node by name
    pub fn find_child(&self, name: &str) -> Option<&Arc<TypeTreeNode>> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Position of the named child among its siblings
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.name == name)
    }

    /// Get a child node by name, failing with `FieldNotFound`
    pub fn child(&self, name: &str) -> Result<&Arc<TypeTreeNode>> {
        self.find_child(name)
            .ok_or_else(|| BinaryError::field_not_found(name, self.type_name.as_str()))
    }

    /// Get a child node by declaration order
    pub fn child_at(&self, index: usize) -> Option<&Arc<TypeTreeNode>> {
        self.children.get(index)
    }

    /// Get all child names
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|child| child.name.as_str()).collect()
    }

    /// Get the number of children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Validate the node structure
    pub fn validate(&self) -> Result<()> {
        if self.type_name.is_empty() {
            return Err(BinaryError::invalid_data(format!(
                "node '{}' has an empty type name",
                self.name
            )));
        }
        if self.byte_size < -1 {
            return Err(BinaryError::invalid_data(format!(
                "node '{}' has invalid byte size {}",
                self.name, self.byte_size
            )));
        }
        if self.is_array() {
            let names: Vec<&str> = self.child_names();
            if names != ["size", "data"] {
                return Err(BinaryError::invalid_data(format!(
                    "array '{}' must have children [size, data], found {:?}",
                    self.name, names
                )));
            }
        }

        for (i, child) in self.children.iter().enumerate() {
            child.validate().map_err(|e| match e {
                BinaryError::InvalidData(msg) => {
                    BinaryError::invalid_data(format!("{}[{}]: {}", self.name, i, msg))
                }
                other => other,
            })?;
        }

        Ok(())
    }

    /// Get statistics for the subtree rooted at this node
    pub fn statistics(&self) -> TypeTreeStatistics {
        fn walk(node: &TypeTreeNode, depth: usize, stats: &mut TypeTreeStatistics) {
            stats.total_nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if node.is_leaf() {
                stats.leaf_count += 1;
            }
            if node.is_array() {
                stats.array_count += 1;
            }
            for child in &node.children {
                walk(child, depth + 1, stats);
            }
        }

        let mut stats = TypeTreeStatistics::default();
        walk(self, 0, &mut stats);
        stats
    }
}

/// TypeTree statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTreeStatistics {
    pub total_nodes: usize,
    pub max_depth: usize,
    pub leaf_count: usize,
    pub array_count: usize,
}
