//! Object tables and schema providers
//!
//! Locating objects inside a serialized file and fetching their type trees
//! belongs to the surrounding file layer. This module holds the interfaces
//! that layer implements, an in-memory implementation, and the helper that
//! turns an object id into a top-level reader.

use crate::error::{BinaryError, Result};
use crate::random_access::{RandomAccessReader, ReaderContext};
use crate::reader::ReaderConfig;
use crate::source::{ByteSource, check_range};
use crate::typetree::TypeTreeNode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Information about a Unity object in a serialized file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Path ID (unique identifier within the file)
    pub id: i64,
    /// Absolute offset of the object data
    pub offset: u64,
    /// Size of the object data in bytes
    pub size: u64,
    /// Persistent class ID of the object
    pub type_id: i32,
}

impl ObjectInfo {
    /// Create a new ObjectInfo
    pub fn new(id: i64, offset: u64, size: u64, type_id: i32) -> Self {
        Self {
            id,
            offset,
            size,
            type_id,
        }
    }

    /// Get the Unity class name for this object
    pub fn class_name(&self) -> String {
        unity_data_core::get_class_name(self.type_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Class_{}", self.type_id))
    }
}

/// Source of schemas for managed reference payloads
pub trait TypeResolver {
    /// Type tree of the managed type `namespace.class` from `assembly`.
    ///
    /// Unknown types fail with [`BinaryError::TypeNotFound`].
    fn resolve_ref_type(
        &self,
        class: &str,
        namespace: &str,
        assembly: &str,
    ) -> Result<Arc<TypeTreeNode>>;
}

/// Object table and type trees of one serialized file
pub trait SchemaProvider: TypeResolver {
    /// Every object of the file
    fn objects(&self) -> &[ObjectInfo];

    /// Root of the type tree describing object `object_id`
    fn type_tree_root(&self, object_id: i64) -> Result<Arc<TypeTreeNode>>;

    /// Look up one object by id
    fn object(&self, id: i64) -> Result<&ObjectInfo> {
        self.objects()
            .iter()
            .find(|info| info.id == id)
            .ok_or(BinaryError::ObjectNotFound(id))
    }
}

/// In-memory [`SchemaProvider`]
#[derive(Debug, Default, Clone)]
pub struct SchemaCatalog {
    objects: Vec<ObjectInfo>,
    type_roots: HashMap<i32, Arc<TypeTreeNode>>,
    object_roots: HashMap<i64, Arc<TypeTreeNode>>,
    ref_types: HashMap<(String, String, String), Arc<TypeTreeNode>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object
    pub fn add_object(&mut self, info: ObjectInfo) -> &mut Self {
        self.objects.push(info);
        self
    }

    /// Register the type tree shared by every object of `type_id`
    pub fn add_type(&mut self, type_id: i32, root: Arc<TypeTreeNode>) -> &mut Self {
        self.type_roots.insert(type_id, root);
        self
    }

    /// Register a type tree for one object, taking precedence over its class
    pub fn set_object_root(&mut self, object_id: i64, root: Arc<TypeTreeNode>) -> &mut Self {
        self.object_roots.insert(object_id, root);
        self
    }

    /// Register the schema of a managed reference type
    pub fn add_ref_type(
        &mut self,
        class: &str,
        namespace: &str,
        assembly: &str,
        root: Arc<TypeTreeNode>,
    ) -> &mut Self {
        self.ref_types.insert(
            (class.to_string(), namespace.to_string(), assembly.to_string()),
            root,
        );
        self
    }
}

impl TypeResolver for SchemaCatalog {
    fn resolve_ref_type(
        &self,
        class: &str,
        namespace: &str,
        assembly: &str,
    ) -> Result<Arc<TypeTreeNode>> {
        self.ref_types
            .get(&(class.to_string(), namespace.to_string(), assembly.to_string()))
            .cloned()
            .ok_or_else(|| BinaryError::type_not_found(class, namespace, assembly))
    }
}

impl SchemaProvider for SchemaCatalog {
    fn objects(&self) -> &[ObjectInfo] {
        &self.objects
    }

    fn type_tree_root(&self, object_id: i64) -> Result<Arc<TypeTreeNode>> {
        if let Some(root) = self.object_roots.get(&object_id) {
            return Ok(Arc::clone(root));
        }
        let info = self.object(object_id)?;
        self.type_roots.get(&info.type_id).cloned().ok_or_else(|| {
            BinaryError::invalid_data(format!(
                "no type tree for object {} of class {}",
                object_id,
                info.class_name()
            ))
        })
    }
}

/// Top-level reader for object `id`.
///
/// The object's data must lie inside `source`; the provider doubles as the
/// resolver for managed reference payloads.
pub fn open_object<'a, P: SchemaProvider>(
    provider: &'a P,
    source: &'a dyn ByteSource,
    config: ReaderConfig,
    id: i64,
) -> Result<RandomAccessReader<'a>> {
    let info = provider.object(id)?;
    check_range(info.offset, info.size, source.len())?;
    let root = provider.type_tree_root(id)?;
    debug!(
        id,
        offset = info.offset,
        size = info.size,
        class = %info.class_name(),
        "opening object"
    );

    let ctx = ReaderContext::new(source)
        .with_resolver(provider)
        .with_config(config);
    Ok(ctx.reader(root, info.offset))
}

/// Persistent pointer to another object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PPtr {
    /// 0 for the same file, otherwise an index into the external references
    pub file_id: i32,
    pub path_id: i64,
}

impl PPtr {
    /// Read from a `PPtr<...> { m_FileID, m_PathID }` node
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        Ok(Self {
            file_id: reader.field("m_FileID")?.value()?,
            path_id: reader.field("m_PathID")?.as_i64()?,
        })
    }

    pub fn is_null(&self) -> bool {
        self.file_id == 0 && self.path_id == 0
    }
}
