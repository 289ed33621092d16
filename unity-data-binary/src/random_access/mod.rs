//! Lazy navigation of serialized objects
//!
//! A [`RandomAccessReader`] is a cursor-free view of one node of a type tree
//! placed at an absolute offset of a [`ByteSource`]. Navigating to a field or
//! element computes its offset from the sizes of the nodes before it; values
//! are decoded only when asked for. Offsets computed along the way are cached
//! in the reader that computed them, so sibling and element lookups through
//! the same reader are amortized.
//!
//! Readers borrow their context and are meant for one thread; independent
//! readers over the same source may run on different threads.

mod materialize;
mod value;

pub use value::LeafValue;

use crate::error::{BinaryError, Result};
use crate::managed_refs::{self, ManagedReferenceResolver};
use crate::object::TypeResolver;
use crate::reader::{BinaryReader, ReaderConfig};
use crate::source::{ByteSource, check_range};
use crate::typetree::{PrimitiveKind, TypeTreeNode};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Everything a reader needs besides its node and offset
#[derive(Clone, Copy)]
pub struct ReaderContext<'a> {
    source: &'a dyn ByteSource,
    types: Option<&'a dyn TypeResolver>,
    config: ReaderConfig,
}

impl<'a> ReaderContext<'a> {
    /// Context over a byte source with the default config and no type resolver
    pub fn new(source: &'a dyn ByteSource) -> Self {
        Self {
            source,
            types: None,
            config: ReaderConfig::default(),
        }
    }

    /// Attach the resolver used to bind managed reference payloads
    pub fn with_resolver(mut self, types: &'a dyn TypeResolver) -> Self {
        self.types = Some(types);
        self
    }

    /// Replace the reader config
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(&self) -> &'a dyn ByteSource {
        self.source
    }

    pub fn resolver(&self) -> Option<&'a dyn TypeResolver> {
        self.types
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Top-level reader for an object whose data starts at `offset`
    pub fn reader(&self, root: Arc<TypeTreeNode>, offset: u64) -> RandomAccessReader<'a> {
        RandomAccessReader::new(*self, root, offset)
    }
}

impl fmt::Debug for ReaderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderContext")
            .field("source_len", &self.source.len())
            .field("has_resolver", &self.types.is_some())
            .field("config", &self.config)
            .finish()
    }
}

/// Per-reader memo of computed offsets
#[derive(Clone, Default)]
struct ReaderCache {
    /// End offset of this node, trailing alignment included
    end: Cell<Option<u64>>,
    /// `child_offsets[i]` is the offset of child `i`; grows on demand
    child_offsets: RefCell<Vec<u64>>,
    /// Resolved payload schemas of managed reference children, by child index
    bound: RefCell<Vec<(usize, Arc<TypeTreeNode>)>>,
    /// Decoded array count
    count: Cell<Option<usize>>,
    /// Fixed element stride, `Some(None)` once known to be variable
    stride: Cell<Option<Option<u64>>>,
    /// `element_offsets[i]` is the offset of element `i` for variable strides
    element_offsets: RefCell<Vec<u64>>,
    /// Starts of inline registry entries scanned so far; once the terminator
    /// is measured, its start and end close the list
    entry_offsets: RefCell<Vec<u64>>,
    /// Inline registry entries before the terminator, once it is reached
    entry_count: Cell<Option<usize>>,
}

/// Offset-addressed view of one node of a serialized object
#[derive(Clone)]
pub struct RandomAccessReader<'a> {
    ctx: ReaderContext<'a>,
    node: Arc<TypeTreeNode>,
    offset: u64,
    /// Start of the enclosing object; alignment is measured from here
    origin: u64,
    cache: ReaderCache,
}

impl<'a> RandomAccessReader<'a> {
    /// Create a top-level reader for `node` at `offset`
    pub fn new(ctx: ReaderContext<'a>, node: Arc<TypeTreeNode>, offset: u64) -> Self {
        Self {
            ctx,
            node,
            offset,
            origin: offset,
            cache: ReaderCache::default(),
        }
    }

    /// Reader for a node inside the same object
    fn derive(&self, node: Arc<TypeTreeNode>, offset: u64) -> Self {
        Self {
            ctx: self.ctx,
            node,
            offset,
            origin: self.origin,
            cache: ReaderCache::default(),
        }
    }

    pub fn node(&self) -> &Arc<TypeTreeNode> {
        &self.node
    }

    pub fn context(&self) -> ReaderContext<'a> {
        self.ctx
    }

    /// Absolute offset of this node's first byte
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn type_name(&self) -> &str {
        &self.node.type_name
    }

    fn align(&self, offset: u64) -> u64 {
        let relative = offset.saturating_sub(self.origin);
        self.origin + ((relative + 3) & !3)
    }

    fn binary<'b>(&self, bytes: &'b [u8]) -> BinaryReader<'b> {
        BinaryReader::new(bytes, self.ctx.config.byte_order)
    }

    fn read_i32_at(&self, offset: u64) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.ctx.source.read_at(offset, &mut buf)?;
        self.binary(&buf).read_i32()
    }

    /// Length prefix of a string node, checked against the limit and the source
    fn string_len(&self) -> Result<usize> {
        let raw = self.read_i32_at(self.offset)?;
        let raw = usize::try_from(raw).map_err(|_| {
            BinaryError::invalid_data(format!(
                "string '{}' at offset {} has negative length {}",
                self.node.name, self.offset, raw
            ))
        })?;
        if raw > self.ctx.config.max_string_len {
            return Err(BinaryError::limit_exceeded(format!(
                "string '{}' at offset {} claims {} bytes (limit {})",
                self.node.name, self.offset, raw, self.ctx.config.max_string_len
            )));
        }
        check_range(self.offset + 4, raw as u64, self.ctx.source.len())?;
        Ok(raw)
    }

    /// Offset just past this node, trailing alignment included
    pub fn end_offset(&self) -> Result<u64> {
        if let Some(end) = self.cache.end.get() {
            return Ok(end);
        }

        let node = &self.node;
        let end = if node.is_string() {
            let len = self.string_len()?;
            self.align(self.offset + 4 + len as u64)
        } else {
            let natural = if node.is_array() {
                self.array_end()?
            } else if node.is_leaf() {
                if node.byte_size < 0 {
                    return Err(BinaryError::invalid_data(format!(
                        "leaf '{}' of type '{}' has no static size",
                        node.name, node.type_name
                    )));
                }
                self.offset + node.byte_size as u64
            } else if let Some(template) = managed_refs::inline_entry_index(node) {
                self.inline_registry_end(template)?
            } else {
                self.child_offset(node.children.len())?
            };
            if node.is_aligned() {
                self.align(natural)
            } else {
                natural
            }
        };

        self.cache.end.set(Some(end));
        Ok(end)
    }

    /// Encoded size of this node, trailing alignment included
    pub fn byte_len(&self) -> Result<u64> {
        Ok(self.end_offset()? - self.offset)
    }

    /// Schema of child `index`, with managed reference payloads bound
    fn child_node(&self, index: usize) -> Result<Arc<TypeTreeNode>> {
        let child = self
            .node
            .children
            .get(index)
            .ok_or_else(|| BinaryError::index_out_of_range(index, self.node.children.len()))?;
        if child.is_referenced_object_data() && child.is_leaf() {
            self.bind_payload(index, child)
        } else {
            Ok(Arc::clone(child))
        }
    }

    /// Resolve the payload schema of a registry entry from its `type` sibling
    fn bind_payload(&self, index: usize, placeholder: &TypeTreeNode) -> Result<Arc<TypeTreeNode>> {
        if let Some((_, node)) = self.cache.bound.borrow().iter().find(|(i, _)| *i == index) {
            return Ok(Arc::clone(node));
        }

        let type_index = self
            .node
            .child_index(managed_refs::TYPE_FIELD)
            .filter(|&i| i < index)
            .ok_or_else(|| {
                BinaryError::invalid_data(format!(
                    "'{}' in '{}' has no preceding managed type field",
                    placeholder.name, self.node.type_name
                ))
            })?;
        let managed_type = managed_refs::ManagedTypeName::read(&self.child_at(type_index)?)?;

        let node = if managed_type.is_null() {
            Arc::new(TypeTreeNode::empty_payload(&placeholder.name))
        } else {
            let types = self.ctx.types.ok_or_else(|| managed_type.not_found())?;
            types.resolve_ref_type(
                &managed_type.class,
                &managed_type.namespace,
                &managed_type.assembly,
            )?
        };
        debug!(
            class = %managed_type.class,
            namespace = %managed_type.namespace,
            offset = self.offset,
            "bound managed reference payload"
        );

        self.cache.bound.borrow_mut().push((index, Arc::clone(&node)));
        Ok(node)
    }

    /// Offset of child `index`; `index == children.len()` gives the end of
    /// the last child
    fn child_offset(&self, index: usize) -> Result<u64> {
        loop {
            let (last, last_offset) = {
                let mut offsets = self.cache.child_offsets.borrow_mut();
                if offsets.is_empty() {
                    offsets.push(self.offset);
                }
                if let Some(&offset) = offsets.get(index) {
                    return Ok(offset);
                }
                let last = offsets.len() - 1;
                (last, offsets[last])
            };

            let sibling = self.derive(self.child_node(last)?, last_offset);
            let next = sibling.end_offset()?;
            trace!(
                parent = %self.node.name,
                child = %sibling.node.name,
                offset = last_offset,
                next,
                "measured child"
            );
            self.cache.child_offsets.borrow_mut().push(next);
        }
    }

    /// Scan inline registry entries until entry `index` is known to precede
    /// the terminator, or the terminator has been measured
    fn scan_inline_entries(&self, template: usize, index: usize) -> Result<()> {
        if self.cache.entry_offsets.borrow().is_empty() {
            let start = self.child_offset(template)?;
            self.cache.entry_offsets.borrow_mut().push(start);
        }
        let node = self.child_node(template)?;

        while self.cache.entry_count.get().is_none() {
            let (scanned, last_offset) = {
                let offsets = self.cache.entry_offsets.borrow();
                (offsets.len(), offsets[offsets.len() - 1])
            };
            if scanned > index.saturating_add(1) {
                break;
            }
            if scanned > self.ctx.config.max_array_len {
                return Err(BinaryError::limit_exceeded(format!(
                    "registry '{}' at offset {} has no terminator within {} entries",
                    self.node.name, self.offset, self.ctx.config.max_array_len
                )));
            }

            let entry = self.derive(Arc::clone(&node), last_offset);
            let managed_type =
                managed_refs::ManagedTypeName::read(&entry.field(managed_refs::TYPE_FIELD)?)?;
            let next = entry.end_offset()?;
            self.cache.entry_offsets.borrow_mut().push(next);
            if managed_type.is_terminator() {
                trace!(
                    registry = %self.node.name,
                    entries = scanned - 1,
                    end = next,
                    "reached registry terminator"
                );
                self.cache.entry_count.set(Some(scanned - 1));
            }
        }
        Ok(())
    }

    /// Inline registry entry `index`, `None` at or past the terminator
    pub(crate) fn inline_entry(&self, index: usize) -> Result<Option<RandomAccessReader<'a>>> {
        let template = managed_refs::inline_entry_index(&self.node).ok_or_else(|| {
            BinaryError::type_mismatch(
                managed_refs::INLINE_REGISTRY,
                self.node.type_name.as_str(),
            )
        })?;
        self.scan_inline_entries(template, index)?;
        if self.cache.entry_count.get().is_some_and(|count| index >= count) {
            return Ok(None);
        }
        let offset = self.cache.entry_offsets.borrow()[index];
        Ok(Some(self.derive(self.child_node(template)?, offset)))
    }

    /// End of an inline registry: the end of its terminator entry
    fn inline_registry_end(&self, template: usize) -> Result<u64> {
        self.scan_inline_entries(template, usize::MAX)?;
        let offsets = self.cache.entry_offsets.borrow();
        Ok(offsets[offsets.len() - 1])
    }

    /// Reader for the child at declaration position `index`
    pub fn child_at(&self, index: usize) -> Result<RandomAccessReader<'a>> {
        if index >= self.node.children.len() {
            return Err(BinaryError::index_out_of_range(
                index,
                self.node.children.len(),
            ));
        }
        let offset = self.child_offset(index)?;
        Ok(self.derive(self.child_node(index)?, offset))
    }

    /// Reader for the named child.
    ///
    /// On a managed reference registry the synthetic name `rid(N)` selects
    /// the entry whose id is `N`.
    pub fn field(&self, name: &str) -> Result<RandomAccessReader<'a>> {
        if let Some(index) = self.node.child_index(name) {
            return self.child_at(index);
        }
        if self.node.is_managed_reference_registry() {
            if let Some(rid) = managed_refs::parse_rid_key(name) {
                return ManagedReferenceResolver::find(self, rid);
            }
        }
        Err(BinaryError::field_not_found(name, self.node.type_name.as_str()))
    }

    /// Reader for the named child if the schema declares it
    pub fn try_field(&self, name: &str) -> Result<Option<RandomAccessReader<'a>>> {
        match self.node.child_index(name) {
            Some(index) => self.child_at(index).map(Some),
            None => Ok(None),
        }
    }

    /// Check whether [`RandomAccessReader::field`] would find `name`
    pub fn has_field(&self, name: &str) -> bool {
        if self.node.find_child(name).is_some() {
            return true;
        }
        if !self.node.is_managed_reference_registry() {
            return false;
        }
        let Some(rid) = managed_refs::parse_rid_key(name) else {
            return false;
        };
        match ManagedReferenceResolver::find(self, rid) {
            Ok(_) => true,
            Err(BinaryError::ReferenceNotFound(_)) => false,
            Err(err) => {
                warn!(rid, error = %err, "managed reference registry scan failed");
                false
            }
        }
    }

    /// Children in declaration order
    pub fn fields(&self) -> impl Iterator<Item = Result<RandomAccessReader<'a>>> + '_ {
        (0..self.node.children.len()).map(move |index| self.child_at(index))
    }

    /// Navigate a `/`-separated path of field names and array indices
    pub fn get(&self, path: &str) -> Result<RandomAccessReader<'a>> {
        let mut current = self.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match segment.parse::<usize>() {
                Ok(index) if current.node.is_array_like() => current.at(index)?,
                _ => current.field(segment)?,
            };
        }
        Ok(current)
    }

    /// Element template and data offset of this array or array wrapper
    fn array_layout(&self) -> Result<(Arc<TypeTreeNode>, u64)> {
        let body = if self.node.is_array() {
            &self.node
        } else {
            self.node.array_child().ok_or_else(|| {
                BinaryError::type_mismatch("array", self.node.type_name.as_str())
            })?
        };
        match body.children.as_slice() {
            [size, element] if size.byte_size == 4 => {
                Ok((Arc::clone(element), self.offset + 4))
            }
            _ => Err(BinaryError::invalid_data(format!(
                "array '{}' must have a 4-byte size and a data template",
                body.name
            ))),
        }
    }

    /// Number of elements of this array or array wrapper
    pub fn count(&self) -> Result<usize> {
        if let Some(count) = self.cache.count.get() {
            return Ok(count);
        }
        self.array_layout()?;

        let raw = self.read_i32_at(self.offset)?;
        if raw < 0 {
            return Err(BinaryError::invalid_data(format!(
                "array '{}' at offset {} has negative size {}",
                self.node.name, self.offset, raw
            )));
        }
        let count = raw as usize;
        if count > self.ctx.config.max_array_len {
            return Err(BinaryError::limit_exceeded(format!(
                "array '{}' at offset {} has {} elements (limit {})",
                self.node.name, self.offset, count, self.ctx.config.max_array_len
            )));
        }

        self.cache.count.set(Some(count));
        Ok(count)
    }

    /// Stride of statically sized elements whose alignment phase is stable
    fn element_stride(&self, element: &Arc<TypeTreeNode>, data_offset: u64) -> Result<Option<u64>> {
        if let Some(stride) = self.cache.stride.get() {
            return Ok(stride);
        }
        let stride = if element.is_statically_sized() {
            let first = self.derive(Arc::clone(element), data_offset);
            let stride = first.end_offset()? - data_offset;
            (stride % 4 == 0 || !element.has_alignment()).then_some(stride)
        } else {
            None
        };
        self.cache.stride.set(Some(stride));
        Ok(stride)
    }

    /// Offset of element `index` by forward scan; `index == count` gives the
    /// end of the last element
    fn scanned_element_offset(
        &self,
        element: &Arc<TypeTreeNode>,
        data_offset: u64,
        index: usize,
    ) -> Result<u64> {
        loop {
            let last_offset = {
                let mut offsets = self.cache.element_offsets.borrow_mut();
                if offsets.is_empty() {
                    offsets.push(data_offset);
                }
                if let Some(&offset) = offsets.get(index) {
                    return Ok(offset);
                }
                offsets[offsets.len() - 1]
            };
            let next = self.derive(Arc::clone(element), last_offset).end_offset()?;
            self.cache.element_offsets.borrow_mut().push(next);
        }
    }

    fn element_offset(&self, element: &Arc<TypeTreeNode>, data_offset: u64, index: usize) -> Result<u64> {
        match self.element_stride(element, data_offset)? {
            Some(stride) => {
                // the elements before `index` must lie inside the source
                let available = self.ctx.source.len();
                let span = stride
                    .checked_mul(index as u64)
                    .ok_or_else(|| BinaryError::truncated(data_offset, u64::MAX, available))?;
                check_range(data_offset, span, available)?;
                Ok(data_offset + span)
            }
            None => self.scanned_element_offset(element, data_offset, index),
        }
    }

    fn array_end(&self) -> Result<u64> {
        let (element, data_offset) = self.array_layout()?;
        let count = self.count()?;
        if count == 0 {
            return Ok(data_offset);
        }
        self.element_offset(&element, data_offset, count)
    }

    /// Reader for element `index` of this array or array wrapper
    pub fn at(&self, index: usize) -> Result<RandomAccessReader<'a>> {
        let (element, data_offset) = self.array_layout()?;
        let count = self.count()?;
        if index >= count {
            return Err(BinaryError::index_out_of_range(index, count));
        }
        let offset = self.element_offset(&element, data_offset, index)?;
        if let Some(Some(stride)) = self.cache.stride.get() {
            check_range(offset, stride, self.ctx.source.len())?;
        }
        Ok(self.derive(element, offset))
    }

    /// Elements of this array or array wrapper, in order
    pub fn elements(&self) -> Result<Elements<'_, 'a>> {
        let count = self.count()?;
        Ok(Elements {
            array: self,
            next: 0,
            count,
        })
    }

    /// Raw content of an array of 1-byte elements
    pub fn bytes(&self) -> Result<Vec<u8>> {
        let (element, data_offset) = self.array_layout()?;
        let is_byte = element.is_leaf()
            && element
                .primitive_kind()
                .is_some_and(|kind| kind.is_integral() && kind.width() == Some(1));
        if !is_byte {
            return Err(BinaryError::type_mismatch(
                "byte array",
                format!("{}<{}>", self.node.type_name, element.type_name),
            ));
        }
        let count = self.count()?;
        self.ctx.source.read(data_offset, count)
    }

    /// Primitive kind of this leaf, or the error for reading it as `expected`
    fn leaf_kind(&self, expected: &str) -> Result<PrimitiveKind> {
        match self.node.primitive_kind() {
            Some(PrimitiveKind::String) => Ok(PrimitiveKind::String),
            Some(kind) if self.node.is_leaf() => Ok(kind),
            _ if !self.node.is_leaf() => Err(BinaryError::not_a_leaf(
                self.node.name.as_str(),
                self.node.type_name.as_str(),
            )),
            _ => Err(BinaryError::type_mismatch(
                expected,
                self.node.type_name.as_str(),
            )),
        }
    }

    /// Decode this leaf as `T`.
    ///
    /// Integer types read any integer, `bool` or `char` leaf of the same
    /// width; `bool` reads any 1-byte integer leaf; floats and strings only
    /// read their own type. Anything else is a `TypeMismatch`.
    pub fn value<T: LeafValue>(&self) -> Result<T> {
        let kind = self.leaf_kind(T::TYPE_NAME)?;
        if !T::accepts(kind) {
            return Err(BinaryError::type_mismatch(
                T::TYPE_NAME,
                self.node.type_name.as_str(),
            ));
        }
        let bytes = match kind.width() {
            Some(width) => self.ctx.source.read(self.offset, width)?,
            None => {
                let len = self.string_len()?;
                self.ctx.source.read(self.offset, 4 + len)?
            }
        };
        T::decode(&mut self.binary(&bytes))
    }

    /// Any integer or `bool` leaf, widened
    pub fn as_i64(&self) -> Result<i64> {
        match self.leaf_kind("i64")? {
            PrimitiveKind::Bool | PrimitiveKind::Char | PrimitiveKind::U8 => {
                self.value::<u8>().map(i64::from)
            }
            PrimitiveKind::I8 => self.value::<i8>().map(i64::from),
            PrimitiveKind::I16 => self.value::<i16>().map(i64::from),
            PrimitiveKind::U16 => self.value::<u16>().map(i64::from),
            PrimitiveKind::I32 => self.value::<i32>().map(i64::from),
            PrimitiveKind::U32 => self.value::<u32>().map(i64::from),
            PrimitiveKind::I64 => self.value::<i64>(),
            PrimitiveKind::U64 => self.value::<u64>().map(|v| v as i64),
            PrimitiveKind::F32 | PrimitiveKind::F64 | PrimitiveKind::String => Err(
                BinaryError::type_mismatch("i64", self.node.type_name.as_str()),
            ),
        }
    }

    /// Any numeric leaf, widened
    pub fn as_f64(&self) -> Result<f64> {
        match self.leaf_kind("f64")? {
            PrimitiveKind::F32 => self.value::<f32>().map(f64::from),
            PrimitiveKind::F64 => self.value::<f64>(),
            PrimitiveKind::U64 => self.value::<u64>().map(|v| v as f64),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    /// Any numeric leaf checked against the `u32` range
    pub fn as_u32(&self) -> Result<u32> {
        let value = self.as_i64()?;
        u32::try_from(value).map_err(|_| {
            BinaryError::invalid_data(format!(
                "field '{}' value {} does not fit in u32",
                self.node.name, value
            ))
        })
    }
}

impl fmt::Debug for RandomAccessReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomAccessReader")
            .field("name", &self.node.name)
            .field("type_name", &self.node.type_name)
            .field("offset", &self.offset)
            .finish()
    }
}

/// Iterator over the elements of an array, see [`RandomAccessReader::elements`]
pub struct Elements<'r, 'a> {
    array: &'r RandomAccessReader<'a>,
    next: usize,
    count: usize,
}

impl<'a> Iterator for Elements<'_, 'a> {
    type Item = Result<RandomAccessReader<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let item = self.array.at(self.next);
        self.next = if item.is_ok() { self.next + 1 } else { self.count };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Elements<'_, '_> {}
