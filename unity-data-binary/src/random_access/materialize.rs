//! Full materialization of a subtree into [`UnityValue`]

use super::RandomAccessReader;
use crate::error::{BinaryError, Result};
use crate::managed_refs;
use crate::typetree::PrimitiveKind;
use indexmap::IndexMap;
use unity_data_core::UnityValue;

impl RandomAccessReader<'_> {
    /// Decode the whole subtree below this reader.
    ///
    /// Structs become objects keyed by field name, arrays and their
    /// `vector`/`map` wrappers become arrays, and managed reference payloads
    /// are decoded with their bound schema. The payload of a null reference
    /// decodes to `Null`; any other leaf of unknown type is a `TypeMismatch`.
    /// The entry template of a version 1 registry becomes the array of its
    /// entries.
    pub fn to_value(&self) -> Result<UnityValue> {
        let node = self.node();
        if node.is_string() {
            return self.value::<String>().map(UnityValue::String);
        }
        if node.is_array_like() {
            return self.array_value();
        }
        if node.is_leaf() {
            return match node.primitive_kind() {
                Some(kind) => self.primitive_value(kind),
                None if node.is_referenced_object_data() => Ok(UnityValue::Null),
                None => Err(BinaryError::type_mismatch(
                    "primitive",
                    node.type_name.as_str(),
                )),
            };
        }

        let template = managed_refs::inline_entry_index(node);
        let mut object = IndexMap::with_capacity(node.children.len());
        for (index, child) in node.children.iter().enumerate() {
            let value = if template == Some(index) {
                self.inline_entries_value()?
            } else {
                self.child_at(index)?.to_value()?
            };
            object.insert(child.name.clone(), value);
        }
        Ok(UnityValue::Object(object))
    }

    fn inline_entries_value(&self) -> Result<UnityValue> {
        let mut items = Vec::new();
        while let Some(entry) = self.inline_entry(items.len())? {
            items.push(entry.to_value()?);
        }
        Ok(UnityValue::Array(items))
    }

    fn primitive_value(&self, kind: PrimitiveKind) -> Result<UnityValue> {
        let value = match kind {
            PrimitiveKind::Bool => UnityValue::Bool(self.value::<bool>()?),
            PrimitiveKind::F32 | PrimitiveKind::F64 => UnityValue::Float(self.as_f64()?),
            PrimitiveKind::U64 => UnityValue::from(self.value::<u64>()?),
            PrimitiveKind::String => UnityValue::String(self.value::<String>()?),
            _ => UnityValue::Integer(self.as_i64()?),
        };
        Ok(value)
    }

    fn array_value(&self) -> Result<UnityValue> {
        if let Some(kind @ (PrimitiveKind::U8 | PrimitiveKind::I8 | PrimitiveKind::Char)) =
            self.element_kind()
        {
            let items = self
                .bytes()?
                .into_iter()
                .map(|b| match kind {
                    PrimitiveKind::I8 => UnityValue::Integer(i64::from(b as i8)),
                    _ => UnityValue::Integer(i64::from(b)),
                })
                .collect();
            return Ok(UnityValue::Array(items));
        }

        let items = self
            .elements()?
            .map(|element| element.and_then(|e| e.to_value()))
            .collect::<Result<Vec<_>>>()?;
        Ok(UnityValue::Array(items))
    }

    fn element_kind(&self) -> Option<PrimitiveKind> {
        let body = if self.node().is_array() {
            self.node()
        } else {
            self.node().array_child()?
        };
        let element = body.children.get(1)?;
        if element.is_leaf() {
            element.primitive_kind()
        } else {
            None
        }
    }
}
