//! Managed reference registries
//!
//! Polymorphic `[SerializeReference]` fields are stored as an id in the
//! owning field and an entry in the object's `ManagedReferencesRegistry`.
//! Entries carry the payload's managed type name; the payload schema is bound
//! through a [`TypeResolver`](crate::object::TypeResolver) when a reader
//! reaches the entry's `data` field.
//!
//! Registry layouts:
//! - version 2: `version`, `RefIds` array of `ReferencedObject { rid, type, data }`
//! - version 1: `version` and a single `ReferencedObject { type, data }`
//!   template; the data repeats the template once per entry, entries are
//!   addressed by position and the list is closed by a terminator entry

use crate::error::{BinaryError, Result};
use crate::random_access::RandomAccessReader;
use crate::typetree::{TypeTreeNode, type_names};

pub(crate) const TYPE_FIELD: &str = "type";
pub const DATA_FIELD: &str = "data";
const RID_FIELD: &str = "rid";
const ID_FIELD: &str = "id";

pub(crate) const INLINE_REGISTRY: &str = "inline ManagedReferencesRegistry";

const TERMINUS_CLASS: &str = "Terminus";
const TERMINUS_NAMESPACE: &str = "UnityEngine.DMAT";

/// Parse the synthetic registry key `rid(N)`
pub(crate) fn parse_rid_key(name: &str) -> Option<i64> {
    name.strip_prefix("rid(")?.strip_suffix(')')?.parse().ok()
}

/// Position of the repeated entry template of a version 1 registry
pub(crate) fn inline_entry_index(node: &TypeTreeNode) -> Option<usize> {
    if !node.is_managed_reference_registry() || node.children.iter().any(|c| c.is_array_like()) {
        return None;
    }
    node.children
        .iter()
        .position(|child| child.type_name == type_names::REFERENCED_OBJECT)
}

/// Identity of the managed type stored in a registry entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManagedTypeName {
    pub class: String,
    pub namespace: String,
    pub assembly: String,
}

impl ManagedTypeName {
    /// Read from a `ReferencedManagedType { class, ns, asm }` node
    pub fn read(reader: &RandomAccessReader<'_>) -> Result<Self> {
        Ok(Self {
            class: reader.field("class")?.value()?,
            namespace: reader.field("ns")?.value()?,
            assembly: reader.field("asm")?.value()?,
        })
    }

    /// Null references and the version 1 terminator carry no payload
    pub fn is_null(&self) -> bool {
        self.class.is_empty() || self.is_terminator()
    }

    /// Entry closing a version 1 registry
    pub fn is_terminator(&self) -> bool {
        self.class == TERMINUS_CLASS && self.namespace == TERMINUS_NAMESPACE
    }

    pub(crate) fn not_found(&self) -> BinaryError {
        BinaryError::type_not_found(
            self.class.as_str(),
            self.namespace.as_str(),
            self.assembly.as_str(),
        )
    }
}

/// Lookups of managed reference ids and registry entries
pub struct ManagedReferenceResolver;

impl ManagedReferenceResolver {
    /// Id stored in a managed reference field or registry entry.
    ///
    /// Looks for `rid` (version 2) then `id` (version 1).
    pub fn reference_id(owner: &RandomAccessReader<'_>) -> Result<i64> {
        for name in [RID_FIELD, ID_FIELD] {
            if owner.node().find_child(name).is_some() {
                return owner.field(name)?.as_i64();
            }
        }
        Err(BinaryError::field_not_found(RID_FIELD, owner.type_name()))
    }

    /// Entries of a registry, in storage order.
    ///
    /// Version 1 entries are discovered by scanning up to the terminator,
    /// which is not yielded.
    pub fn entries<'a>(registry: &RandomAccessReader<'a>) -> Result<RegistryEntries<'a>> {
        let node = registry.node();
        if !node.is_managed_reference_registry() {
            return Err(BinaryError::type_mismatch(
                type_names::MANAGED_REFERENCES_REGISTRY,
                registry.type_name(),
            ));
        }

        let table = match node.children.iter().position(|c| c.is_array_like()) {
            Some(index) => {
                let table = registry.child_at(index)?;
                let count = table.count()?;
                EntryTable::Array { table, count }
            }
            None if inline_entry_index(node).is_some() => EntryTable::Inline(registry.clone()),
            None => {
                return Err(BinaryError::invalid_data(format!(
                    "registry '{}' has neither an entry array nor an entry template",
                    registry.name()
                )));
            }
        };
        Ok(RegistryEntries {
            table,
            next: 0,
            done: false,
        })
    }

    /// Registry entry whose id is `rid`.
    ///
    /// Entries without an id field are addressed by their position. Version 1
    /// entry offsets are cached in `registry`, so repeated lookups through
    /// the same reader scan each entry once.
    pub fn find<'a>(registry: &RandomAccessReader<'a>, rid: i64) -> Result<RandomAccessReader<'a>> {
        if inline_entry_index(registry.node()).is_some() {
            let entry = match usize::try_from(rid) {
                Ok(index) => registry.inline_entry(index)?,
                Err(_) => None,
            };
            return entry.ok_or(BinaryError::ReferenceNotFound(rid));
        }
        for (position, entry) in Self::entries(registry)?.enumerate() {
            let entry = entry?;
            let id = match Self::reference_id(&entry) {
                Ok(id) => id,
                Err(BinaryError::FieldNotFound { .. }) => position as i64,
                Err(err) => return Err(err),
            };
            if id == rid {
                return Ok(entry);
            }
        }
        Err(BinaryError::ReferenceNotFound(rid))
    }

    /// Registry entry referenced by the managed reference field `owner`
    pub fn resolve<'a>(
        owner: &RandomAccessReader<'_>,
        registry: &RandomAccessReader<'a>,
    ) -> Result<RandomAccessReader<'a>> {
        let rid = Self::reference_id(owner)?;
        Self::find(registry, rid)
    }
}

enum EntryTable<'a> {
    /// Version 2 `RefIds` array
    Array {
        table: RandomAccessReader<'a>,
        count: usize,
    },
    /// Version 1 registry repeating its entry template
    Inline(RandomAccessReader<'a>),
}

/// Iterator over registry entries, see [`ManagedReferenceResolver::entries`]
pub struct RegistryEntries<'a> {
    table: EntryTable<'a>,
    next: usize,
    done: bool,
}

impl<'a> Iterator for RegistryEntries<'a> {
    type Item = Result<RandomAccessReader<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match &self.table {
            EntryTable::Array { count, .. } if self.next >= *count => None,
            EntryTable::Array { table, .. } => Some(table.at(self.next)),
            EntryTable::Inline(registry) => registry.inline_entry(self.next).transpose(),
        };
        match &item {
            Some(Ok(_)) => self.next += 1,
            _ => self.done = true,
        }
        item
    }
}
