//! TypeTree construction from flattened node lists
//!
//! Schema providers usually hand out a type tree as a pre-order list of nodes
//! carrying their depth (`level`). The builder turns such a list into the
//! shared tree the reader walks.

use super::types::TypeTreeNode;
use crate::error::{BinaryError, Result};
use std::sync::Arc;

/// TypeTree builder
///
/// Collects flattened nodes in pre-order and assembles them into an immutable
/// tree on [`TypeTreeBuilder::build`].
#[derive(Debug, Default)]
pub struct TypeTreeBuilder {
    nodes: Vec<TypeTreeNode>,
}

impl TypeTreeBuilder {
    /// Create a new TypeTree builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Append one flattened node.
    ///
    /// Any children already attached to `node` are discarded; structure comes
    /// from `level` alone.
    pub fn push(&mut self, mut node: TypeTreeNode) -> &mut Self {
        node.children.clear();
        self.nodes.push(node);
        self
    }

    /// Append a node described by its basic fields
    pub fn push_field(
        &mut self,
        level: i32,
        type_name: &str,
        name: &str,
        byte_size: i32,
        meta_flags: i32,
    ) -> &mut Self {
        let mut node = TypeTreeNode::new(type_name, name, byte_size);
        node.level = level;
        node.meta_flags = meta_flags;
        self.push(node)
    }

    /// Number of nodes collected so far
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Assemble the collected nodes into a tree and return its root
    pub fn build(self) -> Result<Arc<TypeTreeNode>> {
        let mut nodes = self.nodes.into_iter().enumerate();
        let (_, mut root) = nodes
            .next()
            .ok_or_else(|| BinaryError::invalid_data("Type tree has no nodes"))?;
        if root.level != 0 {
            return Err(BinaryError::invalid_data(format!(
                "Root node must have level 0, got {}",
                root.level
            )));
        }
        root.index = 0;

        // Open ancestors; the last entry is the node currently receiving children
        let mut stack: Vec<TypeTreeNode> = vec![root];

        for (index, mut node) in nodes {
            node.index = index as i32;
            let parent_level = node.level - 1;
            if node.level < 1 || parent_level > top_level(&stack) {
                return Err(BinaryError::invalid_data(format!(
                    "Node {} '{}' has level {} with no parent at level {}",
                    index, node.name, node.level, parent_level
                )));
            }
            while top_level(&stack) > parent_level {
                close_top(&mut stack);
            }
            stack.push(node);
        }

        while stack.len() > 1 {
            close_top(&mut stack);
        }

        let root = stack
            .pop()
            .ok_or_else(|| BinaryError::invalid_data("Type tree has no root"))?;
        root.validate()?;
        Ok(Arc::new(root))
    }
}

fn top_level(stack: &[TypeTreeNode]) -> i32 {
    stack.last().map_or(-1, |node| node.level)
}

/// Pop the innermost open node and attach it to its parent
fn close_top(stack: &mut Vec<TypeTreeNode>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(child) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Arc::new(child));
        }
    }
}
