//! Anatomical area hierarchy index
//!
//! Provides [`AreaIndex`], the read-only tree of brain-region nodes built
//! once from the metadata service. Supports ancestor resolution (nearest
//! first) and name lookup. Construction enforces name uniqueness and the
//! reserved-separator rule; traversal carries an explicit visited set so a
//! malformed hierarchy fails instead of looping.

use crate::error::AreaError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};

/// Identifier of an anatomical area node
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AreaId(pub i64);

impl Display for AreaId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the brain-area query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRow {
    /// Structure id
    pub id: AreaId,
    /// Area name
    pub name: String,
    /// Parent structure id, `None` for roots
    pub parent_id: Option<AreaId>,
}

/// A node in the hierarchy, immutable after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaNode {
    id: AreaId,
    name: String,
    parent_id: Option<AreaId>,
}

impl AreaNode {
    /// Node id
    #[inline]
    #[must_use]
    pub fn id(&self) -> AreaId {
        self.id
    }

    /// Area name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent id, `None` for a root node
    #[inline]
    #[must_use]
    pub fn parent_id(&self) -> Option<AreaId> {
        self.parent_id
    }
}

/// The anatomical hierarchy: id → node plus a name → id reverse lookup
///
/// Built once, shared read-only by every reconciler invocation.
#[derive(Debug, Default)]
pub struct AreaIndex {
    nodes: HashMap<AreaId, AreaNode>,
    by_name: HashMap<String, AreaId>,
}

impl AreaIndex {
    /// Build the index from hierarchy rows
    ///
    /// # Errors
    /// [`AreaError::DuplicateName`] if a name repeats,
    /// [`AreaError::ReservedSeparator`] if a name contains a comma.
    pub fn build(rows: impl IntoIterator<Item = AreaRow>) -> Result<Self, AreaError> {
        let mut index = Self::default();
        for row in rows {
            if row.name.contains(',') {
                return Err(AreaError::ReservedSeparator(row.name));
            }
            if index.by_name.contains_key(&row.name) {
                return Err(AreaError::DuplicateName(row.name));
            }
            index.by_name.insert(row.name.clone(), row.id);
            index.nodes.insert(
                row.id,
                AreaNode {
                    id: row.id,
                    name: row.name,
                    parent_id: row.parent_id,
                },
            );
        }
        Ok(index)
    }

    /// Resolve the ancestor names of `id`, nearest first
    ///
    /// Follows parent links until a root is reached. The node's own name is
    /// not included.
    ///
    /// # Errors
    /// [`AreaError::UnknownId`] for an id not in the index,
    /// [`AreaError::DanglingParent`] for a parent reference to a missing
    /// node, [`AreaError::CyclicHierarchy`] when traversal revisits a node.
    pub fn resolve_ancestors(&self, id: AreaId) -> Result<Vec<String>, AreaError> {
        let start = self.nodes.get(&id).ok_or(AreaError::UnknownId(id))?;
        let mut visited = HashSet::new();
        visited.insert(id);
        let mut ancestors = Vec::new();
        let mut current = start;
        while let Some(parent_id) = current.parent_id {
            let parent = self
                .nodes
                .get(&parent_id)
                .ok_or(AreaError::DanglingParent {
                    id: current.id,
                    parent: parent_id,
                })?;
            if !visited.insert(parent_id) {
                return Err(AreaError::CyclicHierarchy(parent_id));
            }
            ancestors.push(parent.name.clone());
            current = parent;
        }
        Ok(ancestors)
    }

    /// Look up an area id by its (unique) name
    #[inline]
    #[must_use]
    pub fn lookup_id_by_name(&self, name: &str) -> Option<AreaId> {
        self.by_name.get(name).copied()
    }

    /// Get a node by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: AreaId) -> Option<&AreaNode> {
        self.nodes.get(&id)
    }

    /// Number of nodes in the index
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
