//! Arena storage for node trees.
//!
//! All nodes of a program (and any nodes synthesized later) live in one
//! [`Tree`]. Children are stored as `NodeId` lists, so a subtree can be
//! referenced from several parents without copying. The only structural
//! rule is acyclicity, checked on every mutation that links a child.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{NodeId, Scalar};

/// Failure of a structural mutation. The tree is left unmodified.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("circular relationship detected: {child:?} already contains {parent:?}")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("child index {index} out of bounds for node with {len} children")]
    IndexOutOfBounds { index: usize, len: usize },
}

#[derive(Clone, Debug, Default)]
struct NodeData {
    tag: Scalar,
    children: SmallVec<[NodeId; 4]>,
}

/// Contiguous storage for every node of a program.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with estimated capacity based on source size.
    /// Heuristic: ~1 node per 4 bytes of source.
    pub fn with_capacity(source_len: usize) -> Self {
        Tree {
            nodes: Vec::with_capacity(source_len / 4),
        }
    }

    // ===== Allocation =====

    /// Allocate a leaf.
    #[inline]
    pub fn new_node(&mut self, tag: impl Into<Scalar>) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            tag: tag.into(),
            children: SmallVec::new(),
        });
        id
    }

    /// Allocate a call node over existing children.
    ///
    /// A fresh node cannot be contained by anything yet, so no cycle check
    /// is needed.
    pub fn new_call(&mut self, tag: impl Into<Scalar>, children: &[NodeId]) -> NodeId {
        let id = self.new_node(tag);
        self.nodes[id.index()].children.extend_from_slice(children);
        id
    }

    /// Get number of nodes in the arena.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ===== Access =====

    /// # Panics
    /// Panics if `id` was not issued by this tree.
    #[inline]
    #[track_caller]
    pub fn tag(&self, id: NodeId) -> &Scalar {
        &self.nodes[id.index()].tag
    }

    #[inline]
    #[track_caller]
    pub fn set_tag(&mut self, id: NodeId, tag: impl Into<Scalar>) {
        self.nodes[id.index()].tag = tag.into();
    }

    #[inline]
    #[track_caller]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    #[inline]
    pub fn len(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// A leaf evaluates to its own tag.
    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    #[inline]
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    // ===== Mutation =====

    /// Append `child` to `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_link(parent, child)?;
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Insert `child` at `index`, shifting later children right.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        let len = self.len(parent);
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.check_link(parent, child)?;
        self.nodes[parent.index()].children.insert(index, child);
        Ok(())
    }

    /// Replace the child at `index`, returning the one it displaced.
    pub fn set_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<NodeId, TreeError> {
        let len = self.len(parent);
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.check_link(parent, child)?;
        let slot = &mut self.nodes[parent.index()].children[index];
        Ok(std::mem::replace(slot, child))
    }

    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> Result<NodeId, TreeError> {
        let len = self.len(parent);
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        Ok(self.nodes[parent.index()].children.remove(index))
    }

    pub fn clear_children(&mut self, parent: NodeId) {
        self.nodes[parent.index()].children.clear();
    }

    fn check_link(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if child == parent || self.reaches(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        Ok(())
    }

    // ===== Queries =====

    /// Whether `target` is a proper descendant of `from`.
    ///
    /// Iterative depth-first scan of `from`'s descendants; shared subtrees
    /// are visited once.
    pub fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.extend_from_slice(self.children(from));
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.extend_from_slice(self.children(id));
        }
        false
    }

    /// Structural comparison of `a` in this tree with `b` in `other`.
    ///
    /// Tags must match (NaN matches NaN) and children must match in order
    /// and count. Node identity plays no role.
    pub fn same_shape(&self, a: NodeId, other: &Tree, b: NodeId) -> bool {
        let mut stack: Vec<(NodeId, NodeId)> = vec![(a, b)];
        while let Some((left, right)) = stack.pop() {
            if !self.tag(left).same_as(other.tag(right)) {
                return false;
            }
            let (lc, rc) = (self.children(left), other.children(right));
            if lc.len() != rc.len() {
                return false;
            }
            stack.extend(lc.iter().copied().zip(rc.iter().copied()));
        }
        true
    }
}
