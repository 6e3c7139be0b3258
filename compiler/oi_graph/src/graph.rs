//! The arena owning every node in a type graph (component A, §4.1).

use rustc_hash::FxHashMap;

use oi_errors::{Error, Result};

use crate::node::{Node, PrimitiveKind};
use crate::node_id::NodeId;

/// Owns every node reachable from a single code-generation run. Node
/// references are stable `NodeId`s for the arena's whole lifetime (§5
/// "Resources").
#[derive(Debug, Default)]
pub struct TypeGraph {
    nodes: Vec<Node>,
    /// Optional bound on arena size; `None` means unbounded. Exceeding it
    /// is `GraphArenaExhausted` (§4.1).
    capacity: Option<usize>,
    primitives: FxHashMap<PrimitiveKind, NodeId>,
    roots: Vec<NodeId>,
    /// Populated by the `TopoSort` pass (§4.4.9); empty until then.
    pub final_types: Vec<NodeId>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_limit(capacity: usize) -> Self {
        TypeGraph {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    fn push(&mut self, node: Node) -> Result<NodeId> {
        let index = self.nodes.len();
        if index > u32::MAX as usize {
            return Err(Error::GraphArenaExhausted(index));
        }
        if let Some(cap) = self.capacity {
            if index >= cap {
                return Err(Error::GraphArenaExhausted(cap));
            }
        }
        let id = NodeId::from_index(index);
        self.nodes.push(node);
        Ok(id)
    }

    /// Arena-allocate a new node and return its `NodeId`.
    ///
    /// The original C++ returns an interior reference; per the design
    /// notes (§9) this rewrite uses index-based identity instead, so
    /// callers look the node back up via [`TypeGraph::get`] /
    /// [`TypeGraph::get_mut`].
    pub fn make_type(&mut self, node: Node) -> Result<NodeId> {
        debug_assert!(
            !matches!(node, Node::Primitive(_)),
            "use make_primitive for Primitive nodes to preserve the singleton invariant"
        );
        self.push(node)
    }

    /// Primitive nodes are singletons per kind (§3.1): the first call for a
    /// given `kind` allocates it, later calls return the same `NodeId`.
    pub fn make_primitive(&mut self, kind: PrimitiveKind) -> Result<NodeId> {
        if let Some(&id) = self.primitives.get(&kind) {
            return Ok(id);
        }
        let id = self.push(Node::Primitive(kind))?;
        self.primitives.insert(kind, id);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn add_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn set_roots(&mut self, roots: Vec<NodeId>) {
        self.roots = roots;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::from_index)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;

    #[test]
    fn primitives_are_singletons() {
        let mut g = TypeGraph::new();
        let a = g.make_primitive(PrimitiveKind::Int32).unwrap();
        let b = g.make_primitive(PrimitiveKind::Int32).unwrap();
        let c = g.make_primitive(PrimitiveKind::Int64).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn node_ids_are_monotone() {
        let mut g = TypeGraph::new();
        let a = g.make_type(Node::Incomplete(crate::node::IncompleteNode {
            name: "A".into(),
        }))
        .unwrap();
        let b = g.make_type(Node::Incomplete(crate::node::IncompleteNode {
            name: "B".into(),
        }))
        .unwrap();
        assert!(a.index() < b.index());
    }

    #[test]
    fn arena_capacity_is_enforced() {
        let mut g = TypeGraph::with_capacity_limit(1);
        g.make_type(Node::Incomplete(crate::node::IncompleteNode {
            name: "A".into(),
        }))
        .unwrap();
        let err = g
            .make_type(Node::Incomplete(crate::node::IncompleteNode {
                name: "B".into(),
            }))
            .unwrap_err();
        assert!(matches!(err, Error::GraphArenaExhausted(1)));
    }
}
