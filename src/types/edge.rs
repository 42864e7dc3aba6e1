//! Edge keys for the undirected network.

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Canonical key of an undirected edge.
///
/// The pair is stored as `(min, max)` regardless of construction order, so an
/// edge has exactly one key and edge sets behave as true sets of unordered
/// pairs. Self-loops are unrepresentable: [`EdgeKey::new`] rejects them.
///
/// Implements `Ord` over `(a, b)` for deterministic iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    /// Smaller endpoint.
    a: NodeId,
    /// Larger endpoint.
    b: NodeId,
}

impl EdgeKey {
    /// Create a canonical edge key between two distinct nodes.
    ///
    /// Returns `None` when both endpoints are the same node.
    pub fn new(u: NodeId, v: NodeId) -> Option<Self> {
        if u == v {
            return None;
        }
        if u < v {
            Some(Self { a: u, b: v })
        } else {
            Some(Self { a: v, b: u })
        }
    }

    /// Smaller endpoint.
    pub fn a(&self) -> NodeId {
        self.a
    }

    /// Larger endpoint.
    pub fn b(&self) -> NodeId {
        self.b
    }

    /// Both endpoints in canonical order.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint at all.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.a {
            Some(self.b)
        } else if node == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}
