//! Node identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of a node in the network.
///
/// The node set of a graph is always the contiguous range `0..n`; nodes are
/// never removed, only edges change. This lets dense per-node algorithm state
/// live in plain vectors indexed by [`NodeId::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node identifier.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw identifier value.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// The identifier as a vector index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_ordering() {
        let a = NodeId::new(1);
        let b = NodeId::new(2);
        assert!(a < b);
        assert_eq!(a.index(), 1);
    }

    #[test]
    fn test_node_id_serde_transparent() {
        let id = NodeId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
