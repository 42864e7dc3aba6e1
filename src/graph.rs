//! The in-memory undirected graph.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hasher;

use chrono::{DateTime, Utc};
use xxhash_rust::xxh64::Xxh64;

use crate::types::{EdgeKey, NodeId};

/// An undirected graph over nodes `0..n` with timestamped edges.
///
/// Uses BTreeMap/BTreeSet for deterministic iteration order. The adjacency
/// sets and the edge timestamp map always describe the same edge set; both are
/// updated together by [`Graph::add_edge`] and [`Graph::remove_edge`].
///
/// Cloning yields a fully independent copy: mutations to the original never
/// show through a clone. The store's snapshot contract relies on this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    /// Neighbor sets, one entry per node (possibly empty).
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    /// Creation timestamp per edge, keyed canonically.
    edges: BTreeMap<EdgeKey, DateTime<Utc>>,
}

impl Graph {
    /// Create a graph with `node_count` isolated nodes `0..node_count`.
    pub fn with_nodes(node_count: usize) -> Self {
        let adjacency = (0..node_count as u32)
            .map(|i| (NodeId::new(i), BTreeSet::new()))
            .collect();
        Self {
            adjacency,
            edges: BTreeMap::new(),
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Maximum possible number of edges: `n * (n - 1) / 2`.
    pub fn max_edge_count(&self) -> usize {
        let n = self.node_count();
        n * n.saturating_sub(1) / 2
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Iterate over all node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Whether `node` exists in the graph.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Neighbors of `node` in ascending order. Empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Degree of `node`; 0 for unknown nodes.
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, |set| set.len())
    }

    /// Whether the edge exists.
    pub fn has_edge(&self, edge: &EdgeKey) -> bool {
        self.edges.contains_key(edge)
    }

    /// Insert an edge with its creation timestamp.
    ///
    /// Returns `false` without touching anything when the edge already exists
    /// or either endpoint is not a node of this graph.
    pub fn add_edge(&mut self, edge: EdgeKey, timestamp: DateTime<Utc>) -> bool {
        if self.edges.contains_key(&edge) {
            return false;
        }
        let (a, b) = edge.endpoints();
        if !self.adjacency.contains_key(&a) || !self.adjacency.contains_key(&b) {
            return false;
        }

        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        self.edges.insert(edge, timestamp);
        true
    }

    /// Remove an edge, returning its timestamp if it existed.
    pub fn remove_edge(&mut self, edge: &EdgeKey) -> Option<DateTime<Utc>> {
        let timestamp = self.edges.remove(edge)?;
        let (a, b) = edge.endpoints();
        if let Some(set) = self.adjacency.get_mut(&a) {
            set.remove(&b);
        }
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.remove(&a);
        }
        Some(timestamp)
    }

    /// Iterate over all edges with their timestamps, in canonical key order.
    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &DateTime<Utc>)> {
        self.edges.iter()
    }

    /// All edge keys in canonical order.
    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.keys().copied().collect()
    }

    /// Deterministic fingerprint of the graph structure.
    ///
    /// Computed as xxh64 over node count and the sorted edge pairs.
    /// Timestamps are excluded: two graphs with identical topology hash the
    /// same. Used alongside the version counter to detect a reset that reused
    /// a version number for a different graph.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        hasher.write_u64(self.node_count() as u64);
        for edge in self.edges.keys() {
            hasher.write_u32(edge.a().as_u32());
            hasher.write_u32(edge.b().as_u32());
        }
        hasher.finish()
    }
}
