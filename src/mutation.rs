//! Incremental edge mutation.
//!
//! The mutation engine is the only authoritative path for changing a live
//! graph: it applies a batch of random edge additions and removals in place
//! and reports each as a [`ChangeRecord`].

use chrono::Utc;
use rand::rngs::StdRng;
use rand::Rng;

use crate::graph::Graph;
use crate::types::{ChangeRecord, EdgeKey, NodeId};

/// Error type for graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An argument failed validation; the operation was aborted and no state
    /// was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Validated size of one mutation batch.
///
/// Raw counts arrive from the configuration surface as signed integers;
/// validation happens here, once, so the engine itself only ever sees
/// non-negative sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationParams {
    add_count: usize,
    remove_count: usize,
}

impl MutationParams {
    /// Validate raw add/remove counts.
    pub fn new(add_edges: i64, remove_edges: i64) -> Result<Self, GraphError> {
        if add_edges < 0 {
            return Err(GraphError::InvalidArgument(format!(
                "add_edges must be non-negative, got {}",
                add_edges
            )));
        }
        if remove_edges < 0 {
            return Err(GraphError::InvalidArgument(format!(
                "remove_edges must be non-negative, got {}",
                remove_edges
            )));
        }
        Ok(Self {
            add_count: add_edges as usize,
            remove_count: remove_edges as usize,
        })
    }

    /// Requested number of edge additions.
    pub fn add_count(&self) -> usize {
        self.add_count
    }

    /// Requested number of edge removals.
    pub fn remove_count(&self) -> usize {
        self.remove_count
    }

    /// Whether the batch requests no work at all.
    pub fn is_noop(&self) -> bool {
        self.add_count == 0 && self.remove_count == 0
    }
}

/// Apply one mutation batch to `graph` in place.
///
/// Additions pick two distinct nodes uniformly at random; when the pair is
/// already connected the attempt is skipped, so `add_count` is a best-effort
/// upper bound, not a guarantee. Removals pick up to `remove_count` existing
/// edges uniformly without replacement.
///
/// Returns the ordered change records (additions first, then removals).
/// A graph with fewer than two nodes, or an all-zero batch, yields an empty
/// vector and an untouched graph.
pub fn apply_update(graph: &mut Graph, params: &MutationParams, rng: &mut StdRng) -> Vec<ChangeRecord> {
    let mut records = Vec::new();

    let nodes: Vec<NodeId> = graph.nodes().collect();
    if nodes.len() < 2 || params.is_noop() {
        return records;
    }

    for _ in 0..params.add_count() {
        let i = rng.gen_range(0..nodes.len());
        // Uniform over the other nodes, never equal to i
        let j = (i + 1 + rng.gen_range(0..nodes.len() - 1)) % nodes.len();
        let key = match EdgeKey::new(nodes[i], nodes[j]) {
            Some(key) => key,
            None => continue,
        };
        if graph.has_edge(&key) {
            // Accepted policy: no retry, the batch may under-deliver
            continue;
        }
        let now = Utc::now();
        graph.add_edge(key, now);
        records.push(ChangeRecord::added(key, now));
    }

    if params.remove_count() > 0 {
        let mut keys = graph.edge_keys();
        let take = params.remove_count().min(keys.len());
        for _ in 0..take {
            let idx = rng.gen_range(0..keys.len());
            let key = keys.swap_remove(idx);
            graph.remove_edge(&key);
            records.push(ChangeRecord::removed(key, Utc::now()));
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn key(a: u32, b: u32) -> EdgeKey {
        EdgeKey::new(NodeId::new(a), NodeId::new(b)).unwrap()
    }

    #[test]
    fn test_negative_counts_rejected() {
        assert!(matches!(
            MutationParams::new(-1, 0),
            Err(GraphError::InvalidArgument(_))
        ));
        assert!(matches!(
            MutationParams::new(0, -5),
            Err(GraphError::InvalidArgument(_))
        ));
        assert!(MutationParams::new(0, 0).is_ok());
    }

    #[test]
    fn test_noop_batch() {
        let mut g = Graph::with_nodes(10);
        let params = MutationParams::new(0, 0).unwrap();
        let records = apply_update(&mut g, &params, &mut rng(1));
        assert!(records.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_tiny_graph_is_noop() {
        let mut g = Graph::with_nodes(1);
        let params = MutationParams::new(5, 5).unwrap();
        let records = apply_update(&mut g, &params, &mut rng(1));
        assert!(records.is_empty());
    }

    #[test]
    fn test_additions_bounded_by_request() {
        let mut g = Graph::with_nodes(10);
        let params = MutationParams::new(4, 0).unwrap();
        let records = apply_update(&mut g, &params, &mut rng(7));

        assert!(records.len() <= 4);
        assert!(records.iter().all(|r| r.is_add()));
        assert_eq!(g.edge_count(), records.len());
        // Empty 10-node graph: first attempt can never collide
        assert!(!records.is_empty());
    }

    #[test]
    fn test_complete_graph_adds_nothing() {
        let mut g = Graph::with_nodes(4);
        for a in 0..4 {
            for b in (a + 1)..4 {
                g.add_edge(key(a, b), Utc::now());
            }
        }
        let params = MutationParams::new(10, 0).unwrap();
        let records = apply_update(&mut g, &params, &mut rng(3));
        assert!(records.is_empty());
        assert_eq!(g.edge_count(), 6);
    }

    #[test]
    fn test_removal_without_replacement() {
        let mut g = Graph::with_nodes(5);
        for a in 0..5 {
            for b in (a + 1)..5 {
                g.add_edge(key(a, b), Utc::now());
            }
        }
        assert_eq!(g.edge_count(), 10);

        let params = MutationParams::new(0, 4).unwrap();
        let records = apply_update(&mut g, &params, &mut rng(9));

        assert_eq!(records.len(), 4);
        assert_eq!(g.edge_count(), 6);
        // Removed edges are distinct
        let mut removed: Vec<_> = records.iter().map(|r| r.edge).collect();
        removed.sort();
        removed.dedup();
        assert_eq!(removed.len(), 4);
    }

    #[test]
    fn test_removal_bounded_by_edge_count() {
        let mut g = Graph::with_nodes(3);
        g.add_edge(key(0, 1), Utc::now());
        g.add_edge(key(1, 2), Utc::now());

        let params = MutationParams::new(0, 100).unwrap();
        let records = apply_update(&mut g, &params, &mut rng(2));

        assert_eq!(records.len(), 2);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_deterministic_for_same_rng_seed() {
        let mut g1 = Graph::with_nodes(20);
        let mut g2 = Graph::with_nodes(20);
        let params = MutationParams::new(5, 0).unwrap();

        let r1 = apply_update(&mut g1, &params, &mut rng(42));
        let r2 = apply_update(&mut g2, &params, &mut rng(42));

        let e1: Vec<_> = r1.iter().map(|r| r.edge).collect();
        let e2: Vec<_> = r2.iter().map(|r| r.edge).collect();
        assert_eq!(e1, e2);
    }
}
