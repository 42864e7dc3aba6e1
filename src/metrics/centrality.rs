//! Centrality measures as pure functions over a graph.
//!
//! All functions assume the node set is the contiguous range `0..n` (the
//! [`Graph`](crate::graph::Graph) invariant) and use dense vectors indexed by
//! node for algorithm state.

use std::collections::{BTreeMap, VecDeque};

use crate::graph::Graph;
use crate::types::NodeId;

/// Degree centrality: degree normalized by `n - 1`.
///
/// A single-node or empty graph yields all-zero (or empty) scores.
pub fn degree_centrality(graph: &Graph) -> BTreeMap<NodeId, f64> {
    let n = graph.node_count();
    let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };
    graph
        .nodes()
        .map(|node| (node, graph.degree(node) as f64 / denom))
        .collect()
}

/// Betweenness centrality via Brandes' algorithm, normalized.
///
/// Cost is `O(n * m)` for unweighted graphs, which is why callers gate it
/// behind a node-count ceiling.
pub fn betweenness_centrality(graph: &Graph) -> BTreeMap<NodeId, f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0_f64; n];

    for s in 0..n {
        // Single-source shortest paths by BFS
        let mut stack: Vec<usize> = Vec::new();
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist = vec![-1_i64; n];
        sigma[s] = 1.0;
        dist[s] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for w in graph.neighbors(NodeId::new(v as u32)) {
                let w = w.index();
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        // Dependency accumulation, back to front
        let mut delta = vec![0.0_f64; n];
        while let Some(w) = stack.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    // Each unordered pair was counted from both endpoints; the normalization
    // for undirected graphs folds that factor in.
    let scale = if n > 2 {
        1.0 / ((n - 1) as f64 * (n - 2) as f64)
    } else {
        0.0
    };

    centrality
        .into_iter()
        .enumerate()
        .map(|(i, c)| (NodeId::new(i as u32), c * scale))
        .collect()
}

/// Closeness centrality: `(n - 1) / sum(shortest path lengths)`.
///
/// Only meaningful for connected graphs; callers check connectivity first.
pub fn closeness_centrality(graph: &Graph) -> BTreeMap<NodeId, f64> {
    let n = graph.node_count();
    graph
        .nodes()
        .map(|node| {
            let distances = bfs_distances(graph, node);
            let total: u64 = distances.iter().filter(|&&d| d > 0).map(|&d| d as u64).sum();
            let score = if total > 0 {
                (n - 1) as f64 / total as f64
            } else {
                0.0
            };
            (node, score)
        })
        .collect()
}

/// Eigenvector centrality by power iteration on `A + I`.
///
/// Returns `Err(iterations)` when the iteration budget is exhausted before
/// the L1 change drops below `n * tol`; callers degrade to an unavailable
/// result instead of propagating.
pub fn eigenvector_centrality(
    graph: &Graph,
    max_iter: usize,
    tol: f64,
) -> Result<BTreeMap<NodeId, f64>, usize> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(BTreeMap::new());
    }

    let mut x = vec![1.0 / n as f64; n];

    for _ in 0..max_iter {
        let last = x.clone();
        // x = (A + I) * last; the identity term keeps the iteration stable on
        // bipartite components.
        for v in 0..n {
            for w in graph.neighbors(NodeId::new(v as u32)) {
                x[w.index()] += last[v];
            }
        }

        let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        let norm = if norm > 0.0 { norm } else { 1.0 };
        for v in x.iter_mut() {
            *v /= norm;
        }

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * tol {
            return Ok(x
                .into_iter()
                .enumerate()
                .map(|(i, score)| (NodeId::new(i as u32), score))
                .collect());
        }
    }

    Err(max_iter)
}

/// BFS distances from `source`, `-1` for unreachable nodes.
pub(crate) fn bfs_distances(graph: &Graph, source: NodeId) -> Vec<i64> {
    let n = graph.node_count();
    let mut dist = vec![-1_i64; n];
    dist[source.index()] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source.index());
    while let Some(v) = queue.pop_front() {
        for w in graph.neighbors(NodeId::new(v as u32)) {
            let w = w.index();
            if dist[w] < 0 {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
        }
    }

    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeKey;
    use chrono::Utc;

    fn graph_from_edges(n: usize, edges: &[(u32, u32)]) -> Graph {
        let mut g = Graph::with_nodes(n);
        for &(a, b) in edges {
            g.add_edge(
                EdgeKey::new(NodeId::new(a), NodeId::new(b)).unwrap(),
                Utc::now(),
            );
        }
        g
    }

    /// Path graph 0 - 1 - 2 - 3 - 4.
    fn path5() -> Graph {
        graph_from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)])
    }

    /// Star with center 0 and four leaves.
    fn star5() -> Graph {
        graph_from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4)])
    }

    #[test]
    fn test_degree_centrality_star() {
        let scores = degree_centrality(&star5());
        assert!((scores[&NodeId::new(0)] - 1.0).abs() < 1e-12);
        assert!((scores[&NodeId::new(1)] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_degree_centrality_singleton() {
        let scores = degree_centrality(&Graph::with_nodes(1));
        assert_eq!(scores[&NodeId::new(0)], 0.0);
    }

    #[test]
    fn test_betweenness_star_center() {
        let scores = betweenness_centrality(&star5());
        // Center lies on every pair of leaves: 1.0 normalized
        assert!((scores[&NodeId::new(0)] - 1.0).abs() < 1e-9);
        assert!(scores[&NodeId::new(1)].abs() < 1e-9);
    }

    #[test]
    fn test_betweenness_path_middle() {
        let scores = betweenness_centrality(&path5());
        // Middle of a 5-path: 4 of the 6 pairs pass through it
        assert!((scores[&NodeId::new(2)] - 4.0 / 6.0).abs() < 1e-9);
        assert!(scores[&NodeId::new(0)].abs() < 1e-9);
    }

    #[test]
    fn test_closeness_path_ends() {
        let scores = closeness_centrality(&path5());
        // End node: distances 1+2+3+4 = 10
        assert!((scores[&NodeId::new(0)] - 0.4).abs() < 1e-9);
        // Middle node: distances 1+1+2+2 = 6
        assert!((scores[&NodeId::new(2)] - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_eigenvector_star_center_dominates() {
        let scores = eigenvector_centrality(&star5(), 200, 1e-8).unwrap();
        let center = scores[&NodeId::new(0)];
        for leaf in 1..5 {
            assert!(center > scores[&NodeId::new(leaf)]);
        }
    }

    #[test]
    fn test_eigenvector_non_convergence_reported() {
        let result = eigenvector_centrality(&path5(), 1, 0.0);
        assert_eq!(result, Err(1));
    }

    #[test]
    fn test_bfs_unreachable_marked() {
        let g = graph_from_edges(4, &[(0, 1)]);
        let dist = bfs_distances(&g, NodeId::new(0));
        assert_eq!(dist, vec![0, 1, -1, -1]);
    }
}
