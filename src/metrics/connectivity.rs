//! Connected components and diameter.

use crate::graph::Graph;
use crate::types::NodeId;

use super::centrality::bfs_distances;

/// Number of connected components. An empty graph has 0.
pub fn component_count(graph: &Graph) -> usize {
    let n = graph.node_count();
    let mut seen = vec![false; n];
    let mut components = 0;

    for start in 0..n {
        if seen[start] {
            continue;
        }
        components += 1;
        // Flood the component
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(v) = stack.pop() {
            for w in graph.neighbors(NodeId::new(v as u32)) {
                let w = w.index();
                if !seen[w] {
                    seen[w] = true;
                    stack.push(w);
                }
            }
        }
    }

    components
}

/// Whether every node is reachable from every other. Graphs with fewer than
/// two nodes count as connected.
pub fn is_connected(graph: &Graph) -> bool {
    graph.node_count() < 2 || component_count(graph) == 1
}

/// Diameter of a connected graph: the largest BFS eccentricity.
///
/// Returns `None` for disconnected or empty graphs. All-pairs BFS, so callers
/// gate it behind the same ceiling as closeness.
pub fn diameter(graph: &Graph) -> Option<u32> {
    let n = graph.node_count();
    if n == 0 || !is_connected(graph) {
        return None;
    }

    let mut max_distance = 0_i64;
    for node in graph.nodes() {
        let eccentricity = bfs_distances(graph, node).into_iter().max().unwrap_or(0);
        max_distance = max_distance.max(eccentricity);
    }

    Some(max_distance as u32)
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

    #[test]
    fn test_path_is_connected() {
        let g = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        assert!(is_connected(&g));
        assert_eq!(component_count(&g), 1);
        assert_eq!(diameter(&g), Some(3));
    }

    #[test]
    fn test_two_components() {
        let g = graph_from_edges(5, &[(0, 1), (2, 3)]);
        assert!(!is_connected(&g));
        assert_eq!(component_count(&g), 3); // pair, pair, isolated node 4
        assert_eq!(diameter(&g), None);
    }

    #[test]
    fn test_tiny_graphs() {
        assert!(is_connected(&Graph::with_nodes(0)));
        assert!(is_connected(&Graph::with_nodes(1)));
        assert_eq!(component_count(&Graph::with_nodes(0)), 0);
        assert_eq!(diameter(&Graph::with_nodes(1)), Some(0));
    }
}
