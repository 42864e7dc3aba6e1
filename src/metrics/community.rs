//! Greedy modularity community detection.
//!
//! A CNM-style agglomeration: every node starts in its own community and the
//! pair of *connected* communities with the best modularity gain is merged
//! until no merge improves modularity. Quadratic-ish and fine at dashboard
//! scale; correctness over speed.

use std::collections::BTreeMap;

use crate::graph::Graph;
use crate::types::{CommunityAssignment, NodeId};

/// Merge gains below this are treated as zero.
const GAIN_EPSILON: f64 = 1e-12;

/// Detect communities by greedy modularity maximization.
///
/// Community ids in the result are dense `0..k`, assigned in first-seen node
/// order. Ids have no identity beyond grouping and are not stable across
/// recomputation.
///
/// An edgeless graph degenerates to one singleton community per node with
/// modularity 0.
pub fn detect_communities(graph: &Graph) -> CommunityAssignment {
    let n = graph.node_count();
    let m = graph.edge_count();

    // Community label per node; labels start as node indices.
    let mut label: Vec<usize> = (0..n).collect();

    if m > 0 {
        let m = m as f64;

        // Sum of degrees per community
        let mut degree_sum: BTreeMap<usize, f64> = graph
            .nodes()
            .map(|v| (v.index(), graph.degree(v) as f64))
            .collect();
        // Intra-community edge count per community
        let mut intra: BTreeMap<usize, f64> = BTreeMap::new();
        // Edge count between community pairs, keyed (small, large)
        let mut between: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (edge, _) in graph.edges() {
            let (a, b) = (edge.a().index(), edge.b().index());
            *between.entry((a.min(b), a.max(b))).or_insert(0.0) += 1.0;
        }

        loop {
            // Best gain over connected community pairs:
            //   dQ = e_cd / m  -  a_c * a_d / (2 m^2)
            let mut best: Option<((usize, usize), f64)> = None;
            for (&(c, d), &e_cd) in &between {
                let gain = e_cd / m - degree_sum[&c] * degree_sum[&d] / (2.0 * m * m);
                match best {
                    Some((_, best_gain)) if gain <= best_gain => {}
                    _ => best = Some(((c, d), gain)),
                }
            }

            let ((c, d), gain) = match best {
                Some(found) => found,
                None => break,
            };
            if gain <= GAIN_EPSILON {
                break;
            }

            // Merge d into c
            let e_cd = between.remove(&(c, d)).unwrap_or(0.0);
            let d_degree = degree_sum.remove(&d).unwrap_or(0.0);
            *degree_sum.entry(c).or_insert(0.0) += d_degree;
            let d_intra = intra.remove(&d).unwrap_or(0.0);
            *intra.entry(c).or_insert(0.0) += d_intra + e_cd;

            // Re-key d's remaining neighbor links to c
            let stale: Vec<((usize, usize), f64)> = between
                .iter()
                .filter(|(&(x, y), _)| x == d || y == d)
                .map(|(&k, &v)| (k, v))
                .collect();
            for ((x, y), weight) in stale {
                between.remove(&(x, y));
                let other = if x == d { y } else { x };
                *between
                    .entry((other.min(c), other.max(c)))
                    .or_insert(0.0) += weight;
            }

            for l in label.iter_mut() {
                if *l == d {
                    *l = c;
                }
            }
        }
    }

    densify(graph, &label, m)
}

/// Map arbitrary labels onto dense ids `0..k` in first-seen node order and
/// compute the final modularity.
fn densify(graph: &Graph, label: &[usize], edge_count: usize) -> CommunityAssignment {
    let mut dense: BTreeMap<usize, u32> = BTreeMap::new();
    let mut assignment: BTreeMap<NodeId, u32> = BTreeMap::new();
    let mut next = 0_u32;

    for node in graph.nodes() {
        let id = *dense.entry(label[node.index()]).or_insert_with(|| {
            let id = next;
            next += 1;
            id
        });
        assignment.insert(node, id);
    }

    let modularity = if edge_count > 0 {
        modularity_of(graph, &assignment)
    } else {
        0.0
    };

    CommunityAssignment {
        assignment,
        community_count: next,
        modularity,
    }
}

/// Modularity of a partition:
/// `Q = sum_c ( e_c / m - (deg_c / 2m)^2 )`
/// where `e_c` is the intra-community edge count and `deg_c` the degree sum.
pub fn modularity_of(graph: &Graph, assignment: &BTreeMap<NodeId, u32>) -> f64 {
    let m = graph.edge_count() as f64;
    if m == 0.0 {
        return 0.0;
    }

    let mut intra: BTreeMap<u32, f64> = BTreeMap::new();
    let mut degree_sum: BTreeMap<u32, f64> = BTreeMap::new();

    for node in graph.nodes() {
        if let Some(&c) = assignment.get(&node) {
            *degree_sum.entry(c).or_insert(0.0) += graph.degree(node) as f64;
        }
    }
    for (edge, _) in graph.edges() {
        let (a, b) = (assignment.get(&edge.a()), assignment.get(&edge.b()));
        if let (Some(ca), Some(cb)) = (a, b) {
            if ca == cb {
                *intra.entry(*ca).or_insert(0.0) += 1.0;
            }
        }
    }

    degree_sum
        .iter()
        .map(|(c, &deg)| {
            let e_c = intra.get(c).copied().unwrap_or(0.0);
            e_c / m - (deg / (2.0 * m)).powi(2)
        })
        .sum()
}
