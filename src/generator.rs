//! Seeded synthetic graph generators.
//!
//! Three classic topologies are supported; the generation call is fully
//! deterministic for a given `(kind, node_count, seed)` triple. Structure is
//! generated first as a set of edge keys, then every edge is stamped with a
//! synthetic timestamp 1 to 30 days in the past so the initial data does not
//! all appear simultaneous.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::Graph;
use crate::types::{EdgeKey, NodeId};

/// Links attached per arriving node in preferential attachment.
const ATTACHMENT_LINKS: usize = 3;
/// Edge probability for the random (Erdős–Rényi) topology.
const RANDOM_EDGE_PROBABILITY: f64 = 0.1;
/// Ring-lattice neighbor count for the small-world topology.
const SMALL_WORLD_NEIGHBORS: usize = 6;
/// Rewiring probability for the small-world topology.
const SMALL_WORLD_REWIRE_PROBABILITY: f64 = 0.3;
/// Look-back window for synthetic edge timestamps, in days.
const BACKDATE_DAYS: (i64, i64) = (1, 30);

/// Kind of synthetic topology to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GraphKind {
    /// Scale-free graph via preferential attachment (Barabási–Albert).
    PreferentialAttachment,
    /// Uniform random graph (Erdős–Rényi).
    Random,
    /// Small-world graph (Watts–Strogatz).
    SmallWorld,
}

impl GraphKind {
    /// Parse a kind from string.
    ///
    /// Unknown names fall back to [`GraphKind::PreferentialAttachment`] so a
    /// store is always constructible from untrusted configuration.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "preferential_attachment" | "barabasi_albert" => Self::PreferentialAttachment,
            "random" | "erdos_renyi" => Self::Random,
            "small_world" | "watts_strogatz" => Self::SmallWorld,
            _ => Self::PreferentialAttachment,
        }
    }
}

impl Default for GraphKind {
    fn default() -> Self {
        Self::PreferentialAttachment
    }
}

impl std::fmt::Display for GraphKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreferentialAttachment => write!(f, "preferential_attachment"),
            Self::Random => write!(f, "random"),
            Self::SmallWorld => write!(f, "small_world"),
        }
    }
}

/// Generate a graph of `node_count` nodes with the requested topology.
///
/// Deterministic: the same `(kind, node_count, seed)` always yields identical
/// node and edge sets. For `node_count < 2` the result is just isolated nodes.
pub fn generate(kind: GraphKind, node_count: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);

    let edges = if node_count < 2 {
        BTreeSet::new()
    } else {
        match kind {
            GraphKind::PreferentialAttachment => {
                preferential_attachment(node_count, ATTACHMENT_LINKS, &mut rng)
            }
            GraphKind::Random => random_graph(node_count, RANDOM_EDGE_PROBABILITY, &mut rng),
            GraphKind::SmallWorld => small_world(
                node_count,
                SMALL_WORLD_NEIGHBORS,
                SMALL_WORLD_REWIRE_PROBABILITY,
                &mut rng,
            ),
        }
    };

    let mut graph = Graph::with_nodes(node_count);
    let now = Utc::now();
    for edge in edges {
        let days = rng.gen_range(BACKDATE_DAYS.0..=BACKDATE_DAYS.1);
        graph.add_edge(edge, now - Duration::days(days));
    }

    tracing::debug!(
        kind = %kind,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        seed,
        "generated graph"
    );

    graph
}

fn edge(a: u32, b: u32) -> Option<EdgeKey> {
    EdgeKey::new(NodeId::new(a), NodeId::new(b))
}

/// Barabási–Albert preferential attachment.
///
/// Each arriving node links to `m` distinct targets drawn from a pool that
/// repeats nodes once per incident edge, biasing selection toward high-degree
/// nodes. `m` is clamped to `node_count - 1` for tiny graphs.
fn preferential_attachment(node_count: usize, m: usize, rng: &mut StdRng) -> BTreeSet<EdgeKey> {
    let m = m.clamp(1, node_count - 1);
    let mut edges = BTreeSet::new();

    // Seed pool with the first m nodes; each is a valid first target.
    let mut pool: Vec<u32> = (0..m as u32).collect();

    for source in m as u32..node_count as u32 {
        let mut targets: BTreeSet<u32> = BTreeSet::new();
        while targets.len() < m {
            let pick = pool[rng.gen_range(0..pool.len())];
            targets.insert(pick);
        }
        for target in targets {
            if let Some(key) = edge(source, target) {
                edges.insert(key);
                pool.push(target);
                pool.push(source);
            }
        }
    }

    edges
}

/// Erdős–Rényi G(n, p): each node pair gets an edge independently.
fn random_graph(node_count: usize, p: f64, rng: &mut StdRng) -> BTreeSet<EdgeKey> {
    let mut edges = BTreeSet::new();
    for a in 0..node_count as u32 {
        for b in (a + 1)..node_count as u32 {
            if rng.gen_bool(p) {
                if let Some(key) = edge(a, b) {
                    edges.insert(key);
                }
            }
        }
    }
    edges
}

/// Watts–Strogatz: ring lattice with `k` nearest neighbors, then each lattice
/// edge is rewired to a random endpoint with probability `beta`.
fn small_world(node_count: usize, k: usize, beta: f64, rng: &mut StdRng) -> BTreeSet<EdgeKey> {
    let n = node_count as u32;
    let half = k.min(node_count - 1) / 2;
    let mut edges = BTreeSet::new();

    for offset in 1..=half as u32 {
        for a in 0..n {
            let b = (a + offset) % n;
            if let Some(key) = edge(a, b) {
                edges.insert(key);
            }
        }
    }

    // Rewire pass. An attempt that cannot find a free endpoint after n tries
    // keeps the lattice edge (only happens on near-complete graphs).
    let lattice: Vec<EdgeKey> = edges.iter().copied().collect();
    for key in lattice {
        if !rng.gen_bool(beta) {
            continue;
        }
        let a = key.a().as_u32();
        for _ in 0..n {
            let w = rng.gen_range(0..n);
            let candidate = match edge(a, w) {
                Some(c) => c,
                None => continue,
            };
            if !edges.contains(&candidate) {
                edges.remove(&key);
                edges.insert(candidate);
                break;
            }
        }
    }

    edges
}
