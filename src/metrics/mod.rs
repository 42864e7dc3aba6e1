//! Structural metrics over a graph snapshot.
//!
//! A [`MetricsEngine`] is built over one detached [`GraphSnapshot`] and never
//! re-reads the live store: everything it reports is a pure function of the
//! snapshot (and so of the version) it was built from. Expensive measures are
//! gated by node-count ceilings and degrade to typed unavailable results
//! instead of failing; per-measure results are cached for the engine's
//! lifetime unless a forced recomputation is requested.

pub mod centrality;
pub mod community;
pub mod connectivity;

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::store::GraphSnapshot;
use crate::types::{
    CentralityMeasure, CommunityOutcome, Connectivity, MeasureOutcome, MetricsSnapshot, NodeId,
    UnavailableReason,
};

/// Gates and budgets for the expensive measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Betweenness is skipped for graphs above this many nodes.
    pub betweenness_ceiling: usize,
    /// Closeness, eigenvector, and diameter are skipped above this many nodes.
    pub exact_ceiling: usize,
    /// Iteration budget for eigenvector power iteration.
    pub eigenvector_max_iter: usize,
    /// Convergence tolerance for eigenvector power iteration.
    pub eigenvector_tol: f64,
    /// Whether betweenness is computed at all.
    pub compute_betweenness: bool,
    /// Default result size for top-k queries.
    pub top_k_default: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            betweenness_ceiling: 1000,
            exact_ceiling: 500,
            eigenvector_max_iter: 100,
            eigenvector_tol: 1e-6,
            compute_betweenness: true,
            top_k_default: 10,
        }
    }
}

/// Metrics engine over one graph snapshot.
///
/// Tied to the snapshot's version for its whole lifetime; build a fresh engine
/// (or go through [`MetricsCache`](crate::cache::MetricsCache)) for each new
/// version.
#[derive(Debug)]
pub struct MetricsEngine {
    snapshot: GraphSnapshot,
    config: MetricsConfig,
    centrality_cache: BTreeMap<CentralityMeasure, MeasureOutcome>,
    community_cache: Option<CommunityOutcome>,
    connectivity_cache: Option<Connectivity>,
}

impl MetricsEngine {
    /// Build an engine over a snapshot with the given configuration.
    pub fn new(snapshot: GraphSnapshot, config: MetricsConfig) -> Self {
        Self {
            snapshot,
            config,
            centrality_cache: BTreeMap::new(),
            community_cache: None,
            connectivity_cache: None,
        }
    }

    /// Version of the snapshot this engine was built from.
    pub fn version(&self) -> u64 {
        self.snapshot.version()
    }

    /// Edge density: `edges / (n * (n - 1) / 2)`, 0 for graphs with fewer
    /// than two nodes.
    pub fn density(&self) -> f64 {
        let max_edges = self.snapshot.graph().max_edge_count();
        if max_edges == 0 {
            return 0.0;
        }
        self.snapshot.graph().edge_count() as f64 / max_edges as f64
    }

    /// Mean node degree; 0 for an empty graph.
    pub fn average_degree(&self) -> f64 {
        let graph = self.snapshot.graph();
        let n = graph.node_count();
        if n == 0 {
            return 0.0;
        }
        2.0 * graph.edge_count() as f64 / n as f64
    }

    /// Mean local clustering coefficient; 0 for an empty graph. Nodes with
    /// degree below two contribute 0.
    pub fn clustering_coefficient(&self) -> f64 {
        let graph = self.snapshot.graph();
        let n = graph.node_count();
        if n == 0 {
            return 0.0;
        }

        let mut total = 0.0;
        for node in graph.nodes() {
            let neighbors: Vec<NodeId> = graph.neighbors(node).collect();
            let k = neighbors.len();
            if k < 2 {
                continue;
            }
            let mut links = 0_usize;
            for (i, &a) in neighbors.iter().enumerate() {
                for &b in &neighbors[i + 1..] {
                    if let Some(key) = crate::types::EdgeKey::new(a, b) {
                        if graph.has_edge(&key) {
                            links += 1;
                        }
                    }
                }
            }
            total += 2.0 * links as f64 / (k * (k - 1)) as f64;
        }

        total / n as f64
    }

    /// Compute (or fetch the cached) outcome for one centrality measure.
    pub fn centrality(&mut self, measure: CentralityMeasure, force_recalculate: bool) -> &MeasureOutcome {
        if force_recalculate || !self.centrality_cache.contains_key(&measure) {
            let outcome = self.compute_measure(measure);
            if let MeasureOutcome::Unavailable(reason) = &outcome {
                tracing::warn!(
                    measure = %measure,
                    version = self.snapshot.version(),
                    reason = %reason,
                    "centrality measure unavailable"
                );
            }
            self.centrality_cache.insert(measure, outcome);
        }
        &self.centrality_cache[&measure]
    }

    /// All centrality outcomes, computing any that are not cached yet.
    pub fn centrality_metrics(
        &mut self,
        force_recalculate: bool,
    ) -> BTreeMap<CentralityMeasure, MeasureOutcome> {
        for measure in CentralityMeasure::ALL {
            self.centrality(measure, force_recalculate);
        }
        self.centrality_cache.clone()
    }

    fn compute_measure(&self, measure: CentralityMeasure) -> MeasureOutcome {
        let graph = self.snapshot.graph();
        let n = graph.node_count();

        match measure {
            CentralityMeasure::Degree => {
                MeasureOutcome::Computed(centrality::degree_centrality(graph))
            }
            CentralityMeasure::Betweenness => {
                if !self.config.compute_betweenness {
                    return MeasureOutcome::Unavailable(UnavailableReason::Disabled);
                }
                if n > self.config.betweenness_ceiling {
                    return MeasureOutcome::Unavailable(UnavailableReason::ExceedsCeiling {
                        nodes: n,
                        ceiling: self.config.betweenness_ceiling,
                    });
                }
                MeasureOutcome::Computed(centrality::betweenness_centrality(graph))
            }
            CentralityMeasure::Closeness => {
                if n > self.config.exact_ceiling {
                    return MeasureOutcome::Unavailable(UnavailableReason::ExceedsCeiling {
                        nodes: n,
                        ceiling: self.config.exact_ceiling,
                    });
                }
                if !connectivity::is_connected(graph) {
                    return MeasureOutcome::Unavailable(UnavailableReason::Disconnected);
                }
                MeasureOutcome::Computed(centrality::closeness_centrality(graph))
            }
            CentralityMeasure::Eigenvector => {
                if n > self.config.exact_ceiling {
                    return MeasureOutcome::Unavailable(UnavailableReason::ExceedsCeiling {
                        nodes: n,
                        ceiling: self.config.exact_ceiling,
                    });
                }
                match centrality::eigenvector_centrality(
                    graph,
                    self.config.eigenvector_max_iter,
                    self.config.eigenvector_tol,
                ) {
                    Ok(scores) => MeasureOutcome::Computed(scores),
                    Err(iterations) => {
                        MeasureOutcome::Unavailable(UnavailableReason::DidNotConverge { iterations })
                    }
                }
            }
        }
    }

    /// Top `k` nodes by a measure, descending by score, ties broken by
    /// ascending node id (first-seen order). Empty when the measure is
    /// unavailable for this graph.
    pub fn top_k(&mut self, measure: CentralityMeasure, k: usize) -> Vec<(NodeId, f64)> {
        let scores = match self.centrality(measure, false).scores() {
            Some(scores) => scores.clone(),
            None => return Vec::new(),
        };

        let mut ranked: Vec<(NodeId, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(k);
        ranked
    }

    /// Detect communities (cached per engine instance).
    ///
    /// Graphs with fewer than two nodes yield an unavailable outcome rather
    /// than a trivial partition.
    pub fn detect_communities(&mut self, force_recalculate: bool) -> &CommunityOutcome {
        if force_recalculate {
            self.community_cache = None;
        }
        let snapshot = &self.snapshot;
        self.community_cache.get_or_insert_with(|| {
            let graph = snapshot.graph();
            if graph.node_count() < 2 {
                tracing::warn!(
                    version = snapshot.version(),
                    "community detection unavailable: too few nodes"
                );
                CommunityOutcome::Unavailable(UnavailableReason::TooFewNodes)
            } else {
                CommunityOutcome::Detected(community::detect_communities(graph))
            }
        })
    }

    /// Modularity of the detected partition; `None` when communities were not
    /// computed.
    pub fn modularity(&mut self) -> Option<f64> {
        self.detect_communities(false)
            .assignment()
            .map(|a| a.modularity)
    }

    /// Connectivity summary (cached per engine instance). The diameter is
    /// only present for connected graphs within the exact-computation
    /// ceiling.
    pub fn connectivity(&mut self) -> Connectivity {
        let snapshot = &self.snapshot;
        let exact_ceiling = self.config.exact_ceiling;
        self.connectivity_cache
            .get_or_insert_with(|| {
                let graph = snapshot.graph();
                let component_count = connectivity::component_count(graph);
                let is_connected = graph.node_count() < 2 || component_count == 1;
                let diameter = if is_connected && graph.node_count() <= exact_ceiling {
                    connectivity::diameter(graph)
                } else {
                    None
                };
                Connectivity {
                    is_connected,
                    component_count,
                    diameter,
                }
            })
            .clone()
    }

    /// Assemble the full immutable metrics snapshot for this version.
    pub fn compute_snapshot(&mut self) -> MetricsSnapshot {
        let centrality = self.centrality_metrics(false);
        let communities = self.detect_communities(false).clone();
        let connectivity = self.connectivity();
        let modularity = communities.assignment().map(|a| a.modularity);

        MetricsSnapshot {
            version: self.snapshot.version(),
            fingerprint: self.snapshot.fingerprint(),
            node_count: self.snapshot.graph().node_count(),
            edge_count: self.snapshot.graph().edge_count(),
            density: self.density(),
            average_degree: self.average_degree(),
            clustering_coefficient: self.clustering_coefficient(),
            centrality,
            communities,
            connectivity,
            modularity,
            computed_at: Utc::now(),
        }
    }
}
