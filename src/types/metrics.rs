//! Metric result types.
//!
//! Expensive measures degrade gracefully instead of failing: a measure that
//! was skipped (size ceiling, disconnected graph, non-convergence) is
//! represented as a typed [`UnavailableReason`], never as an error and never
//! as zero-valued data. Consumers must treat an unavailable measure as "not
//! computed for this graph", not as a result of zeros.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Centrality measures the engine knows how to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CentralityMeasure {
    /// Degree centrality, normalized by `n - 1`. Always computed.
    Degree,
    /// Betweenness centrality (Brandes). Gated by a node-count ceiling.
    Betweenness,
    /// Closeness centrality. Requires a connected graph below the exact ceiling.
    Closeness,
    /// Eigenvector centrality via bounded power iteration.
    Eigenvector,
}

impl CentralityMeasure {
    /// All measures, in canonical order.
    pub const ALL: [CentralityMeasure; 4] = [
        Self::Degree,
        Self::Betweenness,
        Self::Closeness,
        Self::Eigenvector,
    ];

    /// Parse a measure name from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "degree" => Some(Self::Degree),
            "betweenness" => Some(Self::Betweenness),
            "closeness" => Some(Self::Closeness),
            "eigenvector" => Some(Self::Eigenvector),
            _ => None,
        }
    }
}

impl std::fmt::Display for CentralityMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Degree => write!(f, "degree"),
            Self::Betweenness => write!(f, "betweenness"),
            Self::Closeness => write!(f, "closeness"),
            Self::Eigenvector => write!(f, "eigenvector"),
        }
    }
}

/// Why a measure or decomposition was not computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnavailableReason {
    /// The measure was disabled by configuration.
    Disabled,
    /// The graph exceeds the node-count ceiling for this measure.
    ExceedsCeiling {
        /// Nodes in the graph.
        nodes: usize,
        /// Configured ceiling for the measure.
        ceiling: usize,
    },
    /// The measure requires a connected graph.
    Disconnected,
    /// Iterative computation did not converge within the iteration budget.
    DidNotConverge {
        /// Iterations performed before giving up.
        iterations: usize,
    },
    /// The graph has too few nodes for the measure to mean anything.
    TooFewNodes,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled by configuration"),
            Self::ExceedsCeiling { nodes, ceiling } => {
                write!(f, "graph has {} nodes, ceiling is {}", nodes, ceiling)
            }
            Self::Disconnected => write!(f, "graph is not connected"),
            Self::DidNotConverge { iterations } => {
                write!(f, "did not converge after {} iterations", iterations)
            }
            Self::TooFewNodes => write!(f, "too few nodes"),
        }
    }
}

/// Outcome of one centrality computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeasureOutcome {
    /// Per-node scores.
    Computed(BTreeMap<NodeId, f64>),
    /// Skipped or failed; the reason says why.
    Unavailable(UnavailableReason),
}

impl MeasureOutcome {
    /// Whether scores were computed.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    /// The per-node scores, if computed.
    pub fn scores(&self) -> Option<&BTreeMap<NodeId, f64>> {
        match self {
            Self::Computed(scores) => Some(scores),
            Self::Unavailable(_) => None,
        }
    }

    /// The unavailability reason, if not computed.
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        match self {
            Self::Computed(_) => None,
            Self::Unavailable(reason) => Some(*reason),
        }
    }
}

/// A discovered community partition.
///
/// Community ids are dense integers `0..community_count`, assigned in
/// first-seen node order. Ids carry no identity across recomputation: two runs
/// over the same graph group nodes identically but may label groups
/// differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityAssignment {
    /// Community id per node.
    pub assignment: BTreeMap<NodeId, u32>,
    /// Number of communities.
    pub community_count: u32,
    /// Modularity of this partition.
    pub modularity: f64,
}

/// Outcome of community detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommunityOutcome {
    /// A partition was found.
    Detected(CommunityAssignment),
    /// Detection was skipped; the reason says why.
    Unavailable(UnavailableReason),
}

impl CommunityOutcome {
    /// Whether a partition was found.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Detected(_))
    }

    /// The partition, if found.
    pub fn assignment(&self) -> Option<&CommunityAssignment> {
        match self {
            Self::Detected(a) => Some(a),
            Self::Unavailable(_) => None,
        }
    }
}

/// Connectivity summary of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connectivity {
    /// Whether every node is reachable from every other.
    pub is_connected: bool,
    /// Number of connected components.
    pub component_count: usize,
    /// Longest shortest path. Only present for connected graphs within the
    /// exact-computation ceiling.
    pub diameter: Option<u32>,
}

/// Full structural metrics for one graph version.
///
/// Tied 1:1 to the version (and fingerprint) it was computed from; never
/// mutated after creation. A new version gets a new snapshot, it does not
/// overwrite this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Graph version the metrics describe.
    pub version: u64,
    /// Fingerprint of the graph the metrics describe.
    pub fingerprint: u64,
    /// Nodes in the graph.
    pub node_count: usize,
    /// Edges in the graph.
    pub edge_count: usize,
    /// Edge density in `[0, 1]`.
    pub density: f64,
    /// Mean node degree.
    pub average_degree: f64,
    /// Mean local clustering coefficient.
    pub clustering_coefficient: f64,
    /// Per-measure centrality outcomes.
    pub centrality: BTreeMap<CentralityMeasure, MeasureOutcome>,
    /// Community detection outcome.
    pub communities: CommunityOutcome,
    /// Connectivity summary.
    pub connectivity: Connectivity,
    /// Modularity of the detected partition, absent when communities were not
    /// computed.
    pub modularity: Option<f64>,
    /// When the metrics were computed.
    pub computed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_from_str() {
        assert_eq!(
            CentralityMeasure::from_str("Degree"),
            Some(CentralityMeasure::Degree)
        );
        assert_eq!(
            CentralityMeasure::from_str("betweenness"),
            Some(CentralityMeasure::Betweenness)
        );
        assert_eq!(CentralityMeasure::from_str("pagerank"), None);
    }

    #[test]
    fn test_outcome_accessors() {
        let mut scores = BTreeMap::new();
        scores.insert(NodeId::new(0), 1.0);
        let computed = MeasureOutcome::Computed(scores);
        assert!(computed.is_available());
        assert_eq!(computed.scores().unwrap().len(), 1);
        assert!(computed.unavailable_reason().is_none());

        let skipped = MeasureOutcome::Unavailable(UnavailableReason::ExceedsCeiling {
            nodes: 1500,
            ceiling: 1000,
        });
        assert!(!skipped.is_available());
        assert!(skipped.scores().is_none());
    }

    #[test]
    fn test_outcome_serde_round_trip() {
        let outcome = MeasureOutcome::Unavailable(UnavailableReason::DidNotConverge {
            iterations: 100,
        });
        let json = serde_json::to_string(&outcome).unwrap();
        let back: MeasureOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, back);
    }
}
