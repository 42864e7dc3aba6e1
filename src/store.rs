//! The versioned graph store.
//!
//! Owns the single live graph of a session, its monotonically increasing
//! version counter, and the capped change history. This is the one source of
//! truth: all mutation goes through [`GraphStore::update`] or
//! [`GraphStore::reset`], and readers get detached snapshots that later
//! mutations can never touch.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::generator::{generate, GraphKind};
use crate::graph::Graph;
use crate::mutation::{apply_update, GraphError, MutationParams};
use crate::types::ChangeRecord;

/// Default number of change records retained by the store.
pub const DEFAULT_HISTORY_RETENTION: usize = 100;

/// A detached view of the graph at one version.
///
/// The contained graph is a full independent copy: updating the store after
/// taking a snapshot never changes what the snapshot shows. Metrics are always
/// computed against a snapshot, never against the live graph.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    graph: Graph,
    version: u64,
    fingerprint: u64,
    taken_at: DateTime<Utc>,
}

impl GraphSnapshot {
    /// Wrap an owned graph as a snapshot at an explicit version.
    ///
    /// Normally snapshots come from [`GraphStore::snapshot`]; this is for
    /// running the metrics engine over an ad-hoc graph.
    pub fn detached(graph: Graph, version: u64) -> Self {
        let fingerprint = graph.fingerprint();
        Self {
            graph,
            version,
            fingerprint,
            taken_at: Utc::now(),
        }
    }

    /// The detached graph copy.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Version of the store when the snapshot was taken.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Structural fingerprint of the snapshot graph.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// When the snapshot was taken.
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }
}

/// Store counters exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Total `update()` calls, including ones that changed nothing.
    pub update_calls: u64,
    /// Current version (number of mutating update batches since initialize).
    pub version: u64,
    /// Nodes in the live graph.
    pub node_count: usize,
    /// Edges in the live graph.
    pub edge_count: usize,
}

/// Owner of the live graph, version counter, and change history.
///
/// Lifecycle: `Uninitialized -> Initialized`, transitioned exactly once by
/// [`GraphStore::initialize`] (idempotent); [`GraphStore::reset`] is the only
/// way back, and it immediately re-initializes.
///
/// Not a process-wide singleton: the calling session owns the store and passes
/// it by reference into each operation.
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: Graph,
    version: u64,
    history: VecDeque<ChangeRecord>,
    update_calls: u64,
    initialized: bool,
    rng: StdRng,
    retention: usize,
}

impl GraphStore {
    /// Create an empty, uninitialized store with default history retention.
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_HISTORY_RETENTION)
    }

    /// Create an uninitialized store retaining at most `retention` records.
    pub fn with_retention(retention: usize) -> Self {
        Self {
            graph: Graph::default(),
            version: 0,
            history: VecDeque::new(),
            update_calls: 0,
            initialized: false,
            rng: StdRng::seed_from_u64(0),
            retention,
        }
    }

    /// Whether the store has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current version. Starts at 0, bumped by 1 per mutating update batch.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Generate the initial graph. Idempotent: a second call is a no-op and
    /// leaves the existing graph, version, and history untouched.
    pub fn initialize(&mut self, kind: GraphKind, node_count: usize, seed: u64) {
        if self.initialized {
            tracing::debug!(version = self.version, "initialize skipped, already initialized");
            return;
        }

        self.graph = generate(kind, node_count, seed);
        // Separate stream for updates so re-generation and mutation stay
        // independently reproducible from the one seed.
        self.rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        self.initialized = true;

        tracing::info!(
            kind = %kind,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            seed,
            "store initialized"
        );
    }

    /// Apply one mutation batch to the live graph.
    ///
    /// Appends the produced records to history and bumps the version by 1 if
    /// and only if at least one record was produced; a batch that changes
    /// nothing leaves the version alone, which is what keeps version-keyed
    /// metric caches honest.
    ///
    /// Negative counts abort with [`GraphError::InvalidArgument`] and leave
    /// the store untouched.
    pub fn update(
        &mut self,
        add_edges: i64,
        remove_edges: i64,
    ) -> Result<Vec<ChangeRecord>, GraphError> {
        let params = MutationParams::new(add_edges, remove_edges)?;

        let records = apply_update(&mut self.graph, &params, &mut self.rng);
        self.update_calls += 1;

        if !records.is_empty() {
            self.version += 1;
            for record in &records {
                self.history.push_back(record.clone());
            }
            // FIFO retention: oldest entries go first
            while self.history.len() > self.retention {
                self.history.pop_front();
            }
        }

        tracing::debug!(
            added = records.iter().filter(|r| r.is_add()).count(),
            removed = records.iter().filter(|r| !r.is_add()).count(),
            version = self.version,
            "update applied"
        );

        Ok(records)
    }

    /// Take a detached snapshot of the live graph at the current version.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            graph: self.graph.clone(),
            version: self.version,
            fingerprint: self.graph.fingerprint(),
            taken_at: Utc::now(),
        }
    }

    /// Store counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            update_calls: self.update_calls,
            version: self.version,
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
        }
    }

    /// Retained change records, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.history.iter()
    }

    /// Number of retained change records.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Discard everything and regenerate: version back to 0, history cleared,
    /// a fresh graph installed. The store is initialized when this returns.
    pub fn reset(&mut self, kind: GraphKind, node_count: usize, seed: u64) {
        tracing::info!(old_version = self.version, "store reset");
        self.graph = Graph::default();
        self.version = 0;
        self.history.clear();
        self.update_calls = 0;
        self.initialized = false;
        self.initialize(kind, node_count, seed);
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.initialize(GraphKind::Random, 20, 42);
        store
    }

    #[test]
    fn test_initialize_idempotent() {
        let mut store = GraphStore::new();
        assert!(!store.is_initialized());

        store.initialize(GraphKind::Random, 20, 42);
        assert!(store.is_initialized());
        let fingerprint = store.snapshot().fingerprint();

        // Different parameters on the second call must be ignored
        store.initialize(GraphKind::SmallWorld, 99, 7);
        assert_eq!(store.snapshot().fingerprint(), fingerprint);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_update_bumps_version_iff_changed() {
        let mut store = initialized_store();

        let records = store.update(2, 0).unwrap();
        if records.is_empty() {
            assert_eq!(store.version(), 0);
        } else {
            assert_eq!(store.version(), 1);
        }

        let before = store.version();
        let noop = store.update(0, 0).unwrap();
        assert!(noop.is_empty());
        assert_eq!(store.version(), before);
    }

    #[test]
    fn test_update_counts_all_calls() {
        let mut store = initialized_store();
        store.update(1, 0).unwrap();
        store.update(0, 0).unwrap();
        assert_eq!(store.stats().update_calls, 2);
    }

    #[test]
    fn test_invalid_argument_leaves_store_untouched() {
        let mut store = initialized_store();
        let stats = store.stats();

        let err = store.update(-1, 0).unwrap_err();
        assert!(matches!(err, GraphError::InvalidArgument(_)));
        assert_eq!(store.stats(), stats);
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = initialized_store();
        let snapshot = store.snapshot();
        let edges_before = snapshot.graph().edge_count();

        // Mutate heavily after the snapshot
        for _ in 0..10 {
            store.update(3, 1).unwrap();
        }

        assert_eq!(snapshot.graph().edge_count(), edges_before);
        assert_eq!(snapshot.version(), 0);
    }

    #[test]
    fn test_history_retention_fifo() {
        let mut store = GraphStore::with_retention(5);
        store.initialize(GraphKind::Random, 30, 42);

        for _ in 0..20 {
            store.update(1, 0).unwrap();
        }

        assert!(store.history_len() <= 5);
        // Versions keep counting regardless of trimming
        assert!(store.version() > 5);

        // Retained records are the most recent ones, oldest first
        let timestamps: Vec<_> = store.history().map(|r| r.timestamp).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn test_reset_restores_version_zero() {
        let mut store = initialized_store();
        for _ in 0..5 {
            store.update(2, 0).unwrap();
        }
        assert!(store.version() > 0);

        store.reset(GraphKind::Random, 20, 42);
        assert!(store.is_initialized());
        assert_eq!(store.version(), 0);
        assert_eq!(store.history_len(), 0);
        assert_eq!(store.stats().update_calls, 0);
        assert_eq!(store.stats().node_count, 20);
    }

    #[test]
    fn test_reset_reproduces_seeded_graph() {
        let mut store = initialized_store();
        let original = store.snapshot().fingerprint();

        store.update(5, 0).unwrap();
        store.reset(GraphKind::Random, 20, 42);

        assert_eq!(store.snapshot().fingerprint(), original);
    }
}
