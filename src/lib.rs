//! # netmetrics-core
//!
//! The stateful core of a live network-analysis dashboard: a versioned
//! in-memory graph with incremental mutation, change history, and cached
//! structural metrics.
//!
//! ## Core Contract
//!
//! 1. Generate a seeded synthetic graph and hand ownership to a [`GraphStore`]
//! 2. Mutate it incrementally; every mutating batch bumps an integer version
//!    and is recorded as ordered [`ChangeRecord`]s
//! 3. Read detached snapshots and compute metrics against them, cached by
//!    version — never against the live graph
//!
//! ## Architecture
//!
//! ```text
//! Generator → GraphStore ←─ update() / reset()
//!                 │
//!             snapshot()  (detached copy + version)
//!                 ↓
//!          MetricsEngine ──→ MetricsSnapshot
//!                 ↑
//!           MetricsCache  (LRU keyed by version)
//! ```
//!
//! ## Consistency Guarantees
//!
//! - A snapshot taken before an update is never affected by that update
//! - The version bumps if and only if a batch actually changed an edge
//! - A [`MetricsSnapshot`] describes exactly one (version, fingerprint) pair
//! - Expensive measures degrade to typed unavailable results, never to errors
//!   and never to zero-valued data
//!
//! The presentation layer is an external consumer: it drives [`GraphStore`]
//! from a timer or user action and renders whatever the metrics types report.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod generator;
pub mod graph;
pub mod metrics;
pub mod mutation;
pub mod store;
pub mod types;

// Re-exports
pub use cache::{CacheStats, MetricsCache, DEFAULT_CACHE_CAPACITY};
pub use generator::{generate, GraphKind};
pub use graph::Graph;
pub use metrics::{MetricsConfig, MetricsEngine};
pub use mutation::{apply_update, GraphError, MutationParams};
pub use store::{GraphSnapshot, GraphStore, StoreStats, DEFAULT_HISTORY_RETENTION};
pub use types::{
    CentralityMeasure, ChangeKind, ChangeRecord, CommunityAssignment, CommunityOutcome,
    Connectivity, EdgeKey, MeasureOutcome, MetricsSnapshot, NodeId, UnavailableReason,
};

/// Schema version for serialized metric and change-record types.
/// Increment on breaking changes to any public data type.
pub const NETMETRICS_SCHEMA_VERSION: &str = "1.0.0";
