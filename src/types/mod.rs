//! Core types for the network metrics engine.

pub mod change;
pub mod edge;
pub mod metrics;
pub mod node;

pub use change::{ChangeKind, ChangeRecord};
pub use edge::EdgeKey;
pub use metrics::{
    CentralityMeasure, CommunityAssignment, CommunityOutcome, Connectivity, MeasureOutcome,
    MetricsSnapshot, UnavailableReason,
};
pub use node::NodeId;
