//! Change records for incremental graph mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::edge::EdgeKey;

/// Kind of a single edge mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// An edge was created.
    Add,
    /// An existing edge was removed.
    Remove,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// One entry in the mutation history.
///
/// Created at the moment of mutation and never modified afterward. History is
/// append-only: records may be trimmed by retention policy but never reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Whether the edge was added or removed.
    pub kind: ChangeKind,
    /// The edge that changed.
    pub edge: EdgeKey,
    /// Moment the mutation was applied.
    pub timestamp: DateTime<Utc>,
}

impl ChangeRecord {
    /// Record an edge addition.
    pub fn added(edge: EdgeKey, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: ChangeKind::Add,
            edge,
            timestamp,
        }
    }

    /// Record an edge removal.
    pub fn removed(edge: EdgeKey, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: ChangeKind::Remove,
            edge,
            timestamp,
        }
    }

    /// Whether this record is an addition.
    pub fn is_add(&self) -> bool {
        self.kind == ChangeKind::Add
    }
}
