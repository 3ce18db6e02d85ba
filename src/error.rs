//! Snapshot engine error types.

use thiserror::Error;

use crate::dom::NodeId;

/// Errors returned by the snapshot and extraction entry points.
///
/// Only configuration problems surface here. Per-node faults inside a pass
/// never abort rendering; they degrade in place and are reported through
/// `SnapshotMetadata::warnings`.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The requested root node is not part of the page.
    #[error("Invalid root: {0}")]
    InvalidRoot(String),

    /// Options are out of range or conflict with each other.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Per-node access faults raised by the page arena.
///
/// `OutOfRange` means the capture itself is corrupt (a child list points
/// outside the arena); traversal stops there and the pass returns partial
/// output. `Detached` and `MissingGeometry` are ordinary conditions that
/// callers degrade at the call site, usually to "no geometry".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NodeAccessError {
    /// Node id outside the page arena.
    #[error("Node {0} is not part of this page")]
    OutOfRange(NodeId),

    /// Node is no longer connected to the document.
    #[error("Node {0} is detached")]
    Detached(NodeId),

    /// The capture carries no geometry for this node.
    #[error("No geometry for node {0}")]
    MissingGeometry(NodeId),
}

impl NodeAccessError {
    /// Node the fault refers to.
    pub fn node(&self) -> NodeId {
        match self {
            Self::OutOfRange(id) | Self::Detached(id) | Self::MissingGeometry(id) => *id,
        }
    }

    /// True for faults that indicate a corrupt capture rather than a
    /// recoverable per-node condition.
    pub fn is_corrupt_capture(&self) -> bool {
        matches!(self, Self::OutOfRange(_))
    }
}
