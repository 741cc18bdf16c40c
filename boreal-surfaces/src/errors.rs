//! Error types for the surface management domain.

use thiserror::Error;

use crate::ids::FrameSinkId;

/// Errors raised by frame-sink hierarchy mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// Registering the edge would make `child` an ancestor of `parent`.
    #[error("registering {parent} -> {child} would create a cycle in the frame sink hierarchy")]
    CycleDetected {
        parent: FrameSinkId,
        child: FrameSinkId,
    },
}
