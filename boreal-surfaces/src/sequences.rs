//! Tracks satisfied destruction sequences and the set of frame sink
//! namespaces that are allowed to issue them.

use std::collections::HashSet;

use tracing::debug;

use crate::ids::{FrameSinkId, SurfaceSequence};

/// Book-keeping shared by every surface that carries destruction
/// dependencies.
///
/// Satisfaction tokens are single-use: the first surface that reconciles
/// its dependencies against a satisfied sequence consumes it. Sequences
/// issued by a frame sink that has since been invalidated are treated as
/// satisfied without a token.
#[derive(Debug, Default)]
pub struct SequenceTracker {
    satisfied: HashSet<SurfaceSequence>,
    valid_frame_sink_ids: HashSet<FrameSinkId>,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a frame sink id as a valid issuer of sequences.
    ///
    /// Ids must not be registered twice without an intervening
    /// invalidation.
    pub fn register_frame_sink_id(&mut self, frame_sink_id: FrameSinkId) {
        let inserted = self.valid_frame_sink_ids.insert(frame_sink_id);
        debug_assert!(inserted, "{frame_sink_id} registered twice");
    }

    /// Invalidates a frame sink id. Sequences it issued no longer block
    /// destruction.
    pub fn invalidate_frame_sink_id(&mut self, frame_sink_id: FrameSinkId) {
        if self.valid_frame_sink_ids.remove(&frame_sink_id) {
            debug!(%frame_sink_id, "frame sink id invalidated");
        }
    }

    pub fn is_valid(&self, frame_sink_id: &FrameSinkId) -> bool {
        self.valid_frame_sink_ids.contains(frame_sink_id)
    }

    /// Records that `sequence` has been satisfied by its issuer.
    pub fn satisfy(&mut self, sequence: SurfaceSequence) {
        self.satisfied.insert(sequence);
    }

    /// Consumes the satisfaction token for `sequence` if one is present.
    pub fn take_satisfied(&mut self, sequence: &SurfaceSequence) -> bool {
        self.satisfied.remove(sequence)
    }
}
