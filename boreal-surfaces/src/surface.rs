//! The surface entity tracked by the manager.

use crate::ids::{SurfaceId, SurfaceSequence};
use crate::sequences::SequenceTracker;

/// A registered unit of compositor output.
///
/// A `Surface` is created and owned by its factory client; the manager
/// holds a shared handle while the surface is registered and takes the
/// owning role once the client hands it to
/// [`SurfaceManager::destroy`](crate::manager::SurfaceManager::destroy).
/// Destruction dependencies accumulate here and are reconciled against the
/// globally satisfied sequence set during garbage collection.
#[derive(Debug)]
pub struct Surface {
    surface_id: SurfaceId,
    destruction_dependencies: Vec<SurfaceSequence>,
    destroyed: bool,
}

impl Surface {
    pub fn new(surface_id: SurfaceId) -> Self {
        Self {
            surface_id,
            destruction_dependencies: Vec::new(),
            destroyed: false,
        }
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    /// Attaches a sequence that must be satisfied before this surface can
    /// be physically destroyed.
    pub fn add_destruction_dependency(&mut self, sequence: SurfaceSequence) {
        self.destruction_dependencies.push(sequence);
    }

    /// Drops every dependency that is satisfied (consuming the token from
    /// the tracker) or whose frame sink is no longer valid.
    pub fn satisfy_destruction_dependencies(&mut self, tracker: &mut SequenceTracker) {
        self.destruction_dependencies.retain(|sequence| {
            if tracker.take_satisfied(sequence) {
                return false;
            }
            tracker.is_valid(&sequence.frame_sink_id)
        });
    }

    pub fn destruction_dependency_count(&self) -> usize {
        self.destruction_dependencies.len()
    }

    /// Marks the surface as handed over to the manager for destruction.
    pub fn set_destroyed(&mut self, destroyed: bool) {
        self.destroyed = destroyed;
    }

    pub fn destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::FrameSinkId;
    use crate::ids::LocalSurfaceId;

    fn test_surface() -> Surface {
        Surface::new(SurfaceId::new(FrameSinkId::new(1, 1), LocalSurfaceId::new(1)))
    }

    #[test]
    fn new_surface_has_no_dependencies() {
        let surface = test_surface();
        assert_eq!(surface.destruction_dependency_count(), 0);
        assert!(!surface.destroyed());
    }

    #[test]
    fn satisfied_sequence_is_consumed() {
        let frame_sink_id = FrameSinkId::new(2, 1);
        let sequence = SurfaceSequence::new(frame_sink_id, 4);
        let mut tracker = SequenceTracker::new();
        tracker.register_frame_sink_id(frame_sink_id);

        let mut surface = test_surface();
        surface.add_destruction_dependency(sequence);
        tracker.satisfy(sequence);

        surface.satisfy_destruction_dependencies(&mut tracker);
        assert_eq!(surface.destruction_dependency_count(), 0);
        assert!(
            !tracker.take_satisfied(&sequence),
            "token must be consumed by the reconciling surface"
        );
    }

    #[test]
    fn unsatisfied_sequence_is_kept() {
        let frame_sink_id = FrameSinkId::new(2, 1);
        let mut tracker = SequenceTracker::new();
        tracker.register_frame_sink_id(frame_sink_id);

        let mut surface = test_surface();
        surface.add_destruction_dependency(SurfaceSequence::new(frame_sink_id, 4));
        surface.satisfy_destruction_dependencies(&mut tracker);
        assert_eq!(surface.destruction_dependency_count(), 1);
    }

    #[test]
    fn invalid_frame_sink_drops_dependency() {
        let frame_sink_id = FrameSinkId::new(2, 1);
        let mut tracker = SequenceTracker::new();
        tracker.register_frame_sink_id(frame_sink_id);

        let mut surface = test_surface();
        surface.add_destruction_dependency(SurfaceSequence::new(frame_sink_id, 1));
        tracker.invalidate_frame_sink_id(frame_sink_id);

        surface.satisfy_destruction_dependencies(&mut tracker);
        assert_eq!(
            surface.destruction_dependency_count(),
            0,
            "sequences from an invalidated frame sink count as satisfied"
        );
    }
}
