//! Observer interface for surface lifecycle events.

use crate::ids::{SurfaceId, SurfaceInfo};

/// Receives notifications about surface lifecycle transitions.
///
/// Observers are registered with the
/// [`SurfaceManager`](crate::manager::SurfaceManager) and invoked
/// synchronously on the manager's thread, in registration order.
pub trait SurfaceObserver {
    /// A surface finished creation and is available for embedding.
    fn on_surface_created(&mut self, surface_info: &SurfaceInfo);

    /// A surface received new content. Returns `true` if the observer
    /// consumed the damage, e.g. by scheduling a redraw.
    fn on_surface_damaged(&mut self, surface_id: &SurfaceId) -> bool;

    /// A surface was garbage collected and its id is no longer usable.
    fn on_surface_destroyed(&mut self, surface_id: &SurfaceId);
}
