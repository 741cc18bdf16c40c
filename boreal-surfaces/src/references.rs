//! The surface reference graph.
//!
//! Parent-to-child references keep embedded surfaces alive while a parent
//! still draws them. Temporary references bridge the window between a
//! child creating a new surface and its parent learning the id and adding
//! a real reference.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::ids::{FrameSinkId, LocalSurfaceId, SurfaceId};

/// A directed edge in the reference graph: `parent_id` keeps `child_id`
/// alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceReference {
    pub parent_id: SurfaceId,
    pub child_id: SurfaceId,
}

impl SurfaceReference {
    pub const fn new(parent_id: SurfaceId, child_id: SurfaceId) -> Self {
        Self {
            parent_id,
            child_id,
        }
    }
}

/// Adjacency maps for surface references plus the staged temporary
/// references, grouped by the owning frame sink namespace.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReferenceGraph {
    parent_to_children: HashMap<SurfaceId, HashSet<SurfaceId>>,
    child_to_parents: HashMap<SurfaceId, HashSet<SurfaceId>>,
    temp_references: HashMap<FrameSinkId, Vec<LocalSurfaceId>>,
    temporary_reference_limit: usize,
}

impl ReferenceGraph {
    /// Creates an empty graph. A `temporary_reference_limit` of zero means
    /// unbounded staging per namespace.
    pub fn new(temporary_reference_limit: usize) -> Self {
        Self {
            temporary_reference_limit,
            ..Self::default()
        }
    }

    /// Adds the reference `parent_id` -> `child_id`.
    ///
    /// Idempotent. Any temporary reference staged for the child is
    /// promoted, i.e. removed, since a real reference now exists.
    pub fn add_reference(&mut self, parent_id: SurfaceId, child_id: SurfaceId) {
        self.parent_to_children
            .entry(parent_id)
            .or_default()
            .insert(child_id);
        self.child_to_parents
            .entry(child_id)
            .or_default()
            .insert(parent_id);
        self.remove_temporary_reference(&child_id);
    }

    /// Removes the reference `parent_id` -> `child_id`. Missing references
    /// are ignored.
    pub fn remove_reference(&mut self, parent_id: &SurfaceId, child_id: &SurfaceId) {
        if let Some(children) = self.parent_to_children.get_mut(parent_id) {
            children.remove(child_id);
            if children.is_empty() {
                self.parent_to_children.remove(parent_id);
            }
        }
        if let Some(parents) = self.child_to_parents.get_mut(child_id) {
            parents.remove(parent_id);
            if parents.is_empty() {
                self.child_to_parents.remove(child_id);
            }
        }
    }

    /// Removes every reference in which `surface_id` participates, as
    /// parent or as child.
    pub fn remove_all_references(&mut self, surface_id: &SurfaceId) {
        if let Some(children) = self.parent_to_children.remove(surface_id) {
            for child in children {
                if let Some(parents) = self.child_to_parents.get_mut(&child) {
                    parents.remove(surface_id);
                    if parents.is_empty() {
                        self.child_to_parents.remove(&child);
                    }
                }
            }
        }
        if let Some(parents) = self.child_to_parents.remove(surface_id) {
            for parent in parents {
                if let Some(children) = self.parent_to_children.get_mut(&parent) {
                    children.remove(surface_id);
                    if children.is_empty() {
                        self.parent_to_children.remove(&parent);
                    }
                }
            }
        }
        self.remove_temporary_reference(surface_id);
    }

    /// Stages a temporary reference keeping `surface_id` alive until its
    /// parent adds a real reference.
    ///
    /// Staged references are kept per namespace in FIFO order; when the
    /// configured limit is exceeded the oldest entry is evicted.
    pub fn add_temporary_reference(&mut self, surface_id: SurfaceId) {
        let queue = self
            .temp_references
            .entry(surface_id.frame_sink_id())
            .or_default();
        if queue.contains(&surface_id.local_surface_id()) {
            return;
        }
        queue.push(surface_id.local_surface_id());
        if self.temporary_reference_limit != 0 && queue.len() > self.temporary_reference_limit {
            let evicted = queue.remove(0);
            warn!(
                frame_sink_id = %surface_id.frame_sink_id(),
                local_surface_id = %evicted,
                limit = self.temporary_reference_limit,
                "temporary reference limit exceeded, evicting oldest"
            );
        }
        debug!(%surface_id, "temporary reference staged");
    }

    /// Drops a staged temporary reference, if present.
    pub fn remove_temporary_reference(&mut self, surface_id: &SurfaceId) {
        if let Some(queue) = self.temp_references.get_mut(&surface_id.frame_sink_id()) {
            queue.retain(|local| local != &surface_id.local_surface_id());
            if queue.is_empty() {
                self.temp_references.remove(&surface_id.frame_sink_id());
            }
        }
    }

    pub fn has_reference(&self, parent_id: &SurfaceId, child_id: &SurfaceId) -> bool {
        self.parent_to_children
            .get(parent_id)
            .is_some_and(|children| children.contains(child_id))
    }

    /// Returns `true` if any surface holds a real reference to `child_id`.
    pub fn has_parent(&self, child_id: &SurfaceId) -> bool {
        self.child_to_parents.contains_key(child_id)
    }

    pub fn has_temporary_reference(&self, surface_id: &SurfaceId) -> bool {
        self.temp_references
            .get(&surface_id.frame_sink_id())
            .is_some_and(|queue| queue.contains(&surface_id.local_surface_id()))
    }

    /// Every surface id currently held alive by a temporary reference.
    pub fn temporary_reference_ids(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.temp_references.iter().flat_map(|(frame_sink_id, queue)| {
            queue
                .iter()
                .map(move |local| SurfaceId::new(*frame_sink_id, *local))
        })
    }

    /// The children referenced by `parent_id`, if any.
    pub fn children_of(&self, parent_id: &SurfaceId) -> Option<&HashSet<SurfaceId>> {
        self.parent_to_children.get(parent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::FrameSinkId;
    use pretty_assertions::assert_eq;

    fn surface_id(client_id: u32, local_id: u32) -> SurfaceId {
        SurfaceId::new(
            FrameSinkId::new(client_id, 1),
            LocalSurfaceId::new(local_id),
        )
    }

    #[test]
    fn add_and_remove_reference() {
        let mut graph = ReferenceGraph::new(0);
        let parent = surface_id(1, 1);
        let child = surface_id(2, 1);

        graph.add_reference(parent, child);
        assert!(graph.has_reference(&parent, &child));

        graph.remove_reference(&parent, &child);
        assert!(!graph.has_reference(&parent, &child));
        assert_eq!(graph, ReferenceGraph::new(0), "empty entries must be pruned");
    }

    #[test]
    fn add_reference_is_idempotent() {
        let mut graph = ReferenceGraph::new(0);
        let parent = surface_id(1, 1);
        let child = surface_id(2, 1);
        graph.add_reference(parent, child);
        let snapshot = graph.clone();
        graph.add_reference(parent, child);
        assert_eq!(graph, snapshot);
    }

    #[test]
    fn removing_missing_reference_is_a_no_op() {
        let mut graph = ReferenceGraph::new(0);
        graph.remove_reference(&surface_id(1, 1), &surface_id(2, 1));
        assert_eq!(graph, ReferenceGraph::new(0));
    }

    #[test]
    fn real_reference_promotes_temporary() {
        let mut graph = ReferenceGraph::new(0);
        let parent = surface_id(1, 1);
        let child = surface_id(2, 1);

        graph.add_temporary_reference(child);
        assert!(graph.has_temporary_reference(&child));

        graph.add_reference(parent, child);
        assert!(!graph.has_temporary_reference(&child));
        assert!(graph.has_reference(&parent, &child));
    }

    #[test]
    fn remove_all_references_detaches_both_sides() {
        let mut graph = ReferenceGraph::new(0);
        let top = surface_id(1, 1);
        let middle = surface_id(2, 1);
        let bottom = surface_id(3, 1);

        graph.add_reference(top, middle);
        graph.add_reference(middle, bottom);
        graph.remove_all_references(&middle);

        assert!(!graph.has_reference(&top, &middle));
        assert!(!graph.has_reference(&middle, &bottom));
        assert_eq!(graph, ReferenceGraph::new(0));
    }

    #[test]
    fn temporary_references_evict_oldest_over_limit() {
        let mut graph = ReferenceGraph::new(2);
        let first = surface_id(1, 1);
        let second = surface_id(1, 2);
        let third = surface_id(1, 3);

        graph.add_temporary_reference(first);
        graph.add_temporary_reference(second);
        graph.add_temporary_reference(third);

        assert!(!graph.has_temporary_reference(&first));
        assert!(graph.has_temporary_reference(&second));
        assert!(graph.has_temporary_reference(&third));
    }

    #[test]
    fn temporary_reference_limit_is_per_namespace() {
        let mut graph = ReferenceGraph::new(1);
        let a = surface_id(1, 1);
        let b = surface_id(2, 1);

        graph.add_temporary_reference(a);
        graph.add_temporary_reference(b);

        assert!(graph.has_temporary_reference(&a));
        assert!(graph.has_temporary_reference(&b));
    }

    #[test]
    fn temporary_reference_ids_enumerates_all_namespaces() {
        let mut graph = ReferenceGraph::new(0);
        let a = surface_id(1, 1);
        let b = surface_id(2, 1);
        graph.add_temporary_reference(a);
        graph.add_temporary_reference(b);

        let ids: std::collections::HashSet<_> = graph.temporary_reference_ids().collect();
        assert_eq!(ids, [a, b].into_iter().collect());
    }
}
