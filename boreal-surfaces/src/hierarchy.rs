//! Frame sink hierarchy and begin-frame source routing.
//!
//! Frame sinks form a DAG describing which namespaces embed which others.
//! Begin-frame pacing sources are registered against a frame sink and
//! propagated down to every descendant client, except into subtrees that
//! registered a source of their own. A source registered closer to a
//! client always wins over one inherited from further up.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use crate::errors::HierarchyError;
use crate::ids::{BeginFrameSourceId, FrameSinkId};

/// The client side of a frame sink: receives the begin-frame source it
/// should pace itself against.
pub trait SurfaceFactoryClient {
    /// Called whenever the effective begin-frame source for this client
    /// changes. `None` means the client currently has no pacing source.
    fn set_begin_frame_source(&self, source: Option<BeginFrameSourceId>);
}

#[derive(Default)]
struct FrameSinkNode {
    client: Option<Rc<dyn SurfaceFactoryClient>>,
    /// The source currently routed to this node, after inheritance.
    source: Option<BeginFrameSourceId>,
    children: Vec<FrameSinkId>,
}

impl FrameSinkNode {
    fn is_empty(&self) -> bool {
        self.client.is_none() && self.children.is_empty()
    }
}

/// Tracks the embedding relationships between frame sinks and routes
/// begin-frame sources through them.
#[derive(Default)]
pub struct FrameSinkHierarchy {
    nodes: HashMap<FrameSinkId, FrameSinkNode>,
    /// Which frame sink registered each source.
    source_owners: HashMap<BeginFrameSourceId, FrameSinkId>,
    /// Inverse of `source_owners`: the source a frame sink registered, if
    /// any. A frame sink registers at most one source.
    registered_sources: HashMap<FrameSinkId, BeginFrameSourceId>,
}

impl FrameSinkHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the client listening on `frame_sink_id`.
    ///
    /// If a source already reaches this frame sink the client is told
    /// about it immediately, so clients and sources may be registered in
    /// either order.
    pub fn register_client(
        &mut self,
        frame_sink_id: FrameSinkId,
        client: Rc<dyn SurfaceFactoryClient>,
    ) {
        let node = self.nodes.entry(frame_sink_id).or_default();
        debug_assert!(
            node.client.is_none(),
            "client for {frame_sink_id} registered twice"
        );
        if let Some(source) = node.source {
            client.set_begin_frame_source(Some(source));
        }
        node.client = Some(client);
    }

    /// Unregisters the client for `frame_sink_id`. The client is told it
    /// no longer has a source before being dropped.
    pub fn unregister_client(&mut self, frame_sink_id: FrameSinkId) {
        let Some(node) = self.nodes.get_mut(&frame_sink_id) else {
            return;
        };
        if let Some(client) = node.client.take() {
            if node.source.is_some() {
                client.set_begin_frame_source(None);
            }
        }
        self.prune_if_empty(frame_sink_id);
    }

    /// Registers `source` as owned by `frame_sink_id` and routes it to the
    /// owner's subtree.
    pub fn register_begin_frame_source(
        &mut self,
        source: BeginFrameSourceId,
        frame_sink_id: FrameSinkId,
    ) {
        debug_assert!(
            !self.source_owners.contains_key(&source),
            "{source} registered twice"
        );
        self.source_owners.insert(source, frame_sink_id);
        self.registered_sources.insert(frame_sink_id, source);
        // The owner may have no node yet; sources, clients, and hierarchy
        // edges can arrive in any order.
        self.nodes.entry(frame_sink_id).or_default();
        debug!(%source, %frame_sink_id, "begin frame source registered");
        self.attach_source(source, frame_sink_id);
    }

    /// Unregisters `source`, detaches it from every client it reached,
    /// and restores any source those clients can still inherit.
    pub fn unregister_begin_frame_source(&mut self, source: BeginFrameSourceId) {
        let Some(owner) = self.source_owners.remove(&source) else {
            return;
        };
        self.registered_sources.remove(&owner);
        self.detach_source(source, owner);
        self.prune_if_empty(owner);
        self.reattach_all_sources();
    }

    /// Records that `parent_frame_sink_id` embeds `child_frame_sink_id`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::CycleDetected`] and leaves the hierarchy
    /// unchanged if the edge would make a frame sink its own ancestor.
    pub fn register_frame_sink_hierarchy(
        &mut self,
        parent_frame_sink_id: FrameSinkId,
        child_frame_sink_id: FrameSinkId,
    ) -> Result<(), HierarchyError> {
        if parent_frame_sink_id == child_frame_sink_id
            || self.child_contains(child_frame_sink_id, parent_frame_sink_id)
        {
            return Err(HierarchyError::CycleDetected {
                parent: parent_frame_sink_id,
                child: child_frame_sink_id,
            });
        }
        let parent = self.nodes.entry(parent_frame_sink_id).or_default();
        debug_assert!(
            !parent.children.contains(&child_frame_sink_id),
            "{parent_frame_sink_id} -> {child_frame_sink_id} registered twice"
        );
        parent.children.push(child_frame_sink_id);
        let parent_source = parent.source;
        self.nodes.entry(child_frame_sink_id).or_default();
        if let Some(source) = parent_source {
            self.attach_source(source, child_frame_sink_id);
        }
        Ok(())
    }

    /// Removes the embedding edge between the two frame sinks, if present.
    pub fn unregister_frame_sink_hierarchy(
        &mut self,
        parent_frame_sink_id: FrameSinkId,
        child_frame_sink_id: FrameSinkId,
    ) {
        let Some(parent) = self.nodes.get_mut(&parent_frame_sink_id) else {
            return;
        };
        let Some(index) = parent
            .children
            .iter()
            .position(|id| id == &child_frame_sink_id)
        else {
            return;
        };
        parent.children.remove(index);
        let parent_source = parent.source;
        if let Some(source) = parent_source {
            self.detach_source(source, child_frame_sink_id);
        }
        self.prune_if_empty(parent_frame_sink_id);
        self.prune_if_empty(child_frame_sink_id);
        self.reattach_all_sources();
    }

    /// Returns `true` if `search_frame_sink_id` is `child_frame_sink_id`
    /// or one of its descendants.
    pub fn child_contains(
        &self,
        child_frame_sink_id: FrameSinkId,
        search_frame_sink_id: FrameSinkId,
    ) -> bool {
        let mut worklist = vec![child_frame_sink_id];
        let mut visited = HashSet::new();
        while let Some(current) = worklist.pop() {
            if current == search_frame_sink_id {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                worklist.extend(node.children.iter().copied());
            }
        }
        false
    }

    /// The source currently routed to `frame_sink_id`, if any.
    pub fn effective_source(&self, frame_sink_id: &FrameSinkId) -> Option<BeginFrameSourceId> {
        self.nodes.get(frame_sink_id).and_then(|node| node.source)
    }

    /// Routes `source` to `start` and its descendants, skipping subtrees
    /// that registered a different source of their own.
    fn attach_source(&mut self, source: BeginFrameSourceId, start: FrameSinkId) {
        let mut worklist = vec![start];
        let mut visited = HashSet::new();
        while let Some(current) = worklist.pop() {
            if !visited.insert(current) {
                continue;
            }
            if self
                .registered_sources
                .get(&current)
                .is_some_and(|own| own != &source)
            {
                continue;
            }
            let Some(node) = self.nodes.get_mut(&current) else {
                continue;
            };
            if node.source != Some(source) {
                node.source = Some(source);
                if let Some(client) = &node.client {
                    client.set_begin_frame_source(Some(source));
                }
            }
            worklist.extend(node.children.iter().copied());
        }
    }

    /// Clears `source` from `start` downwards. Subtrees whose effective
    /// source differs never received it and are left alone.
    fn detach_source(&mut self, source: BeginFrameSourceId, start: FrameSinkId) {
        let mut worklist = vec![start];
        let mut visited = HashSet::new();
        while let Some(current) = worklist.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(node) = self.nodes.get_mut(&current) else {
                continue;
            };
            if node.source != Some(source) {
                continue;
            }
            node.source = None;
            if let Some(client) = &node.client {
                client.set_begin_frame_source(None);
            }
            worklist.extend(node.children.iter().copied());
        }
    }

    /// Re-routes every registered source. Used after a structural change
    /// so clients that lost an inherited source pick up the next one that
    /// still reaches them.
    fn reattach_all_sources(&mut self) {
        let sources: Vec<_> = self
            .source_owners
            .iter()
            .map(|(source, owner)| (*source, *owner))
            .collect();
        for (source, owner) in sources {
            self.attach_source(source, owner);
        }
    }

    fn prune_if_empty(&mut self, frame_sink_id: FrameSinkId) {
        if self.registered_sources.contains_key(&frame_sink_id) {
            return;
        }
        if self
            .nodes
            .get(&frame_sink_id)
            .is_some_and(FrameSinkNode::is_empty)
        {
            self.nodes.remove(&frame_sink_id);
        }
    }
}
