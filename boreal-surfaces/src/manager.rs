//! The surface manager facade.
//!
//! Owns the surface registry, the reference graph, sequence tracking, and
//! the frame sink hierarchy, and runs garbage collection whenever a
//! mutation could have reduced reachability.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::rc::Rc;
use std::thread::{self, ThreadId};

use boreal_core::{LifetimePolicyKind, SurfacesConfig};
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::HierarchyError;
use crate::hierarchy::{FrameSinkHierarchy, SurfaceFactoryClient};
use crate::ids::{
    BeginFrameSourceId, FrameSinkId, LocalSurfaceId, SurfaceId, SurfaceInfo, SurfaceSequence,
};
use crate::liveness::{LivenessContext, LivenessPolicy, ReferenceLiveness, SequenceLiveness};
use crate::observer::SurfaceObserver;
use crate::references::{ReferenceGraph, SurfaceReference};
use crate::sequences::SequenceTracker;
use crate::surface::Surface;

/// Synthetic garbage collection root. Never registered as a real surface;
/// referencing a surface from it pins that surface alive.
pub const ROOT_SURFACE_ID: SurfaceId = SurfaceId::new(
    FrameSinkId::new(0, 0),
    LocalSurfaceId::from_parts(0, Uuid::nil()),
);

/// Tracks surface lifetimes for a single compositor instance.
///
/// Not thread safe. Every operation must run on the thread that
/// constructed the manager; this is checked in debug builds.
///
/// Surfaces are owned by their factory clients while alive. The manager
/// holds a shared handle between [`register_surface`](Self::register_surface)
/// and either [`deregister_surface`](Self::deregister_surface) or
/// [`destroy`](Self::destroy); after `destroy` the manager is the sole
/// owner and the surface is reaped once the configured liveness policy no
/// longer considers it live.
pub struct SurfaceManager {
    policy: Box<dyn LivenessPolicy>,
    surface_map: HashMap<SurfaceId, Rc<RefCell<Surface>>>,
    surfaces_to_destroy: Vec<Rc<RefCell<Surface>>>,
    references: ReferenceGraph,
    sequences: SequenceTracker,
    hierarchy: FrameSinkHierarchy,
    observers: Vec<Rc<RefCell<dyn SurfaceObserver>>>,
    owner_thread: ThreadId,
}

impl SurfaceManager {
    /// Creates a manager with the liveness policy and temporary reference
    /// limit named in `config`.
    pub fn new(config: &SurfacesConfig) -> Self {
        let policy: Box<dyn LivenessPolicy> = match config.lifetime_policy {
            LifetimePolicyKind::References => Box::new(ReferenceLiveness),
            LifetimePolicyKind::Sequences => Box::new(SequenceLiveness),
        };
        Self::with_policy(policy, config)
    }

    /// Creates a manager with an explicit policy, e.g. a custom one.
    pub fn with_policy(policy: Box<dyn LivenessPolicy>, config: &SurfacesConfig) -> Self {
        debug!(
            policy = ?policy.kind(),
            temporary_reference_limit = config.temporary_reference_limit,
            "surface manager created"
        );
        Self {
            policy,
            surface_map: HashMap::new(),
            surfaces_to_destroy: Vec::new(),
            references: ReferenceGraph::new(config.temporary_reference_limit),
            sequences: SequenceTracker::new(),
            hierarchy: FrameSinkHierarchy::new(),
            observers: Vec::new(),
            owner_thread: thread::current().id(),
        }
    }

    /// The synthetic root of the reference graph.
    pub fn get_root_surface_id(&self) -> SurfaceId {
        ROOT_SURFACE_ID
    }

    /// `true` when surface lifetimes are governed by the reference graph
    /// rather than by destruction sequences.
    pub fn using_surface_references(&self) -> bool {
        self.policy.kind() == LifetimePolicyKind::References
    }

    /// Marks `frame_sink_id` as a valid issuer of destruction sequences.
    /// Registering an id twice is a contract violation.
    pub fn register_frame_sink_id(&mut self, frame_sink_id: FrameSinkId) {
        self.check_thread();
        self.sequences.register_frame_sink_id(frame_sink_id);
    }

    /// Invalidates `frame_sink_id`. Outstanding sequences it issued no
    /// longer block destruction, and garbage collection runs.
    pub fn invalidate_frame_sink_id(&mut self, frame_sink_id: FrameSinkId) {
        self.check_thread();
        self.sequences.invalidate_frame_sink_id(frame_sink_id);
        self.garbage_collect_surfaces();
    }

    /// Registers a live surface. The client retains ownership; registering
    /// an id twice is a contract violation.
    pub fn register_surface(&mut self, surface: Rc<RefCell<Surface>>) {
        self.check_thread();
        let surface_id = surface.borrow().surface_id();
        let previous = self.surface_map.insert(surface_id, surface);
        debug_assert!(previous.is_none(), "surface {surface_id} registered twice");
        debug!(%surface_id, "surface registered");
    }

    /// Removes a live surface from the registry. Deregistering an absent
    /// id is a contract violation.
    pub fn deregister_surface(&mut self, surface_id: &SurfaceId) {
        self.check_thread();
        let removed = self.surface_map.remove(surface_id);
        debug_assert!(removed.is_some(), "surface {surface_id} not registered");
        debug!(%surface_id, "surface deregistered");
    }

    /// Hands ownership of `surface` to the manager for destruction. The
    /// surface is reaped by a later garbage collection pass once the
    /// liveness policy releases it; one pass runs immediately.
    pub fn destroy(&mut self, surface: Rc<RefCell<Surface>>) {
        self.check_thread();
        surface.borrow_mut().set_destroyed(true);
        debug!(surface_id = %surface.borrow().surface_id(), "surface queued for destruction");
        self.surfaces_to_destroy.push(surface);
        self.garbage_collect_surfaces();
    }

    pub fn get_surface(&self, surface_id: &SurfaceId) -> Option<Rc<RefCell<Surface>>> {
        self.check_thread();
        self.surface_map.get(surface_id).cloned()
    }

    /// Called when a client first submits content for a surface id.
    ///
    /// Under the references policy a surface with no reference of either
    /// kind gets a temporary reference, so it survives collection until
    /// its parent embeds it. Observers are then notified.
    pub fn surface_created(&mut self, surface_info: &SurfaceInfo) {
        self.check_thread();
        if self.using_surface_references()
            && !self.references.has_parent(&surface_info.id)
            && !self.references.has_temporary_reference(&surface_info.id)
        {
            self.references.add_temporary_reference(surface_info.id);
        }
        for observer in &self.observers {
            observer.borrow_mut().on_surface_created(surface_info);
        }
    }

    /// Reports new content on a surface. Returns `true` if any observer
    /// found the damage interesting.
    pub fn surface_modified(&mut self, surface_id: &SurfaceId) -> bool {
        self.check_thread();
        let mut changed = false;
        for observer in &self.observers {
            changed |= observer.borrow_mut().on_surface_damaged(surface_id);
        }
        changed
    }

    /// Attaches `sequence` as a destruction obligation on the surface.
    /// The surface must currently be registered.
    pub fn require_sequence(&mut self, surface_id: &SurfaceId, sequence: SurfaceSequence) {
        self.check_thread();
        let Some(surface) = self.surface_map.get(surface_id) else {
            error!(%surface_id, %sequence, "sequence required on unregistered surface");
            return;
        };
        surface.borrow_mut().add_destruction_dependency(sequence);
    }

    /// Records `sequence` as satisfied and runs garbage collection, which
    /// consumes the token if a surface required it. Satisfaction may
    /// arrive before the requirement.
    pub fn satisfy_sequence(&mut self, sequence: SurfaceSequence) {
        self.check_thread();
        self.sequences.satisfy(sequence);
        self.garbage_collect_surfaces();
    }

    /// Adds a single reference. A reference from a surface to itself is a
    /// contract violation.
    pub fn add_surface_reference(&mut self, parent_id: SurfaceId, child_id: SurfaceId) {
        self.add_surface_references(&[SurfaceReference::new(parent_id, child_id)]);
    }

    /// Adds a batch of references.
    pub fn add_surface_references(&mut self, references: &[SurfaceReference]) {
        self.check_thread();
        for reference in references {
            debug_assert_ne!(
                reference.parent_id, reference.child_id,
                "self reference on {}",
                reference.parent_id
            );
            self.references
                .add_reference(reference.parent_id, reference.child_id);
        }
    }

    /// Removes a single reference and runs garbage collection.
    pub fn remove_surface_reference(&mut self, parent_id: SurfaceId, child_id: SurfaceId) {
        self.remove_surface_references(&[SurfaceReference::new(parent_id, child_id)]);
    }

    /// Removes a batch of references, then runs one garbage collection
    /// pass. Absent references are ignored.
    pub fn remove_surface_references(&mut self, references: &[SurfaceReference]) {
        self.check_thread();
        for reference in references {
            self.references
                .remove_reference(&reference.parent_id, &reference.child_id);
        }
        self.garbage_collect_surfaces();
    }

    /// Reaps every pending-destroy surface the liveness policy no longer
    /// considers live. Only surfaces handed to [`destroy`](Self::destroy)
    /// are ever reaped.
    pub fn garbage_collect_surfaces(&mut self) {
        self.check_thread();
        if self.surfaces_to_destroy.is_empty() {
            return;
        }
        let live = {
            let mut ctx = LivenessContext {
                root_surface_id: ROOT_SURFACE_ID,
                references: &self.references,
                surface_map: &self.surface_map,
                sequences: &mut self.sequences,
            };
            self.policy.compute_live_surfaces(&mut ctx)
        };
        let mut kept = Vec::with_capacity(self.surfaces_to_destroy.len());
        for surface in std::mem::take(&mut self.surfaces_to_destroy) {
            let surface_id = surface.borrow().surface_id();
            if live.contains(&surface_id) {
                kept.push(surface);
                continue;
            }
            self.references.remove_all_references(&surface_id);
            self.surface_map.remove(&surface_id);
            debug!(%surface_id, "surface reaped");
            for observer in &self.observers {
                observer.borrow_mut().on_surface_destroyed(&surface_id);
            }
        }
        self.surfaces_to_destroy = kept;
    }

    pub fn add_observer(&mut self, observer: Rc<RefCell<dyn SurfaceObserver>>) {
        self.check_thread();
        self.observers.push(observer);
    }

    pub fn remove_observer(&mut self, observer: &Rc<RefCell<dyn SurfaceObserver>>) {
        self.check_thread();
        self.observers
            .retain(|registered| !Rc::ptr_eq(registered, observer));
    }

    /// See [`FrameSinkHierarchy::register_client`].
    pub fn register_surface_factory_client(
        &mut self,
        frame_sink_id: FrameSinkId,
        client: Rc<dyn SurfaceFactoryClient>,
    ) {
        self.check_thread();
        self.hierarchy.register_client(frame_sink_id, client);
    }

    /// See [`FrameSinkHierarchy::unregister_client`].
    pub fn unregister_surface_factory_client(&mut self, frame_sink_id: FrameSinkId) {
        self.check_thread();
        self.hierarchy.unregister_client(frame_sink_id);
    }

    /// See [`FrameSinkHierarchy::register_begin_frame_source`].
    pub fn register_begin_frame_source(
        &mut self,
        source: BeginFrameSourceId,
        frame_sink_id: FrameSinkId,
    ) {
        self.check_thread();
        self.hierarchy
            .register_begin_frame_source(source, frame_sink_id);
    }

    /// See [`FrameSinkHierarchy::unregister_begin_frame_source`].
    pub fn unregister_begin_frame_source(&mut self, source: BeginFrameSourceId) {
        self.check_thread();
        self.hierarchy.unregister_begin_frame_source(source);
    }

    /// See [`FrameSinkHierarchy::register_frame_sink_hierarchy`].
    pub fn register_frame_sink_hierarchy(
        &mut self,
        parent_frame_sink_id: FrameSinkId,
        child_frame_sink_id: FrameSinkId,
    ) -> Result<(), HierarchyError> {
        self.check_thread();
        self.hierarchy
            .register_frame_sink_hierarchy(parent_frame_sink_id, child_frame_sink_id)
    }

    /// See [`FrameSinkHierarchy::unregister_frame_sink_hierarchy`].
    pub fn unregister_frame_sink_hierarchy(
        &mut self,
        parent_frame_sink_id: FrameSinkId,
        child_frame_sink_id: FrameSinkId,
    ) {
        self.check_thread();
        self.hierarchy
            .unregister_frame_sink_hierarchy(parent_frame_sink_id, child_frame_sink_id);
    }

    /// See [`FrameSinkHierarchy::child_contains`].
    pub fn child_contains(
        &self,
        child_frame_sink_id: FrameSinkId,
        search_frame_sink_id: FrameSinkId,
    ) -> bool {
        self.check_thread();
        self.hierarchy
            .child_contains(child_frame_sink_id, search_frame_sink_id)
    }

    /// The source currently routed to `frame_sink_id`, if any.
    pub fn effective_begin_frame_source(
        &self,
        frame_sink_id: &FrameSinkId,
    ) -> Option<BeginFrameSourceId> {
        self.check_thread();
        self.hierarchy.effective_source(frame_sink_id)
    }

    /// Renders the reference tree reachable from the root as an indented
    /// string. Diagnostic output with no format guarantees.
    pub fn surface_references_to_string(&self) -> String {
        self.check_thread();
        let mut out = String::from("surface references:\n");
        let mut visited = HashSet::new();
        self.append_references(ROOT_SURFACE_ID, 1, &mut visited, &mut out);
        out
    }

    fn append_references(
        &self,
        surface_id: SurfaceId,
        depth: usize,
        visited: &mut HashSet<SurfaceId>,
        out: &mut String,
    ) {
        let _ = writeln!(out, "{:width$}{surface_id}", "", width = depth * 2);
        if !visited.insert(surface_id) {
            return;
        }
        if let Some(children) = self.references.children_of(&surface_id) {
            let mut ordered: Vec<_> = children.iter().copied().collect();
            ordered.sort();
            for child in ordered {
                self.append_references(child, depth + 1, visited, out);
            }
        }
    }

    fn check_thread(&self) {
        debug_assert_eq!(
            thread::current().id(),
            self.owner_thread,
            "SurfaceManager used off its owning thread"
        );
    }
}
