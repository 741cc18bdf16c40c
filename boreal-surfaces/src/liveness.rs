//! Liveness policies deciding which surfaces garbage collection must keep.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use boreal_core::LifetimePolicyKind;

use crate::ids::SurfaceId;
use crate::references::ReferenceGraph;
use crate::sequences::SequenceTracker;
use crate::surface::Surface;

/// A borrowed view of the manager state a policy needs to compute the
/// live set. Reconciling sequence policies mutate the tracker while
/// computing.
pub struct LivenessContext<'a> {
    pub root_surface_id: SurfaceId,
    pub references: &'a ReferenceGraph,
    pub surface_map: &'a HashMap<SurfaceId, Rc<RefCell<Surface>>>,
    pub sequences: &'a mut SequenceTracker,
}

/// Strategy deciding surface liveness during garbage collection.
///
/// A surface pending destruction whose id is absent from the computed
/// live set is reaped.
pub trait LivenessPolicy {
    fn kind(&self) -> LifetimePolicyKind;

    fn compute_live_surfaces(&self, ctx: &mut LivenessContext<'_>) -> HashSet<SurfaceId>;
}

/// Keeps every surface reachable in the reference graph from the root,
/// from a surface that is not pending destruction, or from a temporary
/// reference.
#[derive(Debug, Default)]
pub struct ReferenceLiveness;

impl LivenessPolicy for ReferenceLiveness {
    fn kind(&self) -> LifetimePolicyKind {
        LifetimePolicyKind::References
    }

    fn compute_live_surfaces(&self, ctx: &mut LivenessContext<'_>) -> HashSet<SurfaceId> {
        let mut seeds = vec![ctx.root_surface_id];
        for (surface_id, surface) in ctx.surface_map {
            if !surface.borrow().destroyed() {
                seeds.push(*surface_id);
            }
        }
        seeds.extend(ctx.references.temporary_reference_ids());
        flood(seeds, ctx.references)
    }
}

/// Keeps every surface that still carries unsatisfied destruction
/// dependencies, plus everything such surfaces reference.
///
/// Dependencies are reconciled against the tracker first, consuming
/// satisfaction tokens and discarding sequences from invalidated frame
/// sinks.
#[derive(Debug, Default)]
pub struct SequenceLiveness;

impl LivenessPolicy for SequenceLiveness {
    fn kind(&self) -> LifetimePolicyKind {
        LifetimePolicyKind::Sequences
    }

    fn compute_live_surfaces(&self, ctx: &mut LivenessContext<'_>) -> HashSet<SurfaceId> {
        let mut seeds = Vec::new();
        for (surface_id, surface) in ctx.surface_map {
            let mut surface = surface.borrow_mut();
            surface.satisfy_destruction_dependencies(ctx.sequences);
            if !surface.destroyed() || surface.destruction_dependency_count() > 0 {
                seeds.push(*surface_id);
            }
        }
        flood(seeds, ctx.references)
    }
}

/// Breadth-first closure of `seeds` over parent-to-child references.
/// Safe on graphs containing cycles.
fn flood(seeds: Vec<SurfaceId>, references: &ReferenceGraph) -> HashSet<SurfaceId> {
    let mut live: HashSet<SurfaceId> = HashSet::new();
    let mut queue: VecDeque<SurfaceId> = seeds.into();
    while let Some(current) = queue.pop_front() {
        if !live.insert(current) {
            continue;
        }
        if let Some(children) = references.children_of(&current) {
            queue.extend(children.iter().copied());
        }
    }
    live
}
