//! # Boreal Surface Management (`boreal-surfaces`)
//!
//! Tracks which rendered surfaces are alive, which surfaces reference
//! which other surfaces, and when a surface may safely be destroyed.
//!
//! The central type is [`SurfaceManager`]. Factory clients register a
//! [`FrameSinkId`] namespace, create [`Surface`]s keyed by [`SurfaceId`],
//! and keep them alive either through explicit parent-to-child
//! [`SurfaceReference`]s or through [`SurfaceSequence`] tokens that must
//! be satisfied before destruction. The strategy is selected at manager
//! construction via [`LifetimePolicyKind`](boreal_core::LifetimePolicyKind)
//! and implemented behind the [`LivenessPolicy`] trait.
//!
//! A newly created surface whose parent has not yet referenced it is kept
//! alive by a *temporary reference* staged under its namespace, so a
//! garbage-collection pass running in that window does not reap it.
//!
//! The same [`FrameSinkId`] space also carries the frame-sink hierarchy:
//! a DAG describing which namespaces embed which others, used to route
//! begin-frame pacing sources down to descendant clients.
//!
//! All operations are synchronous and must run on the thread that
//! constructed the manager.

pub mod errors;
pub mod hierarchy;
pub mod ids;
pub mod liveness;
pub mod manager;
pub mod observer;
pub mod references;
pub mod sequences;
pub mod surface;

pub use errors::HierarchyError;
pub use hierarchy::{FrameSinkHierarchy, SurfaceFactoryClient};
pub use ids::{
    BeginFrameSourceId, FrameSinkId, LocalSurfaceId, SurfaceId, SurfaceInfo, SurfaceSequence,
};
pub use liveness::{LivenessContext, LivenessPolicy, ReferenceLiveness, SequenceLiveness};
pub use manager::SurfaceManager;
pub use observer::SurfaceObserver;
pub use references::{ReferenceGraph, SurfaceReference};
pub use sequences::SequenceTracker;
pub use surface::Surface;
