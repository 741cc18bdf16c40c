//! Identifier types for surfaces, frame sinks, and begin-frame sources.

use std::fmt;

use boreal_core::Size;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a rendering client's namespace.
///
/// `client_id` identifies the producing process or subsystem, `sink_id` a
/// particular frame sink within it. Immutable once constructed; compared
/// and hashed by value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct FrameSinkId {
    client_id: u32,
    sink_id: u32,
}

impl FrameSinkId {
    /// Creates a new frame sink id.
    pub const fn new(client_id: u32, sink_id: u32) -> Self {
        Self { client_id, sink_id }
    }

    pub const fn client_id(&self) -> u32 {
        self.client_id
    }

    pub const fn sink_id(&self) -> u32 {
        self.sink_id
    }

    /// Returns `true` unless this is the all-zero sentinel.
    pub const fn is_valid(&self) -> bool {
        self.client_id != 0 || self.sink_id != 0
    }
}

impl fmt::Display for FrameSinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameSinkId({}, {})", self.client_id, self.sink_id)
    }
}

/// Distinguishes successive surface generations from the same frame sink.
///
/// `local_id` is a monotonic counter managed by the client; the nonce is an
/// unguessable 128-bit token preventing accidental reuse collisions across
/// the system's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalSurfaceId {
    local_id: u32,
    nonce: Uuid,
}

impl LocalSurfaceId {
    /// Creates a new id for generation `local_id` with a fresh nonce.
    pub fn new(local_id: u32) -> Self {
        Self {
            local_id,
            nonce: Uuid::new_v4(),
        }
    }

    /// Reassembles an id from its parts, e.g. when received from a client.
    pub const fn from_parts(local_id: u32, nonce: Uuid) -> Self {
        Self { local_id, nonce }
    }

    pub const fn local_id(&self) -> u32 {
        self.local_id
    }

    pub const fn nonce(&self) -> Uuid {
        self.nonce
    }

    pub fn is_valid(&self) -> bool {
        self.local_id != 0 && !self.nonce.is_nil()
    }
}

impl fmt::Display for LocalSurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalSurfaceId({}, {})", self.local_id, self.nonce)
    }
}

/// The primary key for surfaces and the reference graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId {
    frame_sink_id: FrameSinkId,
    local_surface_id: LocalSurfaceId,
}

impl SurfaceId {
    pub const fn new(frame_sink_id: FrameSinkId, local_surface_id: LocalSurfaceId) -> Self {
        Self {
            frame_sink_id,
            local_surface_id,
        }
    }

    pub const fn frame_sink_id(&self) -> FrameSinkId {
        self.frame_sink_id
    }

    pub const fn local_surface_id(&self) -> LocalSurfaceId {
        self.local_surface_id
    }

    pub fn is_valid(&self) -> bool {
        self.frame_sink_id.is_valid() && self.local_surface_id.is_valid()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SurfaceId({}, {})",
            self.frame_sink_id, self.local_surface_id
        )
    }
}

/// A single-use destruction obligation: the surface holding this token
/// cannot be destroyed until the token is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceSequence {
    pub frame_sink_id: FrameSinkId,
    pub sequence_number: u32,
}

impl SurfaceSequence {
    pub const fn new(frame_sink_id: FrameSinkId, sequence_number: u32) -> Self {
        Self {
            frame_sink_id,
            sequence_number,
        }
    }
}

impl fmt::Display for SurfaceSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SurfaceSequence({}, {})",
            self.frame_sink_id, self.sequence_number
        )
    }
}

/// Opaque handle to a begin-frame pacing source.
///
/// Stands in for the source object itself, which is owned by the caller;
/// the hierarchy only routes handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeginFrameSourceId(Uuid);

impl BeginFrameSourceId {
    /// Allocates a fresh, globally unique handle.
    pub fn new_unique() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BeginFrameSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeginFrameSourceId({})", self.0)
    }
}

/// Describes a surface at creation time: its id plus the scale and pixel
/// size the client produced it at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceInfo {
    pub id: SurfaceId,
    pub device_scale_factor: f32,
    pub size_in_pixels: Size<u32>,
}

impl SurfaceInfo {
    pub const fn new(id: SurfaceId, device_scale_factor: f32, size_in_pixels: Size<u32>) -> Self {
        Self {
            id,
            device_scale_factor,
            size_in_pixels,
        }
    }
}
