//! Core value types shared across the Boreal workspace.

pub mod geometry;

pub use geometry::Size;
