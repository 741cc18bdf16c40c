//! Geometric primitives.

use num_traits::{Num, Zero};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Represents a 2D size (width and height) with generic dimensions.
///
/// # Type Parameters
///
/// * `T`: The numeric type for the dimensions (e.g., `u32`, `f32`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize + Num + Copy",
    deserialize = "T: Deserialize<'de> + Num + Copy"
))]
pub struct Size<T: Num + Copy> {
    /// The width dimension.
    pub width: T,
    /// The height dimension.
    pub height: T,
}

// Implement Eq and Hash if T supports them
impl<T: Num + Copy + Eq> Eq for Size<T> {}
impl<T: Num + Copy + std::hash::Hash> std::hash::Hash for Size<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        self.height.hash(state);
    }
}

impl<T: Num + Copy> Size<T> {
    /// Creates a new size with the given dimensions.
    pub const fn new(width: T, height: T) -> Self {
        Size { width, height }
    }
}

impl<T: Num + Copy + Zero + PartialEq> Size<T> {
    /// Returns `true` if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }
}

impl<T: Num + Copy + Mul<Output = T>> Size<T> {
    /// Returns the area covered by this size.
    pub fn area(&self) -> T {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn size_new_and_area() {
        let size = Size::new(64u32, 32u32);
        assert_eq!(size.width, 64);
        assert_eq!(size.height, 32);
        assert_eq!(size.area(), 2048);
    }

    #[test]
    fn size_is_empty() {
        assert!(Size::new(0u32, 10u32).is_empty());
        assert!(Size::new(10u32, 0u32).is_empty());
        assert!(!Size::new(1u32, 1u32).is_empty());
    }

    #[test]
    fn size_serde_round_trip() {
        let size = Size::new(1920u32, 1080u32);
        let encoded = toml::to_string(&size).unwrap();
        let decoded: Size<u32> = toml::from_str(&encoded).unwrap();
        assert_eq!(size, decoded);
    }
}
