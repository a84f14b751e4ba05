pub mod aabb;
pub mod polygon;

pub use aabb::Aabb2;
pub use glam::{dvec2, DVec2};
pub use polygon::BoundaryPolygon;

/// A position in the vertical cross-section plane: `x` is horizontal, `y` carries depth `z`.
pub type Point2 = DVec2;
pub type Vector2 = DVec2;
