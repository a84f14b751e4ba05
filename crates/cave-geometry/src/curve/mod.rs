//! Curve traits and implementations.

mod bezier;
mod line;

use cave_math::{Point2, Vector2};

pub use bezier::CubicBezier;
pub use line::Line;

/// Trait for parametric curves in the (x, z) plane.
pub trait Curve: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point2;

    /// Evaluate the tangent vector at parameter `t`.
    fn tangent_at(&self, t: f64) -> Vector2;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Whether the curve is closed (start == end).
    fn is_closed(&self) -> bool {
        false
    }
}
