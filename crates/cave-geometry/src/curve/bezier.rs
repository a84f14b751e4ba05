//! Cubic Bezier segment.

use cave_math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::Curve;

/// A cubic Bezier segment with endpoints `p0`, `p3` and inner handles `p1`, `p2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Point2,
    pub p1: Point2,
    pub p2: Point2,
    pub p3: Point2,
}

impl CubicBezier {
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Bernstein-basis evaluation.
    ///
    /// Defined for any real `t`; values outside `[0, 1]` extrapolate.
    pub fn eval(&self, t: f64) -> Point2 {
        let s = 1.0 - t;
        s * s * s * self.p0
            + 3.0 * s * s * t * self.p1
            + 3.0 * s * t * t * self.p2
            + t * t * t * self.p3
    }

    /// First derivative with respect to `t`.
    pub fn derivative(&self, t: f64) -> Vector2 {
        let s = 1.0 - t;
        3.0 * s * s * (self.p1 - self.p0)
            + 6.0 * s * t * (self.p2 - self.p1)
            + 3.0 * t * t * (self.p3 - self.p2)
    }

    /// Straight distance between the endpoints.
    pub fn chord_length(&self) -> f64 {
        (self.p3 - self.p0).length()
    }

    /// Length of the control polygon; an upper bound on arc length.
    pub fn control_polygon_length(&self) -> f64 {
        (self.p1 - self.p0).length() + (self.p2 - self.p1).length() + (self.p3 - self.p2).length()
    }
}

impl Curve for CubicBezier {
    fn point_at(&self, t: f64) -> Point2 {
        self.eval(t)
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        self.derivative(t)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}
