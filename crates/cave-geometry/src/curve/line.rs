//! Line segment curve.

use cave_math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::Curve;

/// A line segment from `start` to `end`, parameterized over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Perpendicular distance from `p` to the infinite line through the segment.
    pub fn distance_to_line(&self, p: Point2) -> f64 {
        let dir = self.end - self.start;
        let len = dir.length();
        if len == 0.0 {
            return (p - self.start).length();
        }
        dir.perp_dot(p - self.start).abs() / len
    }
}

impl Curve for Line {
    fn point_at(&self, t: f64) -> Point2 {
        self.start + t * (self.end - self.start)
    }

    fn tangent_at(&self, _t: f64) -> Vector2 {
        self.end - self.start
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}
