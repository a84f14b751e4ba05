//! Catmull-Rom waypoint spline expressed as cubic Bezier segments.

use cave_math::{Point2, Vector2};
use serde::Serialize;

use crate::curve::{CubicBezier, Curve};
use crate::waypoints::Waypoints;

/// Convert an ordered point sequence into cubic Bezier segments using the
/// uniform Catmull-Rom tangent rule.
///
/// Segment `i` runs from `P[i]` to `P[i+1]`. Its handles are
/// `P[i] + (P[i+1] - P[i-1]) / 6` and `P[i+1] - (P[i+2] - P[i]) / 6`, where a
/// missing neighbour at either end is replaced by the segment's own endpoint
/// on that side. Returns an empty vector for fewer than two points.
///
/// Use [`BezierSpline::from_waypoints`] for validated input; this function
/// performs no checks.
pub fn catmull_rom_segments(points: &[Point2]) -> Vec<CubicBezier> {
    let n = points.len();
    let mut segments = Vec::with_capacity(n.saturating_sub(1));

    for i in 0..n.saturating_sub(1) {
        let p0 = points[i];
        let p3 = points[i + 1];

        let prev = if i > 0 { points[i - 1] } else { p0 };
        let next = if i + 2 < n { points[i + 2] } else { p3 };

        let b1 = p0 + (p3 - prev) / 6.0;
        let b2 = p3 - (next - p0) / 6.0;

        segments.push(CubicBezier::new(p0, b1, b2, p3));
    }

    segments
}

/// A C1 piecewise cubic curve through every waypoint.
#[derive(Debug, Clone, Serialize)]
pub struct BezierSpline {
    waypoints: Waypoints,
    segments: Vec<CubicBezier>,
}

impl BezierSpline {
    pub fn from_waypoints(waypoints: Waypoints) -> Self {
        let segments = catmull_rom_segments(waypoints.points());
        log::debug!(
            "built {} Bezier segment(s) from {} waypoints",
            segments.len(),
            waypoints.len()
        );
        for (i, segment) in segments.iter().enumerate() {
            log::trace!(
                "segment {}: chord {:.3}, control polygon {:.3}",
                i,
                segment.chord_length(),
                segment.control_polygon_length()
            );
        }
        Self {
            waypoints,
            segments,
        }
    }

    pub fn waypoints(&self) -> &Waypoints {
        &self.waypoints
    }

    pub fn segments(&self) -> &[CubicBezier] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Lower and upper bounds on arc length: the summed chords and the
    /// summed control polygons.
    pub fn length_bounds(&self) -> (f64, f64) {
        self.segments.iter().fold((0.0, 0.0), |(lo, hi), s| {
            (lo + s.chord_length(), hi + s.control_polygon_length())
        })
    }

    /// Map a global parameter `u` in `[0, segment_count]` to
    /// `(segment index, local t)`. Values past either end clamp to the
    /// first or last segment and extrapolate.
    fn locate(&self, u: f64) -> (usize, f64) {
        let last = self.segments.len() - 1;
        if u <= 0.0 {
            return (0, u);
        }
        let idx = (u.floor() as usize).min(last);
        (idx, u - idx as f64)
    }
}

impl Curve for BezierSpline {
    fn point_at(&self, u: f64) -> Point2 {
        let (idx, t) = self.locate(u);
        self.segments[idx].eval(t)
    }

    fn tangent_at(&self, u: f64) -> Vector2 {
        let (idx, t) = self.locate(u);
        self.segments[idx].derivative(t)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, self.segments.len() as f64)
    }

    fn is_closed(&self) -> bool {
        self.waypoints.first() == self.waypoints.last()
    }
}
