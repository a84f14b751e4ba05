//! Sampling of waypoint splines into dense polylines.

use cave_core::traits::BoundingBox;
use cave_core::{CaveError, Result};
use cave_math::{Aabb2, Point2};
use serde::Serialize;

use crate::curve::{CubicBezier, Curve, Line};
use crate::spline::BezierSpline;

/// An ordered, immutable polyline approximating a curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledCurve {
    points: Vec<Point2>,
}

impl SampledCurve {
    /// Wrap an existing point list. It must be non-empty and finite.
    pub fn from_points(points: Vec<Point2>) -> Result<Self> {
        if points.is_empty() {
            return Err(CaveError::invalid_input("sampled curve has no points"));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(CaveError::invalid_input(format!(
                "sampled curve point {} is not finite",
                i
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point2> {
        self.points.iter()
    }

    /// Sum of the straight pieces between consecutive samples.
    pub fn polyline_length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).length()).sum()
    }
}

impl BoundingBox for SampledCurve {
    type Bounds = Aabb2;

    fn bounding_box(&self) -> Option<Aabb2> {
        Aabb2::from_points(&self.points)
    }
}

/// Evaluate every segment at `samples_per_segment` evenly spaced parameters
/// in `[0, 1)` and close with the final waypoint.
///
/// The result holds exactly `segments * samples_per_segment + 1` points and
/// contains every waypoint.
pub fn sample_uniform(spline: &BezierSpline, samples_per_segment: usize) -> Result<SampledCurve> {
    if samples_per_segment == 0 {
        return Err(CaveError::configuration(
            "samples_per_segment must be at least 1",
        ));
    }

    let k = samples_per_segment;
    let mut points = Vec::with_capacity(spline.segment_count() * k + 1);
    for segment in spline.segments() {
        for j in 0..k {
            let t = j as f64 / k as f64;
            points.push(segment.eval(t));
        }
    }
    points.push(spline.waypoints().last());

    log::debug!(
        "uniform sampling: {} segment(s) x {} -> {} points",
        spline.segment_count(),
        k,
        points.len()
    );
    SampledCurve::from_points(points)
}

/// Maximum recursion depth for adaptive subdivision.
const MAX_DEPTH: u32 = 12;

/// Subdivide at least this deep so symmetric S-shapes, whose midpoint can
/// sit on the chord, are still refined.
const MIN_DEPTH: u32 = 2;

/// Sample a spline by recursive midpoint subdivision of each segment.
///
/// A parameter interval is split while the curve midpoint deviates from
/// the chord midpoint, or a quarter point strays from the chord line, by
/// more than `tolerance`. Every waypoint is emitted exactly once, in order.
pub fn sample_adaptive(spline: &BezierSpline, tolerance: f64) -> Result<SampledCurve> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(CaveError::configuration(format!(
            "adaptive sampling tolerance must be positive, got {}",
            tolerance
        )));
    }

    let mut points = vec![spline.waypoints().first()];
    for segment in spline.segments() {
        subdivide(segment, 0.0, 1.0, tolerance, &mut points, 0);
    }

    log::debug!(
        "adaptive sampling (tolerance {}): {} segment(s) -> {} points",
        tolerance,
        spline.segment_count(),
        points.len()
    );
    SampledCurve::from_points(points)
}

fn subdivide(
    segment: &CubicBezier,
    t0: f64,
    t1: f64,
    tolerance: f64,
    points: &mut Vec<Point2>,
    depth: u32,
) {
    if depth >= MAX_DEPTH {
        points.push(segment.point_at(t1));
        return;
    }

    let t_mid = (t0 + t1) * 0.5;
    let chord = Line::new(segment.point_at(t0), segment.point_at(t1));
    let deviation = (segment.point_at(t_mid) - chord.point_at(0.5)).length();
    let bulge = [0.25, 0.75]
        .iter()
        .map(|f| chord.distance_to_line(segment.point_at(t0 + f * (t1 - t0))))
        .fold(0.0, f64::max);

    if depth < MIN_DEPTH || deviation > tolerance || bulge > tolerance {
        subdivide(segment, t0, t_mid, tolerance, points, depth + 1);
        subdivide(segment, t_mid, t1, tolerance, points, depth + 1);
    } else {
        points.push(segment.point_at(t1));
    }
}
