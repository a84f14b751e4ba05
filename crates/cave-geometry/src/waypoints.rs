//! Validated waypoint sequences.

use cave_core::traits::{BoundingBox, Validate};
use cave_core::{CaveError, Result, Tolerance};
use cave_math::{Aabb2, Point2};
use serde::Serialize;

/// An ordered sequence of at least two finite waypoints with no coincident
/// consecutive pair.
///
/// Order is the traversal order. The only way to obtain a `Waypoints` is
/// through [`Waypoints::new`] or [`Waypoints::merge_duplicates`], so every
/// instance satisfies the invariants above.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoints {
    points: Vec<Point2>,
}

impl Waypoints {
    /// Validate `points` as a waypoint sequence; coincident consecutive
    /// points are rejected with [`CaveError::DegenerateSegment`].
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        let waypoints = Self { points };
        waypoints.validate()?;
        Ok(waypoints)
    }

    /// Build from `[x, z]` pairs.
    pub fn from_xz(pairs: &[[f64; 2]]) -> Result<Self> {
        Self::new(pairs.iter().map(|&[x, z]| Point2::new(x, z)).collect())
    }

    /// Drop every point that coincides (within `tolerance`) with the last
    /// retained point, then validate what remains.
    pub fn merge_duplicates(points: Vec<Point2>, tolerance: Tolerance) -> Result<Self> {
        let input_len = points.len();
        let mut merged: Vec<Point2> = Vec::with_capacity(input_len);
        for p in points {
            match merged.last() {
                Some(&prev) if tolerance.points_coincide((prev.x, prev.y), (p.x, p.y)) => {}
                _ => merged.push(p),
            }
        }
        if merged.len() < input_len {
            log::warn!(
                "merged {} duplicate consecutive waypoint(s)",
                input_len - merged.len()
            );
        }
        Self::new(merged)
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

    pub fn first(&self) -> Point2 {
        self.points[0]
    }

    pub fn last(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    /// Number of spline segments, `len() - 1`.
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }
}

impl Validate for Waypoints {
    fn validate(&self) -> Result<()> {
        if self.points.len() < 2 {
            return Err(CaveError::invalid_input(format!(
                "at least 2 waypoints are required, got {}",
                self.points.len()
            )));
        }
        if let Some(i) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(CaveError::invalid_input(format!(
                "waypoint {} is not finite",
                i
            )));
        }
        // Exact equality: any non-zero chord still yields a well-defined tangent.
        for (i, pair) in self.points.windows(2).enumerate() {
            if pair[0] == pair[1] {
                return Err(CaveError::DegenerateSegment {
                    index: i + 1,
                    x: pair[1].x,
                    z: pair[1].y,
                });
            }
        }
        Ok(())
    }
}

impl BoundingBox for Waypoints {
    type Bounds = Aabb2;

    fn bounding_box(&self) -> Option<Aabb2> {
        Aabb2::from_points(&self.points)
    }
}
