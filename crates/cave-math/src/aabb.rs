use crate::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box in the (x, z) plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point2]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min = points[0];
        let mut max = points[0];
        for &p in &points[1..] {
            min = min.min(p);
            max = max.max(p);
        }
        Some(Self { min, max })
    }

    pub fn extents(&self) -> Vector2 {
        self.max - self.min
    }

    /// `[min.x, max.x]`
    pub fn x_range(&self) -> [f64; 2] {
        [self.min.x, self.max.x]
    }

    /// `[min.z, max.z]`
    pub fn z_range(&self) -> [f64; 2] {
        [self.min.y, self.max.y]
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow each axis independently; `dx` pads x, `dz` pads z.
    pub fn padded(&self, dx: f64, dz: f64) -> Self {
        let offset = Vector2::new(dx, dz);
        Self {
            min: self.min - offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn test_from_points() {
        let pts = vec![dvec2(1.0, 2.0), dvec2(-1.0, 5.0), dvec2(3.0, -1.0)];
        let aabb = Aabb2::from_points(&pts).unwrap();
        assert_eq!(aabb.min, dvec2(-1.0, -1.0));
        assert_eq!(aabb.max, dvec2(3.0, 5.0));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(Aabb2::from_points(&[]).is_none());
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb2::new(dvec2(0.0, 0.0), dvec2(1.0, 1.0));
        assert!(aabb.contains_point(dvec2(0.5, 0.5)));
        assert!(aabb.contains_point(dvec2(1.0, 0.0)));
        assert!(!aabb.contains_point(dvec2(1.5, 0.5)));
    }

    #[test]
    fn test_padded_only_z() {
        let aabb = Aabb2::new(dvec2(0.0, -5.0), dvec2(70.0, 25.0));
        let padded = aabb.padded(0.0, 10.0);
        assert_eq!(padded.x_range(), [0.0, 70.0]);
        assert_eq!(padded.z_range(), [-15.0, 35.0]);
    }

    #[test]
    fn test_merge() {
        let a = Aabb2::new(dvec2(0.0, 0.0), dvec2(2.0, 2.0));
        let b = Aabb2::new(dvec2(1.0, -1.0), dvec2(3.0, 1.0));
        let m = a.merge(&b);
        assert_eq!(m.min, dvec2(0.0, -1.0));
        assert_eq!(m.max, dvec2(3.0, 2.0));
        assert_eq!(m.extents(), dvec2(3.0, 3.0));
    }
}
