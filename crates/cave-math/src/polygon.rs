//! Cave boundary outline.

use cave_core::traits::{BoundingBox, Validate};
use cave_core::{CaveError, Result};
use serde::{Deserialize, Serialize};

use crate::{Aabb2, Point2};

/// The cross-section outline of the cavity, as an ordered ring of vertices.
///
/// The ring may be given explicitly closed (last vertex repeating the first)
/// or open; [`BoundaryPolygon::closed_ring`] always yields a closed ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPolygon {
    vertices: Vec<Point2>,
}

impl BoundaryPolygon {
    pub fn new(vertices: Vec<Point2>) -> Result<Self> {
        let polygon = Self { vertices };
        polygon.validate()?;
        Ok(polygon)
    }

    /// Build from `[x, z]` pairs.
    pub fn from_xz(pairs: &[[f64; 2]]) -> Result<Self> {
        Self::new(pairs.iter().map(|&[x, z]| Point2::new(x, z)).collect())
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => self.vertices.len() > 1 && first == last,
            _ => false,
        }
    }

    pub fn closed_ring(&self) -> Vec<Point2> {
        let mut ring = self.vertices.clone();
        if !self.is_closed() {
            ring.push(self.vertices[0]);
        }
        ring
    }

    pub fn bounds(&self) -> Aabb2 {
        // validate() guarantees at least three vertices
        Aabb2::from_points(&self.vertices).unwrap_or_else(|| Aabb2::new(Point2::ZERO, Point2::ZERO))
    }
}

impl Validate for BoundaryPolygon {
    fn validate(&self) -> Result<()> {
        if self.vertices.len() < 3 {
            return Err(CaveError::invalid_input(format!(
                "boundary polygon needs at least 3 vertices, got {}",
                self.vertices.len()
            )));
        }
        if let Some(i) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(CaveError::invalid_input(format!(
                "boundary vertex {} is not finite",
                i
            )));
        }
        Ok(())
    }
}

impl BoundingBox for BoundaryPolygon {
    type Bounds = Aabb2;

    fn bounding_box(&self) -> Option<Aabb2> {
        Aabb2::from_points(&self.vertices)
    }
}
